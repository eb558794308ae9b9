use chrono::Local;

use crate::config::ForecastPlan;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::report;
use crate::workflow::forecast::forecast_epic;

pub async fn run(ctx: &AppContext, plan: &ForecastPlan) -> AppResult<()> {
    let now = Local::now().naive_local();
    let outcome = forecast_epic(ctx, plan, now).await?;

    if let Some(error) = &outcome.fetch_error {
        eprintln!("Failed to fetch stories for epic {}. {error}", plan.epic);
    }

    let mut rendered = String::new();
    report::write_forecast(plan, &outcome, &mut rendered)?;
    print!("{rendered}");

    Ok(())
}
