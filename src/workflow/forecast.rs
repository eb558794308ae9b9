use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::config::ForecastPlan;
use crate::context::AppContext;
use crate::domain::forecast::{Projection, StoryPointTotals, project_team_sizes};
use crate::domain::issue::Issue;
use crate::error::AppResult;

pub struct ForecastOutcome {
    pub issues: Vec<Issue>,
    pub totals: StoryPointTotals,
    pub projections: Vec<Projection>,
    /// Set when the search failed and the forecast ran on an empty issue list.
    pub fetch_error: Option<String>,
}

pub async fn forecast_epic(
    ctx: &AppContext,
    plan: &ForecastPlan,
    now: NaiveDateTime,
) -> AppResult<ForecastOutcome> {
    let (issues, fetch_error) = match ctx
        .issue_tracker
        .search_epic_issues(&plan.epic, &ctx.config.field_map)
        .await
    {
        Ok(issues) => (issues, None),
        Err(err) => {
            warn!("continuing without issues for {}: {err}", plan.epic);
            (Vec::new(), Some(err.to_string()))
        }
    };

    let totals = StoryPointTotals::tally(&issues, &plan.excluded_keys());
    let projections = project_team_sizes(totals.open, plan.velocity, plan.max_developers, now)?;
    for projection in &projections {
        debug!(
            "{} developer(s): {:.2} sprints, {:.1} days",
            projection.developers, projection.sprints_required, projection.days_required
        );
    }

    Ok(ForecastOutcome {
        issues,
        totals,
        projections,
        fetch_error,
    })
}
