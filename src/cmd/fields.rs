use log::warn;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::report;

/// Prints the tracker's custom fields so the story-points field can be found.
/// A failed lookup is reported but does not fail the run.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let fields = match ctx.issue_tracker.list_fields().await {
        Ok(fields) => fields,
        Err(err) => {
            warn!("field discovery failed: {err}");
            eprintln!("Failed to retrieve custom fields. {err}");
            return Ok(());
        }
    };

    let mut rendered = String::new();
    report::write_custom_fields(&fields, &mut rendered)?;
    print!("{rendered}");

    Ok(())
}
