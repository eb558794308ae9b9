use std::fmt::{self, Write};

use crate::config::ForecastPlan;
use crate::domain::issue::FieldDefinition;
use crate::workflow::forecast::ForecastOutcome;

const KEY_WIDTH: usize = 15;
const SUMMARY_WIDTH: usize = 60;
const SUMMARY_MAX_CHARS: usize = 57;
const STATUS_WIDTH: usize = 25;
const POINTS_WIDTH: usize = 15;
const RULE_WIDTH: usize = 80;

pub fn write_forecast<W: Write>(
    plan: &ForecastPlan,
    outcome: &ForecastOutcome,
    writer: &mut W,
) -> fmt::Result {
    writeln!(writer)?;
    writeln!(
        writer,
        "Child Issues within the Epic: {} {}",
        plan.epic,
        plan.browse_link(&plan.epic)
    )?;
    writeln!(
        writer,
        "{:<KEY_WIDTH$}{:<SUMMARY_WIDTH$}{:<STATUS_WIDTH$}{:<POINTS_WIDTH$}Link",
        "Key", "Summary", "Status", "Story Points"
    )?;

    for issue in &outcome.issues {
        let summary: String = issue.summary.chars().take(SUMMARY_MAX_CHARS).collect();
        let points = issue
            .story_points
            .map(format_points)
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{:<KEY_WIDTH$}{:<SUMMARY_WIDTH$}{:<STATUS_WIDTH$}{:<POINTS_WIDTH$}{}",
            issue.key,
            summary,
            issue.status,
            points,
            plan.browse_link(&issue.key)
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Total story points for epic {}: {}",
        plan.epic,
        format_points(outcome.totals.total)
    )?;
    writeln!(
        writer,
        "Total story points for tickets that are not 'Closed' and not excluded: {}",
        format_points(outcome.totals.open)
    )?;
    writeln!(writer)?;
    if plan.excluded.is_empty() {
        writeln!(writer, "Excluded tickets: none")?;
    } else {
        writeln!(writer, "Excluded tickets: {}", plan.excluded.join(", "))?;
    }
    writeln!(writer)?;

    writeln!(writer, "WHEN WILL IT BE DONE?????")?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        writer,
        "Given that 1 developer can finish {} story points in a {}-day sprint:",
        plan.velocity.story_points_per_sprint(),
        plan.velocity.sprint_duration_days()
    )?;
    for projection in &outcome.projections {
        writeln!(
            writer,
            "Projected end date with {} developer(s): {}",
            projection.developers,
            projection.end_date_label()
        )?;
    }
    Ok(())
}

pub fn write_custom_fields<W: Write>(fields: &[FieldDefinition], writer: &mut W) -> fmt::Result {
    for field in fields.iter().filter(|field| field.custom) {
        writeln!(writer, "{} - {}", field.id, field.name)?;
    }
    Ok(())
}

/// Whole numbers print without a fractional part, so `5.0` shows as `5`.
fn format_points(points: f64) -> String {
    format!("{points}")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::forecast::{Projection, StoryPointTotals, Velocity};
    use crate::domain::issue::Issue;

    fn plan(excluded: Vec<String>) -> ForecastPlan {
        ForecastPlan::new(
            "ABC-1".to_string(),
            "https://tracker.example.com/browse/".to_string(),
            Velocity::new(13, 14).unwrap(),
            1,
            excluded,
        )
        .unwrap()
    }

    fn outcome(issues: Vec<Issue>) -> ForecastOutcome {
        let end = NaiveDate::from_ymd_opt(2024, 3, 29)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ForecastOutcome {
            issues,
            totals: StoryPointTotals {
                total: 16.0,
                open: 2.5,
            },
            projections: vec![Projection {
                developers: 1,
                sprints_required: 2.0,
                days_required: 28.0,
                end,
            }],
            fetch_error: None,
        }
    }

    fn render(plan: &ForecastPlan, outcome: &ForecastOutcome) -> String {
        let mut out = String::new();
        write_forecast(plan, outcome, &mut out).unwrap();
        out
    }

    #[test]
    fn renders_fixed_width_rows() {
        let long_summary = "x".repeat(80);
        let issues = vec![
            Issue {
                key: "ABC-2".to_string(),
                summary: long_summary,
                status: "Open".to_string(),
                story_points: Some(5.0),
            },
            Issue {
                key: "ABC-3".to_string(),
                summary: "Short".to_string(),
                status: "Closed".to_string(),
                story_points: None,
            },
        ];
        let out = render(&plan(vec![]), &outcome(issues));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(
            lines[1],
            "Child Issues within the Epic: ABC-1 https://tracker.example.com/browse/ABC-1"
        );
        assert!(lines[2].starts_with(&format!("{:<15}{:<60}", "Key", "Summary")));
        assert!(lines[2].ends_with("Story Points   Link"));

        let expected = format!(
            "{:<15}{:<60}{:<25}{:<15}{}",
            "ABC-2",
            "x".repeat(57),
            "Open",
            "5",
            "https://tracker.example.com/browse/ABC-2"
        );
        assert_eq!(lines[3], expected);
        assert!(lines[4].starts_with("ABC-3"));
        assert!(lines[4].contains("Closed                   -              https://"));
    }

    #[test]
    fn renders_totals_and_projections() {
        let out = render(&plan(vec!["ABC-7".into(), "ABC-8".into()]), &outcome(vec![]));

        assert!(out.contains("Total story points for epic ABC-1: 16\n"));
        assert!(out.contains("not 'Closed' and not excluded: 2.5\n"));
        assert!(out.contains("Excluded tickets: ABC-7, ABC-8\n"));
        assert!(out.contains(&format!("WHEN WILL IT BE DONE?????\n{}\n", "=".repeat(80))));
        assert!(out.contains("finish 13 story points in a 14-day sprint:"));
        assert!(out.ends_with("Projected end date with 1 developer(s): 2024-03-29\n"));
    }

    #[test]
    fn reports_when_nothing_is_excluded() {
        let out = render(&plan(vec![]), &outcome(vec![]));
        assert!(out.contains("Excluded tickets: none\n"));
    }

    #[test]
    fn lists_only_custom_fields() {
        let fields = vec![
            FieldDefinition {
                id: "summary".into(),
                name: "Summary".into(),
                custom: false,
            },
            FieldDefinition {
                id: "customfield_10023".into(),
                name: "Story Points".into(),
                custom: true,
            },
        ];
        let mut out = String::new();
        write_custom_fields(&fields, &mut out).unwrap();
        assert_eq!(out, "customfield_10023 - Story Points\n");
    }
}
