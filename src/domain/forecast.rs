use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};

use crate::domain::issue::Issue;
use crate::error::{AppError, AppResult};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StoryPointTotals {
    /// Every fetched issue, whatever its status or exclusion.
    pub total: f64,
    /// Issues that are neither closed nor excluded.
    pub open: f64,
}

impl StoryPointTotals {
    /// Sums story points in a single pass. Exclusion only removes an issue
    /// from the open sum; it still counts toward the total.
    pub fn tally(issues: &[Issue], excluded: &HashSet<String>) -> Self {
        issues.iter().fold(Self::default(), |mut totals, issue| {
            let points = issue.points();
            totals.total += points;
            if !excluded.contains(&issue.key) && !issue.is_closed() {
                totals.open += points;
            }
            totals
        })
    }
}

/// Team velocity parameters. Construct through [`Velocity::new`], which
/// rejects values that would divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Velocity {
    story_points_per_sprint: u32,
    sprint_duration_days: u32,
}

impl Velocity {
    pub fn new(story_points_per_sprint: u32, sprint_duration_days: u32) -> AppResult<Self> {
        if story_points_per_sprint == 0 {
            return Err(AppError::Configuration(
                "story points per sprint must be greater than zero".to_string(),
            ));
        }
        if sprint_duration_days == 0 {
            return Err(AppError::Configuration(
                "sprint duration must be at least one day".to_string(),
            ));
        }
        Ok(Self {
            story_points_per_sprint,
            sprint_duration_days,
        })
    }

    pub fn story_points_per_sprint(&self) -> u32 {
        self.story_points_per_sprint
    }

    pub fn sprint_duration_days(&self) -> u32 {
        self.sprint_duration_days
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub developers: u32,
    pub sprints_required: f64,
    pub days_required: f64,
    pub end: NaiveDateTime,
}

impl Projection {
    pub fn end_date_label(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

pub fn project(
    open_story_points: f64,
    velocity: Velocity,
    developers: u32,
    now: NaiveDateTime,
) -> AppResult<Projection> {
    if developers == 0 {
        return Err(AppError::Configuration(
            "developer count must be at least one".to_string(),
        ));
    }

    let sprint_capacity = f64::from(velocity.story_points_per_sprint) * f64::from(developers);
    let sprints_required = open_story_points / sprint_capacity;
    let days_required = sprints_required * f64::from(velocity.sprint_duration_days);

    // `as` saturates, so absurd workloads surface as a calendar overflow below.
    let millis = (days_required * MILLIS_PER_DAY).round() as i64;
    let offset = TimeDelta::try_milliseconds(millis)
        .ok_or_else(|| AppError::Projection(format!("{days_required} days is out of range")))?;

    let end = now.checked_add_signed(offset).ok_or_else(|| {
        AppError::Projection(format!(
            "end date for {developers} developer(s) falls outside the calendar"
        ))
    })?;

    Ok(Projection {
        developers,
        sprints_required,
        days_required,
        end,
    })
}

/// One projection per team size from a single developer up to `max_developers`.
pub fn project_team_sizes(
    open_story_points: f64,
    velocity: Velocity,
    max_developers: u32,
    now: NaiveDateTime,
) -> AppResult<Vec<Projection>> {
    (1..=max_developers)
        .map(|developers| project(open_story_points, velocity, developers, now))
        .collect()
}
