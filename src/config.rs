use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::forecast::Velocity;
use crate::error::{AppError, AppResult};

pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_10023";

/// Maps the logical fields this tool reads to the identifiers a particular
/// tracker instance uses for them. Story points usually live in an
/// instance-specific custom field; `--list-fields` shows the candidates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldMap {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub story_points: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            key: "key".to_string(),
            summary: "summary".to_string(),
            status: "status".to_string(),
            story_points: DEFAULT_STORY_POINTS_FIELD.to_string(),
        }
    }
}

impl FieldMap {
    pub fn from_json(contents: &str) -> AppResult<Self> {
        let map: Self = serde_json::from_str(contents)
            .map_err(|err| AppError::Configuration(format!("invalid field map: {err}")))?;
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AppError::Configuration(format!(
                "cannot read field map {}: {err}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }

    pub fn with_story_points_field(mut self, field: Option<String>) -> AppResult<Self> {
        if let Some(field) = field {
            self.story_points = field;
            self.validate()?;
        }
        Ok(self)
    }

    /// Comma-separated identifiers for the search `fields` parameter.
    pub fn request_fields(&self) -> String {
        [&self.key, &self.summary, &self.status, &self.story_points]
            .map(|field| field.as_str())
            .join(",")
    }

    fn validate(&self) -> AppResult<()> {
        let entries = [
            ("key", &self.key),
            ("summary", &self.summary),
            ("status", &self.status),
            ("story_points", &self.story_points),
        ];
        for (name, value) in entries {
            if value.trim().is_empty() {
                return Err(AppError::Configuration(format!(
                    "field map entry '{name}' must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub api_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"***")
            .finish()
    }
}

impl Credentials {
    /// Both halves are needed to build a Basic header; anything less means
    /// the tracker is queried anonymously.
    pub fn from_parts(email: Option<String>, api_token: Option<String>) -> Option<Self> {
        let email = email.filter(|value| !value.trim().is_empty())?;
        let api_token = api_token.filter(|value| !value.trim().is_empty())?;
        Some(Self { email, api_token })
    }
}

/// Settings shared by every request against the tracker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub field_map: FieldMap,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn new(
        base_url: String,
        credentials: Option<Credentials>,
        field_map: FieldMap,
        request_timeout: Duration,
    ) -> AppResult<Self> {
        if base_url.trim().is_empty() {
            return Err(AppError::Configuration(
                "tracker base URL must not be empty".to_string(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(AppError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            credentials,
            field_map,
            request_timeout,
        })
    }
}

/// What to forecast: the epic, how fast the team works and which tickets to
/// leave out of the remaining work.
#[derive(Debug, Clone)]
pub struct ForecastPlan {
    pub epic: String,
    pub browse_url: String,
    pub velocity: Velocity,
    pub max_developers: u32,
    pub excluded: Vec<String>,
}

impl ForecastPlan {
    pub fn new(
        epic: String,
        browse_url: String,
        velocity: Velocity,
        max_developers: u32,
        excluded: Vec<String>,
    ) -> AppResult<Self> {
        let epic = epic.trim().to_string();
        if epic.is_empty() {
            return Err(AppError::Configuration(
                "epic key must not be empty".to_string(),
            ));
        }
        if max_developers == 0 {
            return Err(AppError::Configuration(
                "max developers must be at least one".to_string(),
            ));
        }
        Ok(Self {
            epic,
            browse_url,
            velocity,
            max_developers,
            excluded,
        })
    }

    pub fn excluded_keys(&self) -> HashSet<String> {
        self.excluded.iter().cloned().collect()
    }

    pub fn browse_link(&self, key: &str) -> String {
        format!("{}{}", self.browse_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_field_map_requests_story_points_last() {
        assert_eq!(
            FieldMap::default().request_fields(),
            "key,summary,status,customfield_10023"
        );
    }

    #[test]
    fn partial_field_map_keeps_defaults() {
        let map = FieldMap::from_json(r#"{ "story_points": "customfield_10016" }"#).unwrap();
        assert_eq!(map.summary, "summary");
        assert_eq!(map.story_points, "customfield_10016");
    }

    #[test]
    fn rejects_unknown_and_empty_field_map_entries() {
        assert!(FieldMap::from_json(r#"{ "points": "customfield_1" }"#).is_err());
        assert!(FieldMap::from_json(r#"{ "status": " " }"#).is_err());
    }

    #[test]
    fn story_points_override_wins() {
        let map = FieldMap::default()
            .with_story_points_field(Some("customfield_2".to_string()))
            .unwrap();
        assert_eq!(map.story_points, "customfield_2");
        assert!(
            FieldMap::default()
                .with_story_points_field(Some(String::new()))
                .is_err()
        );
    }

    #[test]
    fn missing_field_map_file_is_a_configuration_error() {
        let err = FieldMap::load(Path::new("/nonexistent/field-map.json")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn credentials_need_both_parts() {
        assert!(Credentials::from_parts(Some("me@example.com".into()), None).is_none());
        assert!(Credentials::from_parts(Some("".into()), Some("token".into())).is_none());
        let credentials =
            Credentials::from_parts(Some("me@example.com".into()), Some("s3cret".into())).unwrap();
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }

    #[test]
    fn rejects_blank_base_url_and_zero_timeout() {
        assert!(
            AppConfig::new(" ".into(), None, FieldMap::default(), Duration::from_secs(5)).is_err()
        );
        assert!(
            AppConfig::new(
                "https://tracker.example.com/rest/api/2/".into(),
                None,
                FieldMap::default(),
                Duration::ZERO
            )
            .is_err()
        );
    }

    #[test]
    fn plan_validates_epic_and_team_size() {
        let velocity = Velocity::new(13, 14).unwrap();
        assert!(ForecastPlan::new("  ".into(), "b/".into(), velocity, 1, vec![]).is_err());
        assert!(ForecastPlan::new("ABC-1".into(), "b/".into(), velocity, 0, vec![]).is_err());

        let plan = ForecastPlan::new(
            " ABC-1 ".into(),
            "https://t/browse/".into(),
            velocity,
            2,
            vec![],
        )
        .unwrap();
        assert_eq!(plan.epic, "ABC-1");
        assert_eq!(plan.browse_link("ABC-7"), "https://t/browse/ABC-7");
    }
}
