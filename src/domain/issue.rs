/// Status name that marks an issue as finished.
pub const CLOSED_STATUS: &str = "Closed";

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub story_points: Option<f64>,
}

impl Issue {
    pub fn points(&self) -> f64 {
        self.story_points.unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.status == CLOSED_STATUS
    }
}

/// A field as advertised by the tracker's field discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub custom: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_points_count_as_zero() {
        let issue = Issue {
            key: "A-1".to_string(),
            summary: String::new(),
            status: "Open".to_string(),
            story_points: None,
        };
        assert_eq!(issue.points(), 0.0);
        assert!(!issue.is_closed());
    }

    #[test]
    fn closed_status_is_case_sensitive() {
        let mut issue = Issue {
            key: "A-1".to_string(),
            summary: String::new(),
            status: "Closed".to_string(),
            story_points: Some(3.0),
        };
        assert!(issue.is_closed());
        issue.status = "closed".to_string();
        assert!(!issue.is_closed());
    }
}
