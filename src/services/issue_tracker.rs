use async_trait::async_trait;

use crate::config::FieldMap;
use crate::domain::issue::{FieldDefinition, Issue};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Child issues whose epic link points at `epic_key`. Only the first page
    /// of results is returned.
    async fn search_epic_issues(&self, epic_key: &str, fields: &FieldMap) -> AppResult<Vec<Issue>>;

    async fn list_fields(&self) -> AppResult<Vec<FieldDefinition>>;
}
