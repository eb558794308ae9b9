use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use log::{debug, info};
use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::{AppConfig, Credentials, FieldMap};
use crate::domain::issue::{FieldDefinition, Issue};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl JiraClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| AppError::IssueTracker(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), resource)
    }

    fn epic_jql(epic_key: &str) -> String {
        format!("\"Epic Link\" = {epic_key}")
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => request.header(
                AUTHORIZATION,
                Self::auth_header(&credentials.email, &credentials.api_token),
            ),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        info!("GET {url}");
        let request = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        debug!("{url} responded with {status}");
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira response: {err}")))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn search_epic_issues(&self, epic_key: &str, fields: &FieldMap) -> AppResult<Vec<Issue>> {
        let query = [
            ("jql", Self::epic_jql(epic_key)),
            ("fields", fields.request_fields()),
        ];
        let payload: JiraSearchResponse = self.get_json(&self.endpoint("search"), &query).await?;

        if let Some(total) = payload.total {
            if total > payload.issues.len() {
                debug!(
                    "Jira reported {total} issues for {epic_key}, first page holds {}",
                    payload.issues.len()
                );
            }
        }

        Ok(payload
            .issues
            .into_iter()
            .map(|issue| issue.into_issue(fields))
            .collect())
    }

    async fn list_fields(&self) -> AppResult<Vec<FieldDefinition>> {
        let payload: Vec<JiraField> = self.get_json(&self.endpoint("field"), &[]).await?;
        Ok(payload
            .into_iter()
            .map(|field| FieldDefinition {
                id: field.id,
                name: field.name,
                custom: field.custom,
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    #[serde(default)]
    total: Option<usize>,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl JiraIssue {
    fn into_issue(self, map: &FieldMap) -> Issue {
        let summary = self
            .fields
            .get(&map.summary)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // Status is normally an object carrying `name`; some proxies flatten it.
        let status = self
            .fields
            .get(&map.status)
            .and_then(|status| status.get("name").or(Some(status)))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let story_points = self.fields.get(&map.story_points).and_then(Value::as_f64);

        Issue {
            key: self.key,
            summary,
            status,
            story_points,
        }
    }
}

#[derive(Deserialize)]
struct JiraField {
    id: String,
    name: String,
    #[serde(default)]
    custom: bool,
}
