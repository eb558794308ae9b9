mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod report;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{AppConfig, Credentials, FieldMap, ForecastPlan};
use crate::context::AppContext;
use crate::domain::forecast::Velocity;
use crate::error::{AppError, AppResult};
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(
    name = "epic-eta",
    author,
    version,
    about = "Tally up the story points of the stories in a Jira epic and project completion dates."
)]
struct Cli {
    /// Jira epic key, e.g. ABC-1234.
    #[arg(required_unless_present = "list_fields")]
    epic: Option<String>,

    /// Story points one developer finishes in a sprint.
    #[arg(long, default_value_t = 13)]
    story_points_per_sprint: u32,

    /// Project end dates for teams of 1 up to this many developers.
    #[arg(long, default_value_t = 1)]
    max_developers: u32,

    /// Tickets left out of the remaining work, e.g. ABC-5678 ABC-5679.
    #[arg(long, num_args = 1.., value_name = "KEY")]
    exclude: Vec<String>,

    /// Base URL of the Jira REST API, e.g. https://company.atlassian.net/rest/api/2/
    #[arg(long, env = "JIRA_BASE_URL")]
    base_url: String,

    /// Prefix for ticket links, e.g. https://company.atlassian.net/browse/
    #[arg(long, env = "JIRA_BROWSE_URL", required_unless_present = "list_fields")]
    browse_url: Option<String>,

    /// Jira account email.
    #[arg(long, env = "JIRA_EMAIL")]
    email: Option<String>,

    /// Jira API token.
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Length of a sprint in days.
    #[arg(long, default_value_t = 14)]
    sprint_duration: u32,

    /// JSON file mapping key/summary/status/story_points to tracker field ids.
    #[arg(long, value_name = "PATH")]
    field_map: Option<PathBuf>,

    /// Field id holding story points; overrides the field map.
    #[arg(long, value_name = "FIELD_ID")]
    story_points_field: Option<String>,

    /// Give up on a Jira request after this many seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Print the tracker's custom fields and exit.
    #[arg(long)]
    list_fields: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let field_map = match &cli.field_map {
        Some(path) => FieldMap::load(path)?,
        None => FieldMap::default(),
    }
    .with_story_points_field(cli.story_points_field.clone())?;

    let credentials = Credentials::from_parts(cli.email.clone(), cli.api_token.clone());
    if credentials.is_none() {
        eprintln!("Warning: Jira email or API token not configured; querying anonymously.");
    }

    let config = AppConfig::new(
        cli.base_url.clone(),
        credentials,
        field_map,
        Duration::from_secs(cli.timeout_secs),
    )?;
    let issue_tracker = Arc::new(JiraClient::new(&config)?);
    let context = AppContext::new(config, issue_tracker);

    if cli.list_fields {
        return cmd::fields::run(&context).await;
    }

    let plan = forecast_plan(cli)?;
    cmd::forecast::run(&context, &plan).await
}

fn forecast_plan(cli: Cli) -> AppResult<ForecastPlan> {
    let epic = cli
        .epic
        .ok_or_else(|| AppError::Configuration("an epic key is required".to_string()))?;
    let browse_url = cli
        .browse_url
        .ok_or_else(|| AppError::Configuration("a browse URL is required".to_string()))?;
    let velocity = Velocity::new(cli.story_points_per_sprint, cli.sprint_duration)?;

    ForecastPlan::new(epic, browse_url, velocity, cli.max_developers, cli.exclude)
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}
