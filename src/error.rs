use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("projection error: {0}")]
    Projection(String),
    #[error("failed to render output")]
    Render(#[from] fmt::Error),
}

pub type AppResult<T> = Result<T, AppError>;
