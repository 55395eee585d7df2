use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HoursError>;

#[derive(Error, Debug)]
pub enum HoursError {
    #[error("Command `{command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} CLI not found in PATH")]
    ToolMissing(String),
    #[error("{0} not set; cannot push to branch")]
    MissingCredentials(&'static str),
    #[error("No repositories given; list at least one repository to process")]
    NoRepositories,
    #[error("{tool} failed for {repo}: {stderr}")]
    ToolFailed {
        tool: String,
        repo: String,
        stderr: String,
    },
    #[error("Invalid stats output for {repo}: {reason}")]
    InvalidStats { repo: String, reason: String },
    #[error("Source path '{}' not found", .0.display())]
    SourceNotFound(PathBuf),
    #[error("No aggregated report found in {}", .0.display())]
    NoAggregatedReport(PathBuf),
    #[error("Invalid remote URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Other: {0}")]
    Other(String),
}
