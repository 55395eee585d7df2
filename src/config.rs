use crate::producer::DEFAULT_TOOL;
use crate::publish::{BotIdentity, Credentials};
use crate::remote::RemoteHost;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SITE_DIR: &str = "site";

/// Everything a run needs, resolved up front so the workflow never reads the
/// process environment itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub repos: Vec<String>,
    /// Passed to the hours tool as `-since`.
    pub window_start: Option<String>,
    /// Branch receiving the reports directory. Unset skips publishing.
    pub metrics_branch: Option<String>,
    /// Branch receiving the dashboard site; only used with `metrics_branch`.
    pub pages_branch: Option<String>,
    pub reports_dir: PathBuf,
    pub site_dir: PathBuf,
    pub tool: String,
    pub date: NaiveDate,
    /// File receiving `key=value` lines for the CI runner.
    pub github_output: Option<PathBuf>,
    pub credentials: Credentials,
    pub remote: RemoteHost,
    pub identity: BotIdentity,
}

impl Config {
    pub fn new(repos: Vec<String>) -> Self {
        Self {
            repos,
            window_start: None,
            metrics_branch: None,
            pages_branch: None,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            tool: DEFAULT_TOOL.to_string(),
            date: Local::now().date_naive(),
            github_output: None,
            credentials: Credentials::default(),
            remote: RemoteHost::github(),
            identity: BotIdentity::default(),
        }
    }
}

/// Split a whitespace or newline separated repository list.
pub fn parse_repo_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// `None` for missing or blank values, as an unset environment variable.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
