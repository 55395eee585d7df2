use crate::error::{HoursError, Result};
use crate::model::StatsMap;
use crate::remote::RemoteHost;
use crate::runner::{redact_credentials, CommandRunner, Invocation, GIT};

const LOG_TARGET: &str = "producer";

pub const DEFAULT_TOOL: &str = "git-hours";

/// Clones one repository at a time and runs the hours tool inside it.
pub struct StatsProducer<'a, R: ?Sized> {
    runner: &'a R,
    remote: RemoteHost,
    token: Option<String>,
    tool: String,
}

impl<'a, R: CommandRunner + ?Sized> StatsProducer<'a, R> {
    pub fn new(runner: &'a R, remote: RemoteHost) -> Self {
        Self {
            runner,
            remote,
            token: None,
            tool: DEFAULT_TOOL.to_string(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Stats for `repo`, optionally limited to commits since `since`.
    ///
    /// The clone lives in a fresh temporary directory that is removed however
    /// this returns.
    pub fn produce(&self, repo: &str, since: Option<&str>) -> Result<StatsMap> {
        let url = self.remote.clone_url(repo, self.token.as_deref())?;
        let clone_dir = tempfile::Builder::new().prefix("repo_").tempdir()?;

        log::info!(target: LOG_TARGET, "Cloning {repo}");
        let clone = Invocation::new(GIT)
            .args(["clone", "--quiet"])
            .arg(url)
            .arg(clone_dir.path().to_string_lossy())
            .env("GIT_TERMINAL_PROMPT", "0");
        self.runner.run_checked(&clone)?;

        let mut tool = Invocation::new(&self.tool).current_dir(clone_dir.path());
        if let Some(since) = since.filter(|s| !s.is_empty()) {
            tool = tool.args(["-since", since]);
        }

        log::info!(target: LOG_TARGET, "Running {} for {repo}", self.tool);
        let output = self.runner.run(&tool)?;
        if !output.success() {
            return Err(HoursError::ToolFailed {
                tool: self.tool.clone(),
                repo: repo.to_string(),
                stderr: redact_credentials(output.stderr.trim()).into_owned(),
            });
        }

        let stats = parse_stats(repo, &output.stdout)?;
        log::debug!(target: LOG_TARGET, "{repo}: {} entries", stats.len());

        if let Err(e) = clone_dir.close() {
            log::warn!(target: LOG_TARGET, "Could not remove clone of {repo}: {e}");
        }
        Ok(stats)
    }
}

/// Parse the hours tool's JSON. `null` counts as no contributors.
pub fn parse_stats(repo: &str, text: &str) -> Result<StatsMap> {
    let parsed: Option<StatsMap> =
        serde_json::from_str(text).map_err(|e| HoursError::InvalidStats {
            repo: repo.to_string(),
            reason: e.to_string(),
        })?;
    let stats = parsed.unwrap_or_default();

    if let Some((who, entry)) = stats
        .iter()
        .find(|(_, e)| !e.hours.is_finite() || e.hours < 0.0)
    {
        return Err(HoursError::InvalidStats {
            repo: repo.to_string(),
            reason: format!("{who} has invalid hours {}", entry.hours),
        });
    }
    Ok(stats)
}
