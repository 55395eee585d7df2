use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reserved contributor key holding the grand total of a stats map.
pub const TOTAL_KEY: &str = "total";

/// Prefix shared by every report file name.
pub const REPORT_PREFIX: &str = "git-hours";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsEntry {
    pub hours: f64,
    pub commits: u64,
}

impl StatsEntry {
    pub fn new(hours: f64, commits: u64) -> Self {
        Self { hours, commits }
    }

    pub fn add(&mut self, other: &StatsEntry) {
        self.hours += other.hours;
        self.commits += other.commits;
    }
}

/// Contributor identifier to stats. Sorted keys keep report files stable.
pub type StatsMap = BTreeMap<String, StatsEntry>;

/// Contributors of a map, without the `total` entry.
pub fn contributors(map: &StatsMap) -> impl Iterator<Item = (&String, &StatsEntry)> {
    map.iter().filter(|(k, _)| k.as_str() != TOTAL_KEY)
}

/// Contributors sorted by hours, highest first; ties keep key order.
pub fn ranked_contributors(map: &StatsMap) -> Vec<(&String, &StatsEntry)> {
    let mut rows: Vec<_> = contributors(map).collect();
    rows.sort_by(|a, b| b.1.hours.total_cmp(&a.1.hours));
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub branch: String,
    pub source: PathBuf,
}

impl PublishRequest {
    pub fn new(branch: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            branch: branch.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    /// Remote branch existed and was checked out.
    Existing,
    /// Remote branch was missing; an orphan branch was created.
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Staged tree matched the branch head; nothing committed or pushed.
    Unchanged(BranchState),
    Pushed(BranchState),
}

impl PublishOutcome {
    pub fn pushed(&self) -> bool {
        matches!(self, PublishOutcome::Pushed(_))
    }
}

#[derive(Debug, Clone)]
pub struct RepoReport {
    pub repo: String,
    pub path: PathBuf,
    pub stats: StatsMap,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub repo_reports: Vec<RepoReport>,
    pub aggregated: StatsMap,
    pub aggregated_path: PathBuf,
    /// The sole repository's report when exactly one was listed, otherwise
    /// the aggregated one. Repeated list entries count here.
    pub primary_path: PathBuf,
    /// Slugs of the listed repositories joined with `-`, repeats included.
    pub repo_slug: String,
    pub metrics: Option<PublishOutcome>,
    pub pages: Option<PublishOutcome>,
}
