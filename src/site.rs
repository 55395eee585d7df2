//! Static dashboard built from the aggregated report.

use crate::error::{HoursError, Result};
use crate::model::{contributors, ranked_contributors, StatsMap, REPORT_PREFIX, TOTAL_KEY};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const LOG_TARGET: &str = "site";

pub const LATEST_JSON: &str = "git-hours-latest.json";
pub const DATA_DIR: &str = "data";

pub fn exec(reports_dir: PathBuf, site_dir: PathBuf) -> anyhow::Result<()> {
    let latest = find_latest_aggregated(&reports_dir).context("Failed to locate aggregated report")?;
    let index = build_site(&latest, &site_dir, None, Utc::now()).context("Failed to build site")?;
    println!("Wrote {}", index.display());
    Ok(())
}

/// Most recently modified `git-hours-aggregated-*.json` in `reports_dir`.
pub fn find_latest_aggregated(reports_dir: &Path) -> Result<PathBuf> {
    let prefix = format!("{REPORT_PREFIX}-aggregated-");
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(reports_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(&prefix) || !name.ends_with(".json") {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, entry.path()));
        }
    }

    latest
        .map(|(_, p)| p)
        .ok_or_else(|| HoursError::NoAggregatedReport(reports_dir.to_path_buf()))
}

/// Lay out `site_dir` with `index.html`, the latest JSON, and an archived copy
/// under `data/`. Returns the path of `index.html`.
pub fn build_site(
    aggregated_path: &Path,
    site_dir: &Path,
    repo_count: Option<usize>,
    updated: DateTime<Utc>,
) -> Result<PathBuf> {
    let text = fs::read_to_string(aggregated_path)?;
    let stats: StatsMap = serde_json::from_str(&text)?;

    let data_dir = site_dir.join(DATA_DIR);
    fs::create_dir_all(&data_dir)?;

    let file_name = aggregated_path
        .file_name()
        .ok_or_else(|| HoursError::SourceNotFound(aggregated_path.to_path_buf()))?;
    fs::copy(aggregated_path, data_dir.join(file_name))?;
    fs::copy(aggregated_path, site_dir.join(LATEST_JSON))?;

    let index = site_dir.join("index.html");
    fs::write(&index, render_index(&stats, repo_count, updated))?;
    log::info!(target: LOG_TARGET, "Built dashboard in {}", site_dir.display());
    Ok(index)
}

pub fn render_index(stats: &StatsMap, repo_count: Option<usize>, updated: DateTime<Utc>) -> String {
    let total = stats.get(TOTAL_KEY).copied().unwrap_or_default();
    let contributor_count = contributors(stats).count();

    let rows: String = ranked_contributors(stats)
        .into_iter()
        .map(|(who, entry)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(who),
                entry.hours,
                entry.commits
            )
        })
        .collect();

    let repos = repo_count
        .map(|n| format!("\n  <li><strong>Repositories</strong>: {n}</li>"))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Organization Coding Hours</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/simpledotcss/simple.min.css">
<script src="https://cdn.jsdelivr.net/npm/sortable-tablesort/sortable.min.js" defer></script>
</head>
<body>
<main>
<h1>Organization Coding Hours</h1>
<p><em>Last updated {updated}</em></p>
<h2>Totals</h2>
<ul>
  <li><strong>Hours</strong>: {hours}</li>
  <li><strong>Commits</strong>: {commits}</li>
  <li><strong>Contributors</strong>: {contributor_count}</li>{repos}
</ul>
<h2>Hours per contributor</h2>
<table class="sortable">
<thead><tr><th>Contributor</th><th>Hours</th><th>Commits</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<p>Historical JSON snapshots live in <code>/{DATA_DIR}</code>; the newest is <a href="{LATEST_JSON}">{LATEST_JSON}</a>.</p>
</main>
</body>
</html>
"#,
        updated = updated.format("%Y-%m-%d %H:%M UTC"),
        hours = total.hours,
        commits = total.commits,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
