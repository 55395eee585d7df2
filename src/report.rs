use crate::aggregate::aggregate;
use crate::error::Result;
use crate::model::{ranked_contributors, RepoReport, StatsEntry, StatsMap, REPORT_PREFIX, TOTAL_KEY};
use crate::slug::slugify;
use chrono::NaiveDate;
use console::style;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "report";

pub fn repo_report_name(repo: &str, date: NaiveDate) -> String {
    format!("{REPORT_PREFIX}-{}-{date}.json", slugify(repo))
}

pub fn aggregated_report_name(date: NaiveDate) -> String {
    format!("{REPORT_PREFIX}-aggregated-{date}.json")
}

/// Pretty-printed JSON with `hours` and `commits` per contributor.
pub fn write_report(path: &Path, stats: &StatsMap) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    fs::write(path, json)?;
    log::debug!(target: LOG_TARGET, "Wrote {}", path.display());
    Ok(())
}

/// Write one report per repository into `dir`, creating it if needed.
pub fn write_repo_reports(
    dir: &Path,
    results: Vec<(String, StatsMap)>,
    date: NaiveDate,
) -> Result<Vec<RepoReport>> {
    fs::create_dir_all(dir)?;
    let mut reports = Vec::with_capacity(results.len());
    for (repo, stats) in results {
        let path = dir.join(repo_report_name(&repo, date));
        write_report(&path, &stats)?;
        reports.push(RepoReport {
            repo,
            path,
            stats,
        });
    }
    Ok(reports)
}

pub fn write_aggregated_report(dir: &Path, aggregated: &StatsMap, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(aggregated_report_name(date));
    write_report(&path, aggregated)?;
    Ok(path)
}

/// The report callers should look at: the only repository's report when
/// exactly one repository was requested, otherwise the aggregate.
pub fn primary_report(requested: usize, reports: &[RepoReport], aggregated_path: &Path) -> PathBuf {
    match (requested, reports) {
        (1, [only]) => only.path.clone(),
        _ => aggregated_path.to_path_buf(),
    }
}

/// Append `aggregated_report=` and `repo_slug=` lines for the CI runner.
pub fn append_ci_outputs(output_file: &Path, primary: &Path, repo_slug: &str) -> Result<()> {
    let mut fh = OpenOptions::new().create(true).append(true).open(output_file)?;
    writeln!(fh, "aggregated_report={}", primary.display())?;
    writeln!(fh, "repo_slug={repo_slug}")?;
    Ok(())
}

pub fn output_json(aggregated: &StatsMap) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(aggregated)?);
    Ok(())
}

/// Each repository with its contributor sum, in processing order.
pub fn repo_totals(reports: &[RepoReport]) -> Vec<(&str, StatsEntry)> {
    reports
        .iter()
        .map(|r| {
            let total = aggregate(std::iter::once(&r.stats))
                .get(TOTAL_KEY)
                .copied()
                .unwrap_or_default();
            (r.repo.as_str(), total)
        })
        .collect()
}

pub fn output_table(aggregated: &StatsMap, reports: &[RepoReport]) -> anyhow::Result<()> {
    println!(
        "{:<50} {:>10} {:>8}",
        style("Contributor").bold(),
        style("Hours").bold(),
        style("Commits").bold()
    );
    println!("{}", "─".repeat(70));
    for (who, stats) in ranked_contributors(aggregated) {
        println!("{:<50} {:>10.1} {:>8}", who, stats.hours, stats.commits);
    }
    if let Some(total) = aggregated.get(TOTAL_KEY) {
        println!("{}", "─".repeat(70));
        println!(
            "{:<50} {:>10.1} {:>8}",
            style(format!("Total ({} repositories)", reports.len())).bold(),
            style(total.hours).cyan(),
            style(total.commits).cyan()
        );
    }

    if reports.len() > 1 {
        println!();
        for (repo, total) in repo_totals(reports) {
            println!("{:<50} {:>10.1} {:>8}", style(repo).dim(), total.hours, total.commits);
        }
    }
    Ok(())
}
