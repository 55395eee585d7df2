use crate::aggregate::aggregate;
use crate::cli::{CommonArgs, RunArgs};
use crate::config::Config;
use crate::error::{HoursError, Result};
use crate::model::{PublishOutcome, PublishRequest, RunSummary, StatsMap};
use crate::producer::StatsProducer;
use crate::publish::BranchPublisher;
use crate::report::{
    append_ci_outputs, output_json, output_table, primary_report, write_aggregated_report, write_repo_reports,
};
use crate::runner::{CommandExistsChecker, CommandRunner, SystemRunner};
use crate::site::build_site;
use crate::slug::combined_slug;
use anyhow::Context;
use chrono::Utc;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

const LOG_TARGET: &str = "orchestrate";

pub fn exec(common: CommonArgs, args: RunArgs) -> anyhow::Result<()> {
    let config = args.to_config(&common)?;
    let runner = SystemRunner;
    let summary = Orchestrator::new(&runner, config)
        .with_progress(Term::stderr().is_term())
        .run()
        .context("Failed to compute coding hours")?;

    if args.json {
        output_json(&summary.aggregated)?;
    } else {
        output_table(&summary.aggregated, &summary.repo_reports)?;
        println!("\nReport: {}", style(summary.primary_path.display()).dim());
    }

    for (what, outcome) in [("reports", summary.metrics), ("site", summary.pages)] {
        match outcome {
            Some(o) if o.pushed() => log::info!(target: LOG_TARGET, "Published {what}"),
            Some(_) => log::info!(target: LOG_TARGET, "Published {what} unchanged"),
            None => {}
        }
    }
    Ok(())
}

/// Drives a full run: produce stats per repository, aggregate, write the
/// reports and publish them.
pub struct Orchestrator<'a, R: ?Sized> {
    runner: &'a R,
    config: Config,
    progress: bool,
}

impl<'a, R: CommandRunner + CommandExistsChecker + ?Sized> Orchestrator<'a, R> {
    pub fn new(runner: &'a R, config: Config) -> Self {
        Self {
            runner,
            config,
            progress: false,
        }
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Repositories are processed one after another; the first failure aborts
    /// the run before any report is written.
    pub fn run(&self) -> Result<RunSummary> {
        let cfg = &self.config;
        let repos = unique_repos(&cfg.repos);
        if repos.is_empty() {
            return Err(HoursError::NoRepositories);
        }
        if !self.runner.exists(&cfg.tool) {
            return Err(HoursError::ToolMissing(cfg.tool.clone()));
        }

        let results = self.collect(&repos)?;
        let aggregated = aggregate(results.iter().map(|(_, stats)| stats));

        let repo_reports = write_repo_reports(&cfg.reports_dir, results, cfg.date)?;
        let aggregated_path = write_aggregated_report(&cfg.reports_dir, &aggregated, cfg.date)?;
        // Naming follows the list as given, repeats included.
        let primary_path = primary_report(cfg.repos.len(), &repo_reports, &aggregated_path);
        let repo_slug = combined_slug(&cfg.repos);

        if let Some(out) = &cfg.github_output {
            append_ci_outputs(out, &primary_path, &repo_slug)?;
        }

        let metrics = match &cfg.metrics_branch {
            Some(branch) => {
                log::info!(target: LOG_TARGET, "Pushing reports to branch '{branch}'");
                Some(self.publish(PublishRequest::new(branch.as_str(), &cfg.reports_dir))?)
            }
            None => None,
        };

        let pages = match (&cfg.metrics_branch, &cfg.pages_branch) {
            (Some(_), Some(branch)) => {
                log::info!(target: LOG_TARGET, "Generating site and publishing to branch '{branch}'");
                build_site(&aggregated_path, &cfg.site_dir, Some(repos.len()), Utc::now())?;
                Some(self.publish(PublishRequest::new(branch.as_str(), &cfg.site_dir))?)
            }
            _ => None,
        };

        Ok(RunSummary {
            repo_reports,
            aggregated,
            aggregated_path,
            primary_path,
            repo_slug,
            metrics,
            pages,
        })
    }

    fn collect(&self, repos: &[String]) -> Result<Vec<(String, StatsMap)>> {
        let cfg = &self.config;
        let producer = StatsProducer::new(self.runner, cfg.remote.clone())
            .with_token(cfg.credentials.token.clone())
            .with_tool(cfg.tool.as_str());

        let pb = if self.progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{pos}/{len}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_length(repos.len() as u64);

        let mut results = Vec::with_capacity(repos.len());
        for repo in repos {
            log::info!(target: LOG_TARGET, "Processing {repo}");
            pb.set_message(format!("Processing {repo}"));
            let stats = producer.produce(repo, cfg.window_start.as_deref());
            pb.inc(1);
            match stats {
                Ok(stats) => results.push((repo.clone(), stats)),
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
        }
        pb.finish_and_clear();
        Ok(results)
    }

    fn publish(&self, request: PublishRequest) -> Result<PublishOutcome> {
        let cfg = &self.config;
        BranchPublisher::new(self.runner, cfg.remote.clone(), cfg.credentials.clone())
            .with_identity(cfg.identity.clone())
            .publish(&request)
    }
}

/// Repositories in first-seen order; repeats would be counted twice.
fn unique_repos(repos: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(repos.len());
    for repo in repos {
        if out.contains(repo) {
            log::warn!(target: LOG_TARGET, "Ignoring repeated repository {repo}");
        } else {
            out.push(repo.clone());
        }
    }
    out
}
