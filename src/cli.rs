use crate::config::{non_empty, parse_repo_list, Config, DEFAULT_REPORTS_DIR, DEFAULT_SITE_DIR};
use crate::producer::DEFAULT_TOOL;
use crate::publish::Credentials;
use crate::remote::{RemoteHost, DEFAULT_REMOTE_BASE};
use crate::runner::locate_tool;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "org-coding-hours")]
#[command(about = "Aggregate coding hours across repositories and publish the reports to a branch")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true, help = "Access token for cloning and pushing")]
    pub token: Option<String>,

    #[arg(long, global = true, env = "GITHUB_REPOSITORY", help = "Repository (owner/name) that receives published branches")]
    pub host_repository: Option<String>,

    #[arg(long, global = true, env = "ORG_HOURS_REMOTE_BASE", default_value = DEFAULT_REMOTE_BASE, help = "Base URL repositories are cloned from")]
    pub remote_base: String,
}

impl CommonArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(non_empty(self.token.clone()), non_empty(self.host_repository.clone()))
    }

    pub fn remote(&self) -> Result<RemoteHost> {
        RemoteHost::new(&self.remote_base).context("Invalid --remote-base")
    }
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[arg(long, env = "REPOS", help = "Repositories (owner/name) separated by whitespace")]
    pub repos: Option<String>,

    #[arg(long, env = "WINDOW_START", help = "Only count commits since this date (YYYY-MM-DD)")]
    pub window_start: Option<String>,

    #[arg(long, env = "METRICS_BRANCH", help = "Branch to commit the reports to")]
    pub metrics_branch: Option<String>,

    #[arg(long, env = "PAGES_BRANCH", help = "Branch to commit the dashboard site to (needs --metrics-branch)")]
    pub pages_branch: Option<String>,

    #[arg(long, default_value = DEFAULT_REPORTS_DIR, help = "Directory for JSON reports")]
    pub reports_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_SITE_DIR, help = "Directory for the dashboard site")]
    pub site_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_TOOL, help = "Hours tool to run inside each clone")]
    pub tool: String,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File to append CI output lines to")]
    pub github_output: Option<PathBuf>,

    #[arg(long, help = "Date stamped into report names (defaults to today)")]
    pub date: Option<NaiveDate>,

    #[arg(long, help = "Print the aggregated report as JSON")]
    pub json: bool,
}

impl RunArgs {
    pub fn to_config(&self, common: &CommonArgs) -> Result<Config> {
        let repos = non_empty(self.repos.clone())
            .map(|r| parse_repo_list(&r))
            .unwrap_or_default();

        let mut config = Config::new(repos);
        config.window_start = non_empty(self.window_start.clone());
        config.metrics_branch = non_empty(self.metrics_branch.clone());
        config.pages_branch = non_empty(self.pages_branch.clone());
        config.reports_dir = self.reports_dir.clone();
        config.site_dir = self.site_dir.clone();
        config.tool = locate_tool(&self.tool);
        config.github_output = self.github_output.clone().filter(|p| !p.as_os_str().is_empty());
        config.credentials = common.credentials();
        config.remote = common.remote()?;
        if let Some(date) = self.date {
            config.date = date;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute hours for every repository, write reports and publish them
    Run(RunArgs),
    /// Merge existing per-repository reports into one aggregate
    Aggregate {
        #[arg(required = true, help = "Per-repository JSON reports")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Write the aggregate to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Commit a file or directory to a branch of the host repository
    Publish {
        #[arg(long, help = "Target branch")]
        branch: String,

        #[arg(help = "File or directory to publish")]
        source: PathBuf,
    },
    /// Build the dashboard site from the newest aggregated report
    Site {
        #[arg(long, default_value = DEFAULT_REPORTS_DIR)]
        reports_dir: PathBuf,

        #[arg(long, default_value = DEFAULT_SITE_DIR)]
        site_dir: PathBuf,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => crate::orchestrate::exec(self.common, args),
            Commands::Aggregate { files, output } => crate::aggregate::exec(files, output),
            Commands::Publish { branch, source } => crate::publish::exec(self.common, branch, source),
            Commands::Site { reports_dir, site_dir } => crate::site::exec(reports_dir, site_dir),
        }
    }
}
