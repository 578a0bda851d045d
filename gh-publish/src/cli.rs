///
/// This module implements the CLI interface for gh-publish: command parsing,
/// subcommand routing and the async [`run`] entrypoint used by `main` and by
/// integration tests.
///
/// All publishing logic lives in [`gh_publish_core`]; this module only wires
/// configuration, clients and console output together.
///
/// ## Subcommands
/// - `api`: upload files through the GitHub contents API
/// - `git`: commit and push with the system git binary
/// - `scan`: list what would be published
use crate::load_config::{load_config, load_settings, missing_env};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use gh_publish_core::config::{ConfigError, PublishConfig};
use gh_publish_core::console::Console;
use gh_publish_core::git::{PushDriver, SystemGit};
use gh_publish_core::github::{publish_project, GitHubClient, PublishOptions};
use gh_publish_core::ignore::IgnoreFilter;
use gh_publish_core::scan::collect_files;
use std::path::PathBuf;

/// CLI for gh-publish: publish a local project directory to GitHub.
#[derive(Parser)]
#[clap(
    name = "gh-publish",
    version,
    about = "Publish a local project directory to a GitHub repository"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Path to an optional YAML settings file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Project directory to publish
    #[clap(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload every kept file through the GitHub contents API
    Api {
        #[clap(flatten)]
        target: Target,

        /// Do not try to create the repository first
        #[clap(long)]
        no_create: bool,

        /// List the files that would be uploaded and stop
        #[clap(long)]
        dry_run: bool,
    },
    /// Commit everything and push it with the system git binary
    Git {
        #[clap(flatten)]
        target: Target,
    },
    /// List the files that would be published (no credentials needed)
    Scan {
        #[clap(flatten)]
        target: Target,
    },
}

fn report_missing_env(console: Console, err: &ConfigError) {
    let ConfigError::MissingEnv { status, .. } = err;
    console.fail("Missing required environment variables:");
    for (name, set) in status {
        let state = if *set { "✅ Set" } else { "❌ Missing" };
        console.plain(&format!("   {name}: {state}"));
    }
    console.blank();
    console.plain("Set them in the environment or in a .env file.");
}

fn load(target: &Target, console: Console) -> Result<PublishConfig> {
    load_config(target.config.as_deref(), &target.root).inspect_err(|e| {
        if let Some(missing) = missing_env(e) {
            report_missing_env(console, missing);
        }
    })
}

async fn run_api(target: Target, no_create: bool, dry_run: bool, console: Console) -> Result<()> {
    console.banner("gh-publish - GitHub API Push");
    let config = load(&target, console)?;

    if dry_run {
        let filter = IgnoreFilter::new(&config.ignore_patterns);
        let files = collect_files(&config.project_root, &filter)?;
        console.step(&format!("Found {} files to upload (dry run)", files.len()));
        for file in &files {
            console.plain(&format!("  {}", file.relative));
        }
        return Ok(());
    }

    let client = GitHubClient::new(&config)?;
    let options = PublishOptions {
        create_repository: !no_create,
    };
    let report = publish_project(&client, &config, options, console).await?;
    tracing::info!(
        command = "api",
        succeeded = report.succeeded(),
        total = report.total(),
        "API publish finished"
    );

    if !report.is_success() {
        bail!(
            "upload to GitHub failed: {}/{} files uploaded",
            report.succeeded(),
            report.total()
        );
    }
    console.blank();
    console.plain("🚀 Your project is now live on GitHub!");
    Ok(())
}

async fn run_git(target: Target, console: Console) -> Result<()> {
    console.banner("gh-publish - GitHub Push");
    let config = load(&target, console)?;

    let git = SystemGit::new(&config.project_root, config.credentials.token.clone());
    let outcome = PushDriver::new(&git, &config, console).publish().await?;
    tracing::info!(command = "git", ?outcome, "git publish finished");
    Ok(())
}

fn run_scan(target: Target, console: Console) -> Result<()> {
    let settings = load_settings(target.config.as_deref())?;
    let filter = IgnoreFilter::new(settings.ignore.resolve());
    let files = collect_files(&target.root, &filter)?;
    for file in &files {
        console.plain(&file.relative);
    }
    tracing::info!(command = "scan", count = files.len(), "Scan finished");
    Ok(())
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let console = Console::new();
    match cli.command {
        Commands::Api {
            target,
            no_create,
            dry_run,
        } => run_api(target, no_create, dry_run, console).await,
        Commands::Git { target } => run_git(target, console).await,
        Commands::Scan { target } => run_scan(target, console),
    }
}
