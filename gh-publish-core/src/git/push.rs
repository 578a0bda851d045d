//! git CLI path: reproduce a manual "init, commit, push" publish through a [`GitRunner`].
//!
//! Steps run in a fixed order and most of them abort the run on failure.
//! The exceptions are committer identity (warned about), removing a stale
//! `origin` (ignored) and the first push (retried once with `--force`).
//! Nothing is rolled back: a failure can leave the local repository half
//! configured.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::{CommitSettings, PublishConfig};
use crate::console::Console;
use crate::contract::{GitError, GitOutput, GitRunner};

const REMOTE: &str = "origin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The stage matched `HEAD`; nothing was committed or pushed.
    NothingToCommit,
    Pushed { forced: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("{step} failed: {detail}")]
    Step { step: String, detail: String },
    #[error("{step} failed: {source}")]
    Launch {
        step: String,
        #[source]
        source: GitError,
    },
}

/// `<title> - <UTC timestamp>`, a blank line, then the configured body.
pub fn commit_message(settings: &CommitSettings, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y-%m-%dT%H:%M:%S");
    let body = settings.body.trim_end();
    if body.is_empty() {
        format!("{} - {timestamp}", settings.title)
    } else {
        format!("{} - {timestamp}\n\n{body}", settings.title)
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| (*a).to_string()).collect()
}

pub struct PushDriver<'a, G: GitRunner + ?Sized> {
    git: &'a G,
    config: &'a PublishConfig,
    console: Console,
}

impl<'a, G: GitRunner + ?Sized> PushDriver<'a, G> {
    pub fn new(git: &'a G, config: &'a PublishConfig, console: Console) -> Self {
        Self {
            git,
            config,
            console,
        }
    }

    /// # Errors
    /// See [`PushDriver::publish_at`].
    pub async fn publish(&self) -> Result<PushOutcome, PushError> {
        self.publish_at(Utc::now()).await
    }

    /// Runs the whole sequence, stamping the commit with `now`.
    ///
    /// # Errors
    /// Returns the first fatal step failure, or the forced push failure.
    pub async fn publish_at(&self, now: DateTime<Utc>) -> Result<PushOutcome, PushError> {
        let branch = self.config.branch.as_str();
        info!(repository = %self.config.credentials.full_name(), branch, "[GIT] Starting push");
        self.console
            .plain(&format!("📂 Repository: {}", self.config.credentials.full_name()));
        self.console.blank();

        // `branch -M` overwrites an existing `<branch>` ref: fresh repositories only.
        if self.git.has_repository() {
            self.console.ok("Git repository already initialized");
            self.console.blank();
        } else {
            self.step("Initializing Git repository", args(&["init"])).await?;
            self.step("Setting main branch", args(&["branch", "-M", branch]))
                .await?;
        }

        let committer = &self.config.committer;
        if self
            .step("Setting Git email", args(&["config", "user.email", &committer.email]))
            .await
            .is_err()
        {
            self.console.warn("Could not set git email, continuing...");
        }
        if self
            .step("Setting Git username", args(&["config", "user.name", &committer.name]))
            .await
            .is_err()
        {
            self.console.warn("Could not set git username, continuing...");
        }

        // Absent on a first run.
        if let Err(e) = self.git.run(args(&["remote", "remove", REMOTE])).await {
            warn!(error = %e, "[GIT] remote remove could not be launched");
        }
        self.console.info("Removed existing origin (if any)");

        let remote_url = self.config.authenticated_remote_url();
        self.step("Adding GitHub remote", args(&["remote", "add", REMOTE, &remote_url]))
            .await?;
        self.step("Adding all files", args(&["add", "--all"])).await?;

        if !self.has_staged_changes().await? {
            self.console.info("No changes to commit");
            info!("[GIT] Stage matches HEAD, nothing to publish");
            return Ok(PushOutcome::NothingToCommit);
        }

        let message = commit_message(&self.config.commit, now);
        self.step("Committing changes", args(&["commit", "-m", &message]))
            .await?;

        let forced = match self
            .step("Pushing to GitHub", args(&["push", "-u", REMOTE, branch]))
            .await
        {
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "[GIT] Push rejected, falling back to force push");
                self.console.warn("Push failed, trying force push...");
                self.step("Force pushing to GitHub", args(&["push", "-f", REMOTE, branch]))
                    .await?;
                true
            }
        };

        self.console.blank();
        self.console.done("SUCCESS! Your project has been pushed to GitHub!");
        self.console.link("Repository", &self.config.repository_url());
        self.console.plain(&format!(
            "📊 View your code: {}/tree/{branch}",
            self.config.repository_url()
        ));
        info!(forced, "[GIT] Push complete");
        Ok(PushOutcome::Pushed { forced })
    }

    /// `git diff --cached --quiet` exits 0 when the index matches `HEAD`
    /// (or the empty tree on an unborn branch) and 1 when it differs.
    /// Any other status is a git error.
    async fn has_staged_changes(&self) -> Result<bool, PushError> {
        const STEP: &str = "Checking for changes";
        let output = self
            .git
            .run(args(&["diff", "--cached", "--quiet"]))
            .await
            .map_err(|source| PushError::Launch {
                step: STEP.to_string(),
                source,
            })?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => {
                let stderr = self.config.credentials.token.redact(output.stderr.trim());
                error!(step = STEP, ?code, stderr = %stderr, "[GIT] Step failed");
                self.console.fail(&format!("{STEP} failed:"));
                self.console.plain(&format!("Error: {stderr}"));
                let detail = if stderr.is_empty() {
                    format!("git diff exited with {code:?}")
                } else {
                    stderr
                };
                Err(PushError::Step {
                    step: STEP.to_string(),
                    detail,
                })
            }
        }
    }

    async fn step(&self, description: &str, argv: Vec<String>) -> Result<GitOutput, PushError> {
        self.console.step(description);
        let output = match self.git.run(argv).await {
            Ok(output) => output,
            Err(source) => {
                error!(step = description, error = %source, "[GIT] Step could not start");
                self.console.fail(&format!("{description} failed:"));
                self.console.plain(&format!("Error: {source}"));
                return Err(PushError::Launch {
                    step: description.to_string(),
                    source,
                });
            }
        };

        if output.success() {
            self.console.ok(&format!("{description} completed"));
            return Ok(output);
        }

        let secret = &self.config.credentials.token;
        let stderr = secret.redact(output.stderr.trim());
        let stdout = secret.redact(output.stdout.trim());
        error!(step = description, code = ?output.code, stderr = %stderr, "[GIT] Step failed");
        self.console.fail(&format!("{description} failed:"));
        self.console.plain(&format!("Error: {stderr}"));
        if !stdout.is_empty() {
            self.console.plain(&format!("Output: {stdout}"));
        }
        let detail = if stderr.is_empty() {
            match output.code {
                Some(code) => format!("git exited with code {code}"),
                None => "git was terminated by a signal".to_string(),
            }
        } else {
            stderr
        };
        Err(PushError::Step {
            step: description.to_string(),
            detail,
        })
    }
}
