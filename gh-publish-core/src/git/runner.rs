//! [`GitRunner`] backed by the system `git` binary via [`tokio::process::Command`].
//!
//! Arguments are passed as a list, never through a shell. `GIT_TERMINAL_PROMPT=0`
//! makes a bad token fail fast instead of waiting for a password prompt.
//! Logged argument lists are redacted with the configured token.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use crate::config::Secret;
use crate::contract::{GitError, GitOutput, GitRunner};

pub struct SystemGit {
    program: PathBuf,
    workdir: PathBuf,
    secret: Secret,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>, secret: Secret) -> Self {
        Self::with_program("git", workdir, secret)
    }

    pub fn with_program(
        program: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
        secret: Secret,
    ) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
            secret,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    fn has_repository(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    async fn run(&self, args: Vec<String>) -> Result<GitOutput, GitError> {
        let shown = self.secret.redact(&args.join(" "));
        debug!(args = %shown, workdir = %self.workdir.display(), "[GIT] Running git");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                error!(error = %e, args = %shown, "[GIT] Failed to launch git");
                GitError::Spawn(e)
            })?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(args = %shown, code = ?result.code, "[GIT] git finished");
        Ok(result)
    }
}
