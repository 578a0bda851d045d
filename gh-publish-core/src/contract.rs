//! # contract: the two seams between gh-publish and the outside world
//!
//! - [`ContentsApi`]: the subset of the GitHub REST API the publisher needs
//!   (repository creation, content lookup, content write).
//! - [`GitRunner`]: running the system `git` executable in the project root.
//!
//! Request and response types are plain data. Real implementations live in
//! [`crate::github::client`] and [`crate::git::runner`]; tests use the
//! `mockall` mocks generated here (exported under `test-export-mocks`).

use async_trait::async_trait;
#[allow(unused_imports)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Failure talking to the REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("invalid request url {url}: {message}")]
    Url { url: String, message: String },
}

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

/// What repository creation reported. Every variant lets the run continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryCreation {
    Created,
    AlreadyExists,
    /// Some other status; the repository is assumed reachable.
    Other(u16),
}

/// Metadata of a file already present on the remote branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    /// Content identifier that must be echoed back to overwrite the file.
    pub sha: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64 of the file bytes.
    pub content: String,
    pub branch: String,
    /// Present only when updating an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Trait over the GitHub contents API.
///
/// The trait is implemented by [`crate::github::GitHubClient`] and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// Create the target repository under the authenticated user.
    async fn create_repository(&self, req: NewRepository) -> Result<RepositoryCreation, ApiError>;

    /// Look up a file on `branch`. `Ok(None)` means the remote reported not found.
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>, ApiError>;

    /// Create or update a file.
    async fn put_file(&self, path: &str, req: PutContentRequest) -> Result<(), ApiError>;
}

/// Captured result of one `git` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to launch git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Trait for running `git` subcommands in the project root.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Whether the project root already holds a repository.
    fn has_repository(&self) -> bool;

    /// Run `git <args>` and capture its output. A non-zero exit is not an error here.
    async fn run(&self, args: Vec<String>) -> Result<GitOutput, GitError>;
}
