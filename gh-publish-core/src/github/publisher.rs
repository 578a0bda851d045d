//! REST API path: make every kept local file exist, with matching content, on the target branch.
//!
//! # Responsibilities
//! - Optionally create the repository first; "already exists" counts as success
//! - For each file: read, base64-encode, look up, then create or update
//! - Record a [`FileOutcome`] per file and keep going after a failure
//!
//! Files are processed strictly one after another.

use tracing::{error, info, warn};

use crate::config::PublishConfig;
use crate::console::Console;
use crate::contract::{ApiError, ContentsApi, NewRepository, RepositoryCreation};
use crate::ignore::IgnoreFilter;
use crate::scan::{collect_files, ProjectFile};

use super::contents::put_request;
use super::report::{FileOutcome, PublishReport, UploadStatus};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to scan project directory: {0}")]
    Scan(#[from] std::io::Error),
    #[error("failed to create repository: {0}")]
    CreateRepository(#[source] ApiError),
}

#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    pub create_repository: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            create_repository: true,
        }
    }
}

/// Creates the target repository, treating "already exists" (and any other
/// non-transport answer) as reachable.
///
/// # Errors
/// Only a transport-level failure is returned.
pub async fn ensure_repository<A>(
    api: &A,
    config: &PublishConfig,
    console: Console,
) -> Result<RepositoryCreation, ApiError>
where
    A: ContentsApi + ?Sized,
{
    console.step("Checking/creating repository");
    let req = NewRepository {
        name: config.credentials.repo.clone(),
        description: config.repository.description.clone(),
        private: config.repository.private,
        auto_init: config.repository.auto_init,
    };
    let outcome = api.create_repository(req).await.map_err(|e| {
        console.fail(&format!("Repository check failed: {e}"));
        e
    })?;
    match outcome {
        RepositoryCreation::Created => console.ok("Repository created successfully"),
        RepositoryCreation::AlreadyExists => console.ok("Repository already exists"),
        RepositoryCreation::Other(status) => {
            warn!(status, "[API] Repository creation returned an unexpected status, continuing");
            console.ok("Repository accessible");
        }
    }
    Ok(outcome)
}

/// Uploads one file. Never fails: errors become [`UploadStatus::Failed`].
pub async fn publish_file<A>(api: &A, file: &ProjectFile, branch: &str) -> FileOutcome
where
    A: ContentsApi + ?Sized,
{
    let path = file.relative.clone();
    let status = match upload(api, file, branch).await {
        Ok(status) => status,
        Err(reason) => {
            error!(path = %path, reason = %reason, "[API] Upload failed");
            UploadStatus::Failed(reason)
        }
    };
    FileOutcome { path, status }
}

async fn upload<A>(api: &A, file: &ProjectFile, branch: &str) -> Result<UploadStatus, String>
where
    A: ContentsApi + ?Sized,
{
    let bytes = tokio::fs::read(&file.local_path)
        .await
        .map_err(|e| format!("error reading {}: {e}", file.local_path.display()))?;

    let existing = api
        .get_file(&file.relative, branch)
        .await
        .map_err(|e| format!("lookup failed: {e}"))?;
    let status = if existing.is_some() {
        UploadStatus::Updated
    } else {
        UploadStatus::Created
    };

    let req = put_request(&file.relative, &bytes, branch, existing);
    api.put_file(&file.relative, req)
        .await
        .map_err(|e| format!("write failed: {e}"))?;
    Ok(status)
}

/// Uploads `files` in order, printing one progress block per file.
pub async fn publish_files<A>(
    api: &A,
    files: &[ProjectFile],
    branch: &str,
    console: Console,
) -> PublishReport
where
    A: ContentsApi + ?Sized,
{
    let total = files.len();
    let mut report = PublishReport::default();
    for (i, file) in files.iter().enumerate() {
        console.upload(i + 1, total, &file.relative);
        let outcome = publish_file(api, file, branch).await;
        match &outcome.status {
            UploadStatus::Created | UploadStatus::Updated => {
                console.item(true, "Uploaded successfully");
            }
            UploadStatus::Failed(reason) => {
                console.item(false, &format!("Upload failed: {reason}"));
            }
        }
        report.outcomes.push(outcome);
    }
    info!(
        succeeded = report.succeeded(),
        total = report.total(),
        "[API] Upload batch finished"
    );
    report
}

/// The whole API path: optional repository creation, scan, upload.
///
/// # Errors
/// Scan failures and repository-creation transport failures abort the run;
/// per-file problems are reported in the returned [`PublishReport`].
pub async fn publish_project<A>(
    api: &A,
    config: &PublishConfig,
    options: PublishOptions,
    console: Console,
) -> Result<PublishReport, PublishError>
where
    A: ContentsApi + ?Sized,
{
    info!(repository = %config.credentials.full_name(), "[API] Starting publish");
    console.plain(&format!("📂 Repository: {}", config.credentials.full_name()));
    console.blank();

    if options.create_repository {
        ensure_repository(api, config, console)
            .await
            .map_err(PublishError::CreateRepository)?;
    }

    let filter = IgnoreFilter::new(&config.ignore_patterns);
    let files = collect_files(&config.project_root, &filter)?;
    console.step(&format!("Found {} files to upload", files.len()));
    console.blank();

    let report = publish_files(api, &files, &config.branch, console).await;

    console.blank();
    console.done(&format!(
        "Upload complete! {}/{} files uploaded successfully",
        report.succeeded(),
        report.total()
    ));
    console.link("Repository", &config.repository_url());
    Ok(report)
}
