//! GitHub REST API publish path.

pub mod client;
pub mod contents;
pub mod publisher;
pub mod report;

pub use client::GitHubClient;
pub use contents::{decode_content, encode_content};
pub use publisher::{
    ensure_repository, publish_file, publish_files, publish_project, PublishError, PublishOptions,
};
pub use report::{FileOutcome, PublishReport, UploadStatus};
