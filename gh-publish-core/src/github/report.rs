//! Per-file results of an API publish run.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Created,
    Updated,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: String,
    pub status: UploadStatus,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self.status, UploadStatus::Failed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub outcomes: Vec<FileOutcome>,
}

impl PublishReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// A run counts as successful when at least one file made it.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }
}
