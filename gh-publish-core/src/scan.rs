//! Recursive discovery of the files to publish.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::ignore::IgnoreFilter;

/// A file found under the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// Absolute (or root-joined) location on disk.
    pub local_path: PathBuf,
    /// Root-relative path with `/` separators; this is also the remote path.
    pub relative: String,
}

/// Converts a root-relative path into the `/`-separated form used for
/// ignore matching and as the repository path.
pub fn to_remote_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    joined.replace('\\', "/")
}

/// Walks `root` and returns every regular file the filter keeps, sorted by relative path.
///
/// Directories whose contents would all be ignored are not descended into.
/// Entries below the root that cannot be read are logged and skipped.
///
/// # Errors
/// Fails if `root` itself cannot be read.
pub fn collect_files(root: &Path, filter: &IgnoreFilter) -> std::io::Result<Vec<ProjectFile>> {
    info!(root = %root.display(), "[SCAN] Collecting project files");
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let keep = match entry.path().strip_prefix(root) {
                Ok(rel) => !filter.excludes_directory(&to_remote_path(rel)),
                Err(_) => true,
            };
            if !keep {
                debug!(path = %entry.path().display(), "[SCAN] Skipping ignored directory");
            }
            keep
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                error!(error = %e, "[SCAN] Failed to read project root");
                return Err(std::io::Error::other(e));
            }
            Err(e) => {
                warn!(error = %e, "[SCAN] Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = to_remote_path(rel);
        if filter.is_ignored(&relative) {
            debug!(path = %relative, "[SCAN] Ignored file");
            continue;
        }
        files.push(ProjectFile {
            local_path: entry.path().to_path_buf(),
            relative,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    info!(count = files.len(), "[SCAN] Collected project files");
    Ok(files)
}
