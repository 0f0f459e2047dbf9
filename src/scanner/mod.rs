//! Meeting document discovery.
//!
//! This module lists the meeting-minutes files of a checked-out repository
//! and reads them lazily as [`MeetingDocument`]s.

use crate::models::MeetingDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Default name of the directory holding meeting minutes.
pub const DEFAULT_MEETINGS_DIR: &str = "meetings";

/// A meeting file found during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name without extension.
    pub date: String,
    /// File size in bytes.
    pub size: u64,
}

/// Scanner for the meetings directory of one repository.
pub struct MeetingScanner {
    meetings_root: PathBuf,
}

impl MeetingScanner {
    /// Create a scanner for `<repo_root>/<meetings_dir>`.
    pub fn new(repo_root: &Path, meetings_dir: &str) -> Self {
        Self {
            meetings_root: repo_root.join(meetings_dir),
        }
    }

    /// Directory being scanned.
    pub fn meetings_root(&self) -> &Path {
        &self.meetings_root
    }

    /// List every regular file directly inside the meetings directory.
    ///
    /// Entries are returned in file-name order. Anything that is not a
    /// regular file is skipped.
    pub fn scan(&self) -> Result<Vec<ScannedDocument>> {
        let mut documents = Vec::new();

        let walker = WalkDir::new(&self.meetings_root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.with_context(|| {
                format!(
                    "Failed to list meetings directory: {}",
                    self.meetings_root.display()
                )
            })?;

            if !entry.file_type().is_file() {
                debug!("Skipping non-file entry: {}", entry.path().display());
                continue;
            }

            let metadata = entry
                .metadata()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?;

            documents.push(ScannedDocument {
                path: entry.path().to_path_buf(),
                date: document_date(entry.path()),
                size: metadata.len(),
            });
        }

        Ok(documents)
    }

    /// Lazily read every scanned document.
    ///
    /// The listing happens up front; each file is read only when the
    /// iterator reaches it.
    pub fn documents(&self) -> Result<impl Iterator<Item = Result<MeetingDocument>>> {
        let scanned = self.scan()?;
        Ok(scanned.into_iter().map(read_document))
    }
}

/// Date key of a meeting file: its name without the extension.
pub fn document_date(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Read one scanned file as UTF-8 text.
fn read_document(scanned: ScannedDocument) -> Result<MeetingDocument> {
    debug!("Reading {} ({} bytes)", scanned.path.display(), scanned.size);

    let content = fs::read_to_string(&scanned.path)
        .with_context(|| format!("Failed to read {}", scanned.path.display()))?;

    Ok(MeetingDocument {
        date: scanned.date,
        path: scanned.path,
        content,
    })
}
