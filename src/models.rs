//! Data models for the attendance matrix.
//!
//! This module contains the core data structures passed between the
//! scanner, the extraction/aggregation pass and the report renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A single meeting-minutes file read from the `meetings` directory.
#[derive(Debug, Clone)]
pub struct MeetingDocument {
    /// Date key, taken verbatim from the file name without its extension.
    pub date: String,
    /// Path the document was read from.
    pub path: PathBuf,
    /// Raw UTF-8 content.
    pub content: String,
}

impl MeetingDocument {
    /// Creates a document with no backing path (mostly useful in tests).
    #[cfg(test)]
    pub fn new(date: impl Into<String>, content: impl Into<String>) -> Self {
        let date = date.into();
        Self {
            path: PathBuf::from(format!("{}.md", date)),
            date,
            content: content.into(),
        }
    }

    /// File name used when reporting problems with this document.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Participants found present in one meeting.
///
/// Identifiers are lower-cased and carry no leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Meeting date key.
    pub date: String,
    /// Normalized participant identifiers.
    pub participants: BTreeSet<String>,
}

/// Aggregated attendance: who was present on which dates.
///
/// `dates` is always the union of every member's date set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceIndex {
    /// Participant identifier to the dates they attended.
    pub members: BTreeMap<String, BTreeSet<String>>,
    /// Every meeting date that contributed at least one participant.
    pub dates: BTreeSet<String>,
}

impl AttendanceIndex {
    /// Folds one record into the index.
    pub fn absorb(mut self, record: AttendanceRecord) -> Self {
        if record.participants.is_empty() {
            return self;
        }

        for participant in record.participants {
            self.members
                .entry(participant)
                .or_default()
                .insert(record.date.clone());
        }
        self.dates.insert(record.date);

        self
    }

    /// Number of distinct participants.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of distinct meeting dates.
    pub fn meeting_count(&self) -> usize {
        self.dates.len()
    }

    /// Returns true when `member` was present on `date`.
    pub fn attended(&self, member: &str, date: &str) -> bool {
        self.members
            .get(member)
            .map(|dates| dates.contains(date))
            .unwrap_or(false)
    }

    /// Members in lexicographic order.
    pub fn sorted_members(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }

    /// Dates newest first (reverse lexicographic, which matches
    /// reverse chronological order for `YYYY-MM-DD` stems).
    pub fn dates_newest_first(&self) -> Vec<&str> {
        self.dates.iter().rev().map(String::as_str).collect()
    }

    /// Returns true when no document contributed anything.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Metadata about a generated attendance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Repository identifier (`owner/name`).
    pub repository: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of meeting documents read.
    pub documents_read: usize,
    /// Number of documents that yielded no attendance record.
    pub documents_skipped: usize,
}

/// The complete attendance report for one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregated attendance.
    pub index: AttendanceIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, participants: &[&str]) -> AttendanceRecord {
        AttendanceRecord {
            date: date.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_absorb_creates_member_entries() {
        let index = AttendanceIndex::default()
            .absorb(record("2020-01-01", &["alice", "bob"]))
            .absorb(record("2020-02-01", &["bob"]));

        assert_eq!(index.member_count(), 2);
        assert_eq!(index.meeting_count(), 2);
        assert!(index.attended("bob", "2020-01-01"));
        assert!(index.attended("bob", "2020-02-01"));
        assert!(!index.attended("alice", "2020-02-01"));
        assert!(!index.attended("carol", "2020-01-01"));
    }

    #[test]
    fn test_absorb_empty_record_adds_no_date() {
        let index = AttendanceIndex::default().absorb(record("2020-01-01", &[]));
        assert!(index.is_empty());
        assert!(index.dates.is_empty());
    }

    #[test]
    fn test_dates_newest_first() {
        let index = AttendanceIndex::default()
            .absorb(record("2019-12-05", &["alice"]))
            .absorb(record("2020-03-01", &["alice"]))
            .absorb(record("2020-01-15", &["bob"]));

        assert_eq!(
            index.dates_newest_first(),
            vec!["2020-03-01", "2020-01-15", "2019-12-05"]
        );
        assert_eq!(index.sorted_members(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_display_name_uses_file_name() {
        let doc = MeetingDocument::new("2020-01-01", "");
        assert_eq!(doc.display_name(), "2020-01-01.md");
    }
}
