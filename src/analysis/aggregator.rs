//! Attendance aggregation and statistics.
//!
//! This module folds per-meeting attendance records into a single
//! [`AttendanceIndex`] and computes summary statistics over it.

use crate::analysis::extractor::extract_record;
use crate::models::{AttendanceIndex, AttendanceRecord, MeetingDocument};
use anyhow::Result;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Result of indexing every document of one repository.
#[derive(Debug, Clone, Default)]
pub struct IndexOutcome {
    /// The aggregated attendance.
    pub index: AttendanceIndex,
    /// Number of documents read.
    pub documents_read: usize,
    /// Number of documents that yielded no record.
    pub documents_skipped: usize,
}

/// Fold attendance records into an index.
pub fn aggregate<I>(records: I) -> AttendanceIndex
where
    I: IntoIterator<Item = AttendanceRecord>,
{
    records
        .into_iter()
        .fold(AttendanceIndex::default(), AttendanceIndex::absorb)
}

/// Extract and fold every document, one at a time.
///
/// Extraction failures are logged and the document is skipped. Errors
/// produced by the document source itself abort the pass.
pub fn index_documents<I>(documents: I) -> Result<IndexOutcome>
where
    I: IntoIterator<Item = Result<MeetingDocument>>,
{
    let mut source_error = None;
    let mut documents_read = 0;
    let mut documents_skipped = 0;

    let records = documents
        .into_iter()
        .map_while(|document| match document {
            Ok(document) => Some(document),
            Err(e) => {
                source_error = Some(e);
                None
            }
        })
        .filter_map(|document| {
            documents_read += 1;

            match extract_record(&document) {
                Ok(record) => {
                    debug!(
                        "{}: {} present",
                        document.display_name(),
                        record.participants.len()
                    );
                    Some(record)
                }
                Err(e) => {
                    warn!("{}", e);
                    documents_skipped += 1;
                    None
                }
            }
        });

    let index = aggregate(records);

    match source_error {
        Some(e) => Err(e),
        None => Ok(IndexOutcome {
            index,
            documents_read,
            documents_skipped,
        }),
    }
}

/// Number of meetings attended per member, highest first.
///
/// Ties are broken by member name.
pub fn attendance_counts(index: &AttendanceIndex) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = index
        .members
        .iter()
        .map(|(member, dates)| (member.as_str(), dates.len()))
        .collect();

    counts.sort_by_key(|&(member, count)| (Reverse(count), member));
    counts
}

/// The `n` members with the most meetings attended.
pub fn most_frequent_attendees(index: &AttendanceIndex, n: usize) -> Vec<(&str, usize)> {
    let mut counts = attendance_counts(index);
    counts.truncate(n);
    counts
}

/// Attendance rate of a member across all known meetings (0.0 - 1.0).
pub fn attendance_rate(index: &AttendanceIndex, member: &str) -> f64 {
    if index.dates.is_empty() {
        return 0.0;
    }

    let attended = index.members.get(member).map(|d| d.len()).unwrap_or(0);
    attended as f64 / index.dates.len() as f64
}
