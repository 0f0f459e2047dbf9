//! Attendance extraction from meeting minutes.
//!
//! A meeting document lists its attendees under a `# Present` heading as
//! GitHub-style `@mentions`. This module locates that section and turns the
//! mentions into a normalized [`AttendanceRecord`].

use crate::models::{AttendanceRecord, MeetingDocument};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;

/// Mention-style participant identifier.
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9-]+").expect("mention pattern is valid"));

/// Heading text that opens the attendee list.
const PRESENT_HEADING: &str = "present";

/// Reasons a document yields no attendance record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No Present section found for {document}")]
    MissingPresentSection { document: String },

    #[error("Discovered no present members for {document}")]
    EmptyPresentList { document: String },
}

/// Returns the body of the first `# Present` section.
///
/// The body starts on the line after the heading and stops before the next
/// line beginning with `#`, or at the end of the text.
pub fn find_present_section(text: &str) -> Option<&str> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let line_end = offset + line.len();

        match start {
            None if is_present_heading(line) => start = Some(line_end),
            Some(begin) if line.starts_with('#') => return Some(&text[begin..offset]),
            _ => {}
        }

        offset = line_end;
    }

    start.map(|begin| &text[begin..])
}

/// Checks whether a line is a heading reading exactly "Present".
fn is_present_heading(line: &str) -> bool {
    let line = line.trim_end();
    let rest = line.trim_start_matches('#');

    if rest.len() == line.len() || !rest.starts_with([' ', '\t']) {
        return false;
    }

    rest.trim().eq_ignore_ascii_case(PRESENT_HEADING)
}

/// Collects every `@mention` in document order, duplicates included.
pub fn extract_mentions(section: &str) -> Vec<&str> {
    MENTION.find_iter(section).map(|m| m.as_str()).collect()
}

/// Lower-cases a mention and strips its `@` marker.
pub fn normalize_mention(mention: &str) -> String {
    mention.trim_start_matches('@').to_lowercase()
}

/// Extracts the attendance record of one meeting document.
pub fn extract_record(document: &MeetingDocument) -> Result<AttendanceRecord, ExtractError> {
    let section = find_present_section(&document.content).ok_or_else(|| {
        ExtractError::MissingPresentSection {
            document: document.display_name(),
        }
    })?;

    let participants: BTreeSet<String> = extract_mentions(section)
        .into_iter()
        .map(normalize_mention)
        .collect();

    if participants.is_empty() {
        return Err(ExtractError::EmptyPresentList {
            document: document.display_name(),
        });
    }

    Ok(AttendanceRecord {
        date: document.date.clone(),
        participants,
    })
}
