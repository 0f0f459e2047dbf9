//! Attendance analysis.
//!
//! Extraction turns one meeting document into an attendance record;
//! aggregation folds those records into a per-member index.

pub mod aggregator;
pub mod extractor;

pub use aggregator::*;
