//! Centralized validation and helper functions.

use serde::Serialize;

use crate::core::dataset::Record;
use crate::matching::engine::ReconError;

/// Maximum number of rows accepted from a single table file
pub const MAX_ROWS: usize = 1_000_000;

/// Which side of a reconciliation a dataset plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRole {
    Target,
    Source,
}

impl std::fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target => write!(f, "target"),
            Self::Source => write!(f, "source"),
        }
    }
}

/// Check that every record reaches `required` columns.
///
/// Row numbers in the error are 0-based positions among the data rows.
///
/// # Errors
///
/// Returns `ReconError::MissingColumn` for the first record that is too short.
pub fn check_width(role: DatasetRole, records: &[Record], required: usize) -> Result<(), ReconError> {
    match records.iter().position(|r| r.len() < required) {
        Some(row) => Err(ReconError::MissingColumn {
            dataset: role,
            row,
            required,
            found: records[row].len(),
        }),
        None => Ok(()),
    }
}

/// Whether a table already holding `count` rows is full.
///
/// Call this with the current count BEFORE adding a new row.
#[must_use]
pub fn row_limit_reached(count: usize) -> bool {
    count >= MAX_ROWS
}
