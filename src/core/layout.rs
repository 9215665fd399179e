//! Positional column layouts for the two tables.
//!
//! Column meaning is a fixed contract with the loader. The defaults describe
//! the catalog export (target) and the inventory sheet (source).

use serde::{Deserialize, Serialize};

/// Column indices read from target (reference catalog) rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetLayout {
    pub corporation: usize,
    pub manufacturer: usize,
    pub name: usize,
    pub tag: usize,
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self {
            corporation: 4,
            manufacturer: 5,
            name: 6,
            tag: 7,
        }
    }
}

impl TargetLayout {
    /// Minimum row width needed to read every column
    #[must_use]
    pub fn required_width(&self) -> usize {
        [self.corporation, self.manufacturer, self.name, self.tag]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Column indices read from and written to source rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    pub corporation: usize,
    pub manufacturer: usize,
    pub name: usize,
    pub out_tag: usize,
    pub out_name: usize,
    pub out_distance: usize,
    pub out_comment: usize,
    pub out_candidates: usize,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            corporation: 1,
            manufacturer: 2,
            name: 3,
            out_tag: 4,
            out_name: 5,
            out_distance: 6,
            out_comment: 7,
            out_candidates: 8,
        }
    }
}

impl SourceLayout {
    /// Width a source row must reach before matching can read it
    #[must_use]
    pub fn required_width(&self, grouped: bool) -> usize {
        let max = if grouped {
            self.name.max(self.corporation).max(self.manufacturer)
        } else {
            self.name
        };
        max + 1
    }

    /// Width a source row is padded to so every output column exists
    #[must_use]
    pub fn output_width(&self) -> usize {
        [
            self.out_tag,
            self.out_name,
            self.out_distance,
            self.out_comment,
            self.out_candidates,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}
