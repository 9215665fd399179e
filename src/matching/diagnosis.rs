//! Normalization trace for tuning rule sets.
//!
//! Shows, for every name in both tables, the raw value next to the
//! comparison key the reconciler would score with.

use serde::Serialize;

use crate::core::dataset::{cell_text, Cell, Dataset, Record};
use crate::core::layout::{SourceLayout, TargetLayout};
use crate::rules::normalizer::comparison_key;
use crate::rules::parser::RuleSet;
use crate::utils::validation::DatasetRole;

/// Header row of the trace table
pub const TRACE_HEADER: [&str; 2] = ["Original name", "Comparison key"];

/// One traced name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub dataset: DatasetRole,
    pub original: String,
    pub key: String,
}

/// Result of a diagnostics pass: target names first, then source names
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationTrace {
    pub entries: Vec<TraceEntry>,
}

impl NormalizationTrace {
    /// Two-column dataset with [`TRACE_HEADER`] as its header row
    #[must_use]
    pub fn to_dataset(&self) -> Dataset {
        let mut rows: Vec<Record> = vec![TRACE_HEADER.into_iter().map(Cell::from).collect()];
        rows.extend(
            self.entries
                .iter()
                .map(|e| vec![Cell::from(e.original.as_str()), Cell::from(e.key.as_str())]),
        );
        Dataset::new(rows)
    }

    /// Entries whose comparison key differs from the plain lowercased name
    pub fn changed(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries
            .iter()
            .filter(|e| e.original.to_lowercase() != e.key)
    }
}

/// Walks both tables and normalizes every name with the same rules the
/// reconciler uses
pub struct DiagnosticsReporter<'a> {
    rules: &'a RuleSet,
    target_layout: TargetLayout,
    source_layout: SourceLayout,
}

impl<'a> DiagnosticsReporter<'a> {
    #[must_use]
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            target_layout: TargetLayout::default(),
            source_layout: SourceLayout::default(),
        }
    }

    #[must_use]
    pub fn with_layouts(mut self, target: TargetLayout, source: SourceLayout) -> Self {
        self.target_layout = target;
        self.source_layout = source;
        self
    }

    /// Trace the data rows of both tables. Neither dataset is modified.
    #[must_use]
    pub fn trace(&self, target: &Dataset, source: &Dataset) -> NormalizationTrace {
        self.trace_records(target.records(), source.records())
    }

    /// Trace the way a single-use caller expects: both header rows are
    /// removed from the datasets and not restored.
    pub fn trace_consuming(&self, target: &mut Dataset, source: &mut Dataset) -> NormalizationTrace {
        target.take_header();
        source.take_header();
        self.trace_records(&target.rows, &source.rows)
    }

    fn trace_records(&self, target: &[Record], source: &[Record]) -> NormalizationTrace {
        let targets = target
            .iter()
            .map(|r| (DatasetRole::Target, cell_text(r, self.target_layout.name)));
        let sources = source
            .iter()
            .map(|r| (DatasetRole::Source, cell_text(r, self.source_layout.name)));

        let entries = targets
            .chain(sources)
            .map(|(dataset, original)| TraceEntry {
                dataset,
                key: comparison_key(&original, self.rules),
                original,
            })
            .collect();

        NormalizationTrace { entries }
    }
}

/// Non-destructive trace with the default layouts
#[must_use]
pub fn diagnose(target: &Dataset, source: &Dataset, rules: &RuleSet) -> NormalizationTrace {
    DiagnosticsReporter::new(rules).trace(target, source)
}

/// Single-use trace with the default layouts; consumes both header rows
pub fn diagnose_consuming(
    target: &mut Dataset,
    source: &mut Dataset,
    rules: &RuleSet,
) -> NormalizationTrace {
    DiagnosticsReporter::new(rules).trace_consuming(target, source)
}
