use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::dataset::{cell_text, Cell, Dataset, Record};
use crate::core::layout::{SourceLayout, TargetLayout};
use crate::core::types::{
    Annotation, MatchCandidate, MatchScope, ReconciliationOutcome, Summary,
};
use crate::matching::distance::edit_distance;
use crate::rules::normalizer::comparison_key;
use crate::rules::parser::RuleSet;
use crate::utils::validation::{check_width, DatasetRole};

/// Default length of the shortlist attached to uncertain matches
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Separator between entries of the rendered candidate list
pub const CANDIDATE_SEPARATOR: &str = "; ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    #[error("target dataset has no data rows to match against")]
    NoTargetData,

    #[error(
        "source row {row}: no target rows for corporation '{corporation}' and manufacturer '{manufacturer}'"
    )]
    NoCandidates {
        row: usize,
        corporation: String,
        manufacturer: String,
    },

    #[error("{dataset} row {row}: needs at least {required} columns, found {found}")]
    MissingColumn {
        dataset: DatasetRole,
        row: usize,
        required: usize,
        found: usize,
    },
}

/// Configuration for the reconciler
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// Maximum shortlist length for uncertain matches
    pub max_candidates: Option<usize>,
    /// Which target rows each source row is scored against
    pub scope: MatchScope,
    pub target_layout: TargetLayout,
    pub source_layout: SourceLayout,
}

impl MatchingConfig {
    #[must_use]
    pub fn max_candidates(&self) -> usize {
        self.max_candidates.unwrap_or(DEFAULT_MAX_CANDIDATES)
    }
}

/// Result of one reconciliation run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub summary: Summary,
    /// One outcome per source data row, in input order
    pub outcomes: Vec<ReconciliationOutcome>,
}

/// A target row prepared for scoring
struct TargetEntry {
    name: Cell,
    tag: Cell,
    key: String,
    corporation: String,
    manufacturer: String,
}

/// Matches source records to target records by normalized-name edit distance.
///
/// Records are scanned in input order. The first source record to pick a
/// target name claims it; later records picking the same name are annotated
/// as duplicates whatever their distance. The scan is greedy per record, not
/// a globally optimal assignment.
pub struct Reconciler<'a> {
    rules: &'a RuleSet,
    config: MatchingConfig,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler with default configuration
    #[must_use]
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            config: MatchingConfig::default(),
        }
    }

    /// Create a reconciler with custom configuration
    #[must_use]
    pub fn with_config(rules: &'a RuleSet, config: MatchingConfig) -> Self {
        Self { rules, config }
    }

    /// Match every source record and write the outcome into its output columns.
    ///
    /// Header rows are left in place. Nothing is written unless every source
    /// record could be matched.
    ///
    /// # Errors
    ///
    /// Returns `ReconError::MissingColumn` when a row is too short to read,
    /// `ReconError::NoTargetData` when there are source records but no target
    /// records, and `ReconError::NoCandidates` when a grouped scope leaves a
    /// source record with nothing to compare against.
    pub fn reconcile(
        &self,
        target: &Dataset,
        source: &mut Dataset,
    ) -> Result<Reconciliation, ReconError> {
        let outcomes = self.match_records(target, source)?;
        let summary = summarize(&outcomes);

        let targets = target.records();
        let layout = self.config.source_layout;
        for (record, outcome) in source.records_mut().iter_mut().zip(&outcomes) {
            let matched = &targets[outcome.target_row];
            write_outcome(record, outcome, matched, &self.config.target_layout, &layout);
        }

        info!(
            exact = summary.exact_count,
            uncertain = summary.uncertain_count,
            "reconciled {} source records against {} target records",
            outcomes.len(),
            targets.len()
        );

        Ok(Reconciliation { summary, outcomes })
    }

    /// Compute outcomes without touching either dataset
    ///
    /// # Errors
    ///
    /// Same conditions as [`Reconciler::reconcile`].
    pub fn match_records(
        &self,
        target: &Dataset,
        source: &Dataset,
    ) -> Result<Vec<ReconciliationOutcome>, ReconError> {
        let grouped = self.config.scope == MatchScope::CorporationManufacturer;
        let t_layout = self.config.target_layout;
        let s_layout = self.config.source_layout;

        check_width(DatasetRole::Target, target.records(), t_layout.required_width())?;
        check_width(
            DatasetRole::Source,
            source.records(),
            s_layout.required_width(grouped),
        )?;

        if source.records().is_empty() {
            return Ok(Vec::new());
        }
        if target.records().is_empty() {
            return Err(ReconError::NoTargetData);
        }

        let entries: Vec<TargetEntry> = target
            .records()
            .iter()
            .map(|record| self.prepare_target(record))
            .collect();

        let mut claimed: HashSet<String> = HashSet::new();
        let mut outcomes = Vec::with_capacity(source.records().len());

        for (row, record) in source.records().iter().enumerate() {
            let key = comparison_key(&cell_text(record, s_layout.name), self.rules);
            let corporation = cell_text(record, s_layout.corporation);
            let manufacturer = cell_text(record, s_layout.manufacturer);

            let mut candidates: Vec<MatchCandidate> = entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    !grouped
                        || (same_group(&entry.corporation, &corporation)
                            && same_group(&entry.manufacturer, &manufacturer))
                })
                .map(|(target_row, entry)| MatchCandidate {
                    target_name: entry.name.to_string(),
                    target_tag: entry.tag.to_string(),
                    distance: edit_distance(&key, &entry.key),
                    target_row,
                })
                .collect();

            // Stable: ties keep target row order
            candidates.sort_by_key(|c| c.distance);

            let Some(best) = candidates.first().cloned() else {
                return Err(ReconError::NoCandidates {
                    row,
                    corporation,
                    manufacturer,
                });
            };

            let annotation = if claimed.insert(best.target_name.clone()) {
                Annotation::None
            } else {
                Annotation::Duplicate
            };

            let shortlist = (best.distance > 0).then(|| {
                candidates.truncate(self.config.max_candidates());
                candidates
            });

            debug!(
                row,
                key = %key,
                matched = %best.target_name,
                distance = best.distance,
                duplicate = annotation == Annotation::Duplicate,
                "matched source record"
            );

            outcomes.push(ReconciliationOutcome {
                source_row: row,
                matched_name: best.target_name,
                matched_tag: best.target_tag,
                distance: best.distance,
                annotation,
                candidates: shortlist,
                target_row: best.target_row,
            });
        }

        Ok(outcomes)
    }

    fn prepare_target(&self, record: &Record) -> TargetEntry {
        let layout = &self.config.target_layout;
        let name = record.get(layout.name).cloned().unwrap_or_default();
        TargetEntry {
            key: comparison_key(&name.to_string(), self.rules),
            name,
            tag: record.get(layout.tag).cloned().unwrap_or_default(),
            corporation: cell_text(record, layout.corporation),
            manufacturer: cell_text(record, layout.manufacturer),
        }
    }
}

/// Reconcile with the default configuration
///
/// # Errors
///
/// See [`Reconciler::reconcile`].
pub fn reconcile(
    target: &Dataset,
    source: &mut Dataset,
    rules: &RuleSet,
) -> Result<Reconciliation, ReconError> {
    Reconciler::new(rules).reconcile(target, source)
}

/// Group cells agree when their trimmed text matches, ignoring ASCII case
fn same_group(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn summarize(outcomes: &[ReconciliationOutcome]) -> Summary {
    let (exact, uncertain): (Vec<_>, Vec<_>) = outcomes.iter().partition(|o| o.is_exact());
    let distance_sum = uncertain.iter().map(|o| o.distance).sum();
    Summary::from_totals(exact.len(), uncertain.len(), distance_sum)
}

/// Render a shortlist as `name (tag); name (tag); ...`
#[must_use]
pub fn format_candidate_list(candidates: &[MatchCandidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(CANDIDATE_SEPARATOR)
}

fn write_outcome(
    record: &mut Record,
    outcome: &ReconciliationOutcome,
    matched: &Record,
    target_layout: &TargetLayout,
    layout: &SourceLayout,
) {
    if record.len() < layout.output_width() {
        record.resize(layout.output_width(), Cell::Empty);
    }

    record[layout.out_tag] = matched.get(target_layout.tag).cloned().unwrap_or_default();
    record[layout.out_name] = matched.get(target_layout.name).cloned().unwrap_or_default();
    record[layout.out_distance] = Cell::from(outcome.distance);
    record[layout.out_comment] = match outcome.annotation {
        Annotation::None => Cell::Empty,
        Annotation::Duplicate => Cell::from(outcome.annotation.to_string()),
    };
    record[layout.out_candidates] = outcome
        .candidates
        .as_deref()
        .map_or(Cell::Empty, |c| Cell::from(format_candidate_list(c)));
}
