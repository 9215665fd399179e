//! Reconciliation engine, edit distance scoring and diagnostics.
//!
//! - [`Reconciler`]: matches every source record to its closest target record
//! - [`edit_distance`]: unit-cost Levenshtein distance between comparison keys
//! - [`DiagnosticsReporter`]: shows how every name is normalized
//! - [`format_summary`]: human-readable report of a run
//!
//! ## Matching Algorithm
//!
//! For each source record, in input order:
//!
//! 1. Normalize its name into a comparison key
//! 2. Score the key against every target key (or only the target rows of the
//!    same corporation and manufacturer, with [`MatchScope::CorporationManufacturer`])
//! 3. Sort candidates by distance, keeping target order on ties
//! 4. Take the closest candidate; flag it as a duplicate if an earlier source
//!    record already took the same target name
//! 5. Attach a ranked shortlist when the distance is not zero
//!
//! ## Example
//!
//! ```rust
//! use name_recon::{Dataset, RuleSet, Reconciler};
//!
//! let target = Dataset::from_text_rows([
//!     vec!["id", "", "", "", "corp", "man", "name", "tag"],
//!     vec!["1", "", "", "", "Acme", "Acme Labs", "widgetone", "T1"],
//! ]);
//! let mut source = Dataset::from_text_rows([
//!     vec!["id", "corp", "man", "name"],
//!     vec!["1", "Acme", "Acme Labs", "Widget One"],
//! ]);
//!
//! let rules = RuleSet::parse("");
//! let result = Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
//! assert_eq!(result.outcomes[0].distance, 1);
//! assert_eq!(result.summary.uncertain_count, 1);
//! ```
//!
//! [`MatchScope::CorporationManufacturer`]: crate::core::types::MatchScope::CorporationManufacturer

pub mod diagnosis;
pub mod distance;
pub mod engine;
pub mod summary;

pub use diagnosis::{diagnose, diagnose_consuming, DiagnosticsReporter, NormalizationTrace};
pub use distance::edit_distance;
pub use engine::{reconcile, MatchingConfig, ReconError, Reconciler, Reconciliation};
pub use summary::format_summary;
