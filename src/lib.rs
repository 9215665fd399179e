//! # name-recon
//!
//! A library for reconciling a table of records against a reference table by
//! approximate name matching.
//!
//! Names rarely agree exactly between two spreadsheets: one says
//! "Widget x30", the other "WIDGET 30"; one writes "Corp.", the other
//! "Corporation". `name-recon` normalizes every name through an ordered,
//! user-written rule set, scores every pair by edit distance and annotates
//! each source record with its closest reference record.
//!
//! ## Features
//!
//! - **Rule language**: literal and regular-expression substitutions, applied in order
//! - **Edit distance scoring**: unit-cost Levenshtein distance on normalized keys
//! - **Duplicate detection**: the first record to claim a reference name wins
//! - **Ambiguity surfacing**: ranked shortlists for every uncertain match
//! - **Diagnostics**: a trace of how every name is normalized, to tune rules
//!
//! ## Example
//!
//! ```rust
//! use name_recon::{Dataset, RuleSet, Reconciler, format_summary};
//!
//! let target = Dataset::from_text_rows([
//!     vec!["id", "", "", "", "corp", "man", "name", "tag"],
//!     vec!["1", "", "", "", "Acme", "Acme Labs", "Widget 30", "T1"],
//! ]);
//! let mut source = Dataset::from_text_rows([
//!     vec!["id", "corp", "man", "name"],
//!     vec!["1", "Acme", "Acme Labs", "widget x30"],
//! ]);
//!
//! let rules = RuleSet::parse(r"/x(\d)/g=$1");
//! let result = Reconciler::new(&rules).reconcile(&target, &mut source).unwrap();
//!
//! assert_eq!(result.outcomes[0].matched_tag, "T1");
//! println!("{}", format_summary(&result.summary));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Datasets, column layouts and result types
//! - [`rules`]: Rule parsing and name normalization
//! - [`matching`]: Reconciler, edit distance, diagnostics and summaries
//! - [`session`]: Caller-owned context tying tables, rules and config together
//! - [`parsing`]: CSV/TSV loading and export
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod rules;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ReconConfig;
pub use crate::core::dataset::{Cell, Dataset, Record};
pub use crate::core::types::*;
pub use matching::engine::{ReconError, Reconciler, Reconciliation};
pub use matching::summary::format_summary;
pub use rules::parser::{RuleError, RuleParser, RuleSet};
pub use session::ReconSession;
