//! Core data types for record reconciliation.
//!
//! - [`Dataset`], [`Record`], [`Cell`]: tables as produced by the loader
//! - [`TargetLayout`], [`SourceLayout`]: positional column contracts
//! - [`ReplacementRule`]: one step of the name normalization rule set
//! - [`MatchCandidate`], [`ReconciliationOutcome`], [`Summary`]: results
//!
//! ## Column layout
//!
//! | Table  | Read                                   | Written                                  |
//! |--------|----------------------------------------|------------------------------------------|
//! | target | corporation, manufacturer, name, tag   | nothing                                  |
//! | source | corporation, manufacturer, name        | tag, name, distance, comment, candidates |

pub mod dataset;
pub mod layout;
pub mod types;

pub use dataset::{Cell, Dataset, Record};
pub use layout::{SourceLayout, TargetLayout};
pub use types::{
    Annotation, MatchCandidate, MatchScope, ReconciliationOutcome, ReplacementRule, RulePattern,
    Summary,
};
