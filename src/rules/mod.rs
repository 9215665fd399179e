//! The name normalization rule language.
//!
//! Rule text is a list of `pattern=replacement` entries separated by commas
//! or newlines. Rules run in the order written and each one sees the output
//! of the previous one; the result is lowercased to form the comparison key.
//!
//! ```text
//! Corp.=Corporation
//! /x(\d)/g=$1
//! /\s+inc\.?$/i=
//! ```
//!
//! | Pattern form       | Kind    | Replaces                         |
//! |--------------------|---------|----------------------------------|
//! | `text`             | literal | every occurrence                 |
//! | `/expr/flags`      | regex   | first match, every match with `g`|
//!
//! Accepted flags are `g`, `i`, `m`, `s` and `u`. A delimited pattern with an
//! unknown flag or a body that does not compile is treated as literal text.

pub mod normalizer;
pub mod parser;

pub use normalizer::{apply_rules, comparison_key};
pub use parser::{RuleError, RuleParser, RuleSet};
