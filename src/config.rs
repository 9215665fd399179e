//! Run configuration, loadable from a JSON file.
//!
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ```json
//! {
//!   "max_candidates": 10,
//!   "scope": "corporation_manufacturer",
//!   "strict_rules": true,
//!   "target_layout": { "name": 6, "tag": 7 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::layout::{SourceLayout, TargetLayout};
use crate::core::types::MatchScope;
use crate::matching::engine::{MatchingConfig, DEFAULT_MAX_CANDIDATES};
use crate::rules::parser::{RuleError, RuleParser, RuleSet, DEFAULT_REGEX_DELIMITERS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Shortlist length for uncertain matches
    pub max_candidates: usize,
    /// Which target rows each source row is compared with
    pub scope: MatchScope,
    /// Report malformed rule entries instead of dropping them
    pub strict_rules: bool,
    /// Characters that may open a delimited regular expression
    pub regex_delimiters: String,
    pub target_layout: TargetLayout,
    pub source_layout: SourceLayout,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            scope: MatchScope::All,
            strict_rules: false,
            regex_delimiters: DEFAULT_REGEX_DELIMITERS.to_string(),
            target_layout: TargetLayout::default(),
            source_layout: SourceLayout::default(),
        }
    }
}

impl ReconConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, or
    /// `ConfigError::ParseError` if it is not valid config JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rule parser honoring `strict_rules` and `regex_delimiters`
    #[must_use]
    pub fn rule_parser(&self) -> RuleParser {
        RuleParser::default()
            .strict(self.strict_rules)
            .with_delimiters(&self.regex_delimiters)
    }

    /// Parse rule text with this configuration
    ///
    /// # Errors
    ///
    /// Returns `RuleError` only when `strict_rules` is set.
    pub fn parse_rules(&self, text: &str) -> Result<RuleSet, RuleError> {
        self.rule_parser().parse(text)
    }

    #[must_use]
    pub fn matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            max_candidates: Some(self.max_candidates),
            scope: self.scope,
            target_layout: self.target_layout,
            source_layout: self.source_layout,
        }
    }
}
