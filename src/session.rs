//! Caller-owned reconciliation context.
//!
//! A session holds the two loaded tables, the current rule set and the run
//! configuration. Every action reads from it explicitly; reconciling works
//! on copies, so the held tables can be traced, re-ruled and reconciled
//! again any number of times.

use tracing::debug;

use crate::config::ReconConfig;
use crate::core::dataset::Dataset;
use crate::matching::diagnosis::{DiagnosticsReporter, NormalizationTrace};
use crate::matching::engine::{ReconError, Reconciler, Reconciliation};
use crate::rules::parser::{RuleError, RuleSet};

/// Annotated copy of the source table plus the run's outcomes
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub annotated: Dataset,
    pub reconciliation: Reconciliation,
}

#[derive(Debug, Clone, Default)]
pub struct ReconSession {
    pub config: ReconConfig,
    rules: RuleSet,
    target: Dataset,
    source: Dataset,
}

impl ReconSession {
    #[must_use]
    pub fn new(config: ReconConfig, target: Dataset, source: Dataset) -> Self {
        Self {
            config,
            rules: RuleSet::default(),
            target,
            source,
        }
    }

    /// Replace the rule set by parsing `text` with the session's configuration
    ///
    /// # Errors
    ///
    /// Returns `RuleError` in strict mode; the previous rules are kept.
    pub fn set_rules_text(&mut self, text: &str) -> Result<&RuleSet, RuleError> {
        self.rules = self.config.parse_rules(text)?;
        debug!(count = self.rules.len(), "rules updated");
        Ok(&self.rules)
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn target(&self) -> &Dataset {
        &self.target
    }

    #[must_use]
    pub fn source(&self) -> &Dataset {
        &self.source
    }

    /// Reconcile a copy of the source table against the target table
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`].
    pub fn reconcile(&self) -> Result<SessionResult, ReconError> {
        let mut annotated = self.source.clone();
        let reconciliation = Reconciler::with_config(&self.rules, self.config.matching_config())
            .reconcile(&self.target, &mut annotated)?;
        Ok(SessionResult {
            annotated,
            reconciliation,
        })
    }

    /// Trace how every name normalizes under the current rules
    #[must_use]
    pub fn diagnose(&self) -> NormalizationTrace {
        DiagnosticsReporter::new(&self.rules)
            .with_layouts(self.config.target_layout, self.config.source_layout)
            .trace(&self.target, &self.source)
    }
}
