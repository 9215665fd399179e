use regex::Regex;
use serde::{Deserialize, Serialize};

/// The text a rule looks for: a plain substring or a compiled regular expression
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Replaced everywhere it occurs
    Literal(String),
    /// Replaced once, or everywhere when the rule carries the `g` flag
    Regex(RegexPattern),
}

#[derive(Debug, Clone)]
pub struct RegexPattern {
    /// Pattern body as the rule author wrote it, without delimiters
    pub source: String,
    /// Flag letters as written after the closing delimiter
    pub flags: String,
    /// Delimiter the rule was written with
    pub delimiter: char,
    pub regex: Regex,
    /// Replace every match instead of only the first
    pub global: bool,
}

/// An ordered substitution step: `pattern=replacement` in rule text
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pub pattern: RulePattern,
    /// Replacement as written (trimmed). Empty deletes the match.
    pub replacement: String,
    /// Replacement rewritten to the regex crate's template syntax.
    /// Identical to `replacement` for literal rules.
    pub template: String,
}

impl ReplacementRule {
    #[must_use]
    pub fn is_regex(&self) -> bool {
        matches!(self.pattern, RulePattern::Regex(_))
    }
}

impl std::fmt::Display for ReplacementRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pattern {
            RulePattern::Literal(text) => {
                write!(f, "literal {text:?} -> {:?}", self.replacement)
            }
            RulePattern::Regex(p) => write!(
                f,
                "regex {d}{}{d}{} -> {:?}",
                p.source,
                p.flags,
                self.replacement,
                d = p.delimiter
            ),
        }
    }
}

/// One possible identification of a source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub target_name: String,
    pub target_tag: String,
    pub distance: usize,
    /// Position of the target record among the target data rows
    pub target_row: usize,
}

impl std::fmt::Display for MatchCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.target_name, self.target_tag)
    }
}

/// Review note written into the comment column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    #[default]
    None,
    /// Another source record claimed the same target name earlier in the scan
    Duplicate,
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// What the reconciler decided for one source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Position of the source record among the source data rows
    pub source_row: usize,
    /// Position of the matched record among the target data rows
    pub target_row: usize,
    pub matched_name: String,
    pub matched_tag: String,
    pub distance: usize,
    pub annotation: Annotation,
    /// Ranked shortlist, present only when the match is not exact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<MatchCandidate>>,
}

impl ReconciliationOutcome {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

/// Aggregate counts for one reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub exact_count: usize,
    pub uncertain_count: usize,
    /// Rounded mean distance of uncertain matches; `None` when there are none
    pub average_uncertain_distance: Option<usize>,
}

impl Summary {
    #[must_use]
    pub fn from_totals(exact_count: usize, uncertain_count: usize, distance_sum: usize) -> Self {
        // Half-up rounding in integers: round(sum / count)
        let average_uncertain_distance = (uncertain_count > 0)
            .then(|| (2 * distance_sum + uncertain_count) / (2 * uncertain_count));
        Self {
            exact_count,
            uncertain_count,
            average_uncertain_distance,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.exact_count + self.uncertain_count
    }
}

/// Which target rows a source record is scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    /// Every target row
    #[default]
    All,
    /// Only target rows with the same corporation and manufacturer
    CorporationManufacturer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rounding() {
        // 1 + 2 = 3 over 2 => 1.5 rounds up
        assert_eq!(Summary::from_totals(0, 2, 3).average_uncertain_distance, Some(2));
        // 4 over 3 => 1.33
        assert_eq!(Summary::from_totals(5, 3, 4).average_uncertain_distance, Some(1));
        // 5 over 3 => 1.67
        assert_eq!(Summary::from_totals(5, 3, 5).average_uncertain_distance, Some(2));
    }

    #[test]
    fn test_summary_without_uncertain_matches() {
        let summary = Summary::from_totals(4, 0, 0);
        assert_eq!(summary.average_uncertain_distance, None);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_candidate_display() {
        let c = MatchCandidate {
            target_name: "Widget One".to_string(),
            target_tag: "T1".to_string(),
            distance: 1,
            target_row: 0,
        };
        assert_eq!(c.to_string(), "Widget One (T1)");
    }

    #[test]
    fn test_annotation_display() {
        assert_eq!(Annotation::Duplicate.to_string(), "duplicate");
        assert_eq!(Annotation::None.to_string(), "");
    }
}
