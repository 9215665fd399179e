use regex::RegexBuilder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::types::{RegexPattern, ReplacementRule, RulePattern};

/// Delimiter that opens a regular-expression pattern unless configured otherwise
pub const DEFAULT_REGEX_DELIMITERS: &str = "/";

/// Flag letters accepted after the closing delimiter
const KNOWN_FLAGS: &str = "gimsu";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {index}: expected 'pattern=replacement', got '{token}'")]
    MalformedToken { index: usize, token: String },

    #[error("rule {index}: empty pattern in '{token}'")]
    EmptyPattern { index: usize, token: String },
}

/// Ordered list of replacement rules, applied front to back
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(rules: Vec<ReplacementRule>) -> Self {
        Self { rules }
    }

    /// Parse rule text permissively: malformed entries are dropped
    #[must_use]
    pub fn parse(text: &str) -> Self {
        RuleParser::default().parse_lenient(text)
    }

    /// Parse rule text, reporting the first malformed entry
    ///
    /// # Errors
    ///
    /// Returns `RuleError` for an entry that is not `pattern=replacement`
    /// or whose pattern is blank.
    pub fn parse_strict(text: &str) -> Result<Self, RuleError> {
        RuleParser::default().strict(true).parse(text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReplacementRule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a ReplacementRule;
    type IntoIter = std::slice::Iter<'a, ReplacementRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Turns free-form rule text into a [`RuleSet`].
///
/// Entries are separated by commas or newlines and written as
/// `pattern=replacement`. A pattern wrapped in a delimiter with trailing
/// flags (`/x(\d)/g`) is a regular expression; anything else, including a
/// regular expression that fails to compile, is a literal substring.
#[derive(Debug, Clone)]
pub struct RuleParser {
    strict: bool,
    delimiters: Vec<char>,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self {
            strict: false,
            delimiters: DEFAULT_REGEX_DELIMITERS.chars().collect(),
        }
    }
}

impl RuleParser {
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: &str) -> Self {
        self.delimiters = delimiters.chars().collect();
        self
    }

    /// Parse rule text according to the configured mode
    ///
    /// # Errors
    ///
    /// In strict mode, returns `RuleError` for the first malformed entry.
    /// Never fails in permissive mode.
    pub fn parse(&self, text: &str) -> Result<RuleSet, RuleError> {
        let normalized = text.replace("\r\n", ",").replace(['\n', '\r'], ",");
        let mut rules = Vec::new();

        for (index, token) in normalized.split(',').enumerate() {
            if token.trim().is_empty() {
                continue;
            }
            match self.parse_token(index, token) {
                Ok(rule) => {
                    debug!(index, rule = %rule, "parsed rule");
                    rules.push(rule);
                }
                Err(e) if self.strict => return Err(e),
                Err(e) => warn!("dropping {e}"),
            }
        }

        Ok(RuleSet::new(rules))
    }

    fn parse_lenient(&self, text: &str) -> RuleSet {
        let lenient = Self {
            strict: false,
            delimiters: self.delimiters.clone(),
        };
        lenient.parse(text).unwrap_or_default()
    }

    fn parse_token(&self, index: usize, token: &str) -> Result<ReplacementRule, RuleError> {
        let parts: Vec<&str> = token.split('=').collect();
        let [pattern, replacement] = parts.as_slice() else {
            return Err(RuleError::MalformedToken {
                index,
                token: token.to_string(),
            });
        };

        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern {
                index,
                token: token.to_string(),
            });
        }
        let replacement = replacement.trim().to_string();

        if let Some(regex) = self.try_regex(pattern) {
            let template = regex_template(&replacement, &regex.regex);
            return Ok(ReplacementRule {
                pattern: RulePattern::Regex(regex),
                replacement,
                template,
            });
        }

        Ok(ReplacementRule {
            pattern: RulePattern::Literal(pattern.to_string()),
            template: replacement.clone(),
            replacement,
        })
    }

    /// Interpret `pattern` as `<d>body<d>flags`; `None` means use it literally
    fn try_regex(&self, pattern: &str) -> Option<RegexPattern> {
        let delimiter = pattern.chars().next()?;
        if pattern.chars().count() < 2 || !self.delimiters.contains(&delimiter) {
            return None;
        }

        let rest = &pattern[delimiter.len_utf8()..];
        let close = rest.rfind(delimiter)?;
        let source = &rest[..close];
        let flags = &rest[close + delimiter.len_utf8()..];

        if source.is_empty() || !flags_are_valid(flags) {
            debug!(pattern, "not a valid delimited pattern, using literal");
            return None;
        }

        let regex = match RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                warn!(pattern, "regular expression rejected ({e}), using literal");
                return None;
            }
        };

        Some(RegexPattern {
            source: source.to_string(),
            flags: flags.to_string(),
            delimiter,
            regex,
            global: flags.contains('g'),
        })
    }
}

/// Every flag must be known and appear at most once
fn flags_are_valid(flags: &str) -> bool {
    flags.chars().enumerate().all(|(i, c)| {
        KNOWN_FLAGS.contains(c) && !flags[..i].contains(c)
    })
}

/// Rewrite a `$1` / `$&` / `$<name>` / `$$` replacement into the regex
/// crate's `${1}` / `${0}` / `${name}` / `$$` syntax.
///
/// A `$` that does not introduce a valid reference is kept as a literal
/// dollar sign. `$<name>` is only a reference when the pattern declares
/// named groups; an undeclared name in such a pattern expands to nothing.
fn regex_template(replacement: &str, regex: &regex::Regex) -> String {
    let groups = regex.captures_len();
    let has_named_groups = regex.capture_names().flatten().next().is_some();
    let chars: Vec<char> = replacement.chars().collect();
    let mut out = String::with_capacity(replacement.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some(d) if d.is_ascii_digit() => {
                let one = d.to_digit(10).unwrap_or(0) as usize;
                let two = chars
                    .get(i + 2)
                    .and_then(|c| c.to_digit(10))
                    .map(|d2| one * 10 + d2 as usize);

                if let Some(n) = two.filter(|&n| n > 0 && n < groups) {
                    out.push_str(&format!("${{{n}}}"));
                    i += 3;
                } else if one > 0 && one < groups {
                    out.push_str(&format!("${{{one}}}"));
                    i += 2;
                } else {
                    out.push_str("$$");
                    i += 1;
                }
            }
            Some('<') => {
                let close = chars[i + 2..].iter().position(|&c| c == '>');
                match close {
                    Some(len) if len > 0 && has_named_groups => {
                        let name: String = chars[i + 2..i + 2 + len].iter().collect();
                        out.push_str(&format!("${{{name}}}"));
                        i += len + 3;
                    }
                    _ => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_of(rule: &ReplacementRule) -> Option<&str> {
        match &rule.pattern {
            RulePattern::Literal(s) => Some(s.as_str()),
            RulePattern::Regex(_) => None,
        }
    }

    fn regex_of(rule: &ReplacementRule) -> Option<&RegexPattern> {
        match &rule.pattern {
            RulePattern::Regex(p) => Some(p),
            RulePattern::Literal(_) => None,
        }
    }

    #[test]
    fn test_parse_literal_rules() {
        let rules = RuleSet::parse("acme=ACME, Corp. = Corporation\nfoo=");
        assert_eq!(rules.len(), 3);
        let parsed: Vec<_> = rules.iter().collect();
        assert_eq!(literal_of(parsed[0]), Some("acme"));
        assert_eq!(parsed[0].replacement, "ACME");
        assert_eq!(literal_of(parsed[1]), Some("Corp."));
        assert_eq!(parsed[1].replacement, "Corporation");
        // Empty replacement deletes
        assert_eq!(parsed[2].replacement, "");
    }

    #[test]
    fn test_malformed_tokens_are_dropped() {
        let rules = RuleSet::parse("no-equals, a=b=c, =x, ok=yes,,\r\n\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("ok"));
    }

    #[test]
    fn test_strict_mode_reports_malformed_tokens() {
        let err = RuleSet::parse_strict("a=b, broken").unwrap_err();
        assert_eq!(
            err,
            RuleError::MalformedToken {
                index: 1,
                token: " broken".to_string()
            }
        );

        let err = RuleSet::parse_strict("a=b\n  =c").unwrap_err();
        assert!(matches!(err, RuleError::EmptyPattern { index: 1, .. }));

        // Blank entries are not errors, even in strict mode
        let rules = RuleSet::parse_strict("a=b,\n").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_duplicate_patterns_are_kept_in_order() {
        let rules = RuleSet::parse("a=b\na=c");
        let replacements: Vec<_> = rules.iter().map(|r| r.replacement.as_str()).collect();
        assert_eq!(replacements, vec!["b", "c"]);
    }

    #[test]
    fn test_regex_rules() {
        let rules = RuleSet::parse(r"/x(\d)/g=$1, /INC/i=");
        let parsed: Vec<_> = rules.iter().collect();

        let first = regex_of(parsed[0]).unwrap();
        assert_eq!(first.source, r"x(\d)");
        assert!(first.global);
        assert_eq!(parsed[0].template, "${1}");

        let second = regex_of(parsed[1]).unwrap();
        assert!(!second.global);
        assert!(second.regex.is_match("acme inc"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        // No closing delimiter
        let rules = RuleSet::parse("/abc=x");
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("/abc"));

        // Unknown flag
        let rules = RuleSet::parse("/abc/q=x");
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("/abc/q"));

        // Repeated flag
        let rules = RuleSet::parse("/abc/gg=x");
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("/abc/gg"));

        // Does not compile
        let rules = RuleSet::parse("/a(b/=x");
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("/a(b/"));

        // Single delimiter character is too short
        let rules = RuleSet::parse("/=x");
        assert_eq!(literal_of(rules.iter().next().unwrap()), Some("/"));
    }

    #[test]
    fn test_custom_delimiters() {
        let parser = RuleParser::default().with_delimiters("#");
        let rules = parser.parse("#co\\.#i=company, /x/=y").unwrap();
        let parsed: Vec<_> = rules.iter().collect();
        assert!(parsed[0].is_regex());
        assert!(!parsed[1].is_regex());
    }

    #[test]
    fn test_regex_template_translation() {
        let re = regex::Regex::new(r"(a)(b)(?<tail>c)").unwrap();
        assert_eq!(regex_template("$2-$1", &re), "${2}-${1}");
        assert_eq!(regex_template("[$&]", &re), "[${0}]");
        assert_eq!(regex_template("$<tail>!", &re), "${tail}!");
        assert_eq!(regex_template("$<nope>", &re), "${nope}");
        assert_eq!(regex_template("$$5", &re), "$$5");
        // Group 9 does not exist: literal dollar
        assert_eq!(regex_template("$9", &re), "$$9");
        // "$1a" is group 1 followed by "a"
        assert_eq!(regex_template("$1a", &re), "${1}a");
        // Two digits only when the group exists
        assert_eq!(regex_template("$10", &re), "${1}0");
    }

    #[test]
    fn test_named_reference_without_named_groups_is_literal() {
        let re = regex::Regex::new(r"(a)").unwrap();
        assert_eq!(regex_template("$<x>", &re), "$$<x>");
        assert_eq!(regex_template("$<x>$1", &re), "$$<x>${1}");
    }

    #[test]
    fn test_rule_display() {
        let rules = RuleSet::parse(r"acme=ACME, /x(\d)/g=$1");
        let shown: Vec<String> = rules.iter().map(ToString::to_string).collect();
        assert_eq!(shown[0], r#"literal "acme" -> "ACME""#);
        assert_eq!(shown[1], r#"regex /x(\d)/g -> "$1""#);
    }
}
