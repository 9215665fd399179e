use std::borrow::Cow;

use crate::core::types::{ReplacementRule, RulePattern};
use crate::rules::parser::RuleSet;

/// Apply every rule in order, without case folding.
///
/// Literal patterns replace every occurrence; regular expressions replace
/// the first match, or every match when the rule was written with `g`.
#[must_use]
pub fn apply_rules(raw: &str, rules: &RuleSet) -> String {
    rules
        .iter()
        .fold(raw.to_string(), |text, rule| apply_rule(&text, rule).into_owned())
}

fn apply_rule<'t>(text: &'t str, rule: &ReplacementRule) -> Cow<'t, str> {
    match &rule.pattern {
        RulePattern::Literal(needle) => {
            if text.contains(needle.as_str()) {
                Cow::Owned(text.replace(needle.as_str(), &rule.replacement))
            } else {
                Cow::Borrowed(text)
            }
        }
        RulePattern::Regex(p) if p.global => p.regex.replace_all(text, rule.template.as_str()),
        RulePattern::Regex(p) => p.regex.replace(text, rule.template.as_str()),
    }
}

/// Comparison key for a raw name: rules applied, then lowercased
#[must_use]
pub fn comparison_key(raw: &str, rules: &RuleSet) -> String {
    apply_rules(raw, rules).to_lowercase()
}
