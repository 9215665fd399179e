use clap::Args;

use crate::cli::{OutputFormat, RuleArgs};
use crate::core::types::RulePattern;
use crate::rules::normalizer::comparison_key;

#[derive(Args)]
pub struct RulesArgs {
    #[command(flatten)]
    pub rules: RuleArgs,

    /// Sample names to run through the parsed rules
    #[arg(long = "sample", value_name = "NAME")]
    pub samples: Vec<String>,
}

/// Execute the rules subcommand
///
/// # Errors
///
/// Returns an error if the rules file cannot be read or, in strict mode, a
/// rule entry is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RulesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.rules.load_config()?;
    let rules = args.rules.load_rules(&config)?;

    if verbose {
        eprintln!("Parsed {} rules", rules.len());
    }

    let samples: Vec<(&str, String)> = args
        .samples
        .iter()
        .map(|s| (s.as_str(), comparison_key(s, &rules)))
        .collect();

    match format {
        OutputFormat::Text => {
            for (i, rule) in rules.iter().enumerate() {
                println!("{:>3}. {rule}", i + 1);
            }
            if rules.is_empty() {
                println!("(no rules)");
            }
            for (raw, key) in &samples {
                println!("{raw:?} => {key:?}");
            }
        }
        OutputFormat::Json => {
            let list: Vec<serde_json::Value> = rules
                .iter()
                .map(|rule| match &rule.pattern {
                    RulePattern::Literal(text) => serde_json::json!({
                        "kind": "literal",
                        "pattern": text,
                        "replacement": rule.replacement,
                    }),
                    RulePattern::Regex(p) => serde_json::json!({
                        "kind": "regex",
                        "pattern": p.source,
                        "flags": p.flags,
                        "replacement": rule.replacement,
                    }),
                })
                .collect();
            let samples: Vec<serde_json::Value> = samples
                .iter()
                .map(|(raw, key)| serde_json::json!({ "original": raw, "key": key }))
                .collect();
            let output = serde_json::json!({ "rules": list, "samples": samples });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("kind\tpattern\tflags\treplacement");
            for rule in &rules {
                match &rule.pattern {
                    RulePattern::Literal(text) => {
                        println!("literal\t{text}\t\t{}", rule.replacement);
                    }
                    RulePattern::Regex(p) => {
                        println!("regex\t{}\t{}\t{}", p.source, p.flags, rule.replacement);
                    }
                }
            }
            // Samples share the table: original name in `pattern`, key in `replacement`
            for (raw, key) in &samples {
                println!("sample\t{raw}\t\t{key}");
            }
        }
    }

    Ok(())
}
