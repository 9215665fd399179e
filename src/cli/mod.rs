//! Command-line interface for name-recon.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **reconcile**: Match a source table against a target table
//! - **diagnose**: Show how every name is normalized by the rules
//! - **rules**: Show how rule text is parsed
//!
//! ## Usage
//!
//! ```text
//! # Reconcile with rules from a file, writing the annotated table
//! name-recon reconcile catalog.csv inventory.csv --rules rules.txt -o matched.csv
//!
//! # Inline rules, JSON output for scripting
//! name-recon reconcile catalog.csv inventory.csv --rule '/x(\d)/g=$1' --format json
//!
//! # Check what the rules do to every name
//! name-recon diagnose catalog.csv inventory.csv --rules rules.txt
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::ReconConfig;
use crate::core::dataset::Dataset;
use crate::parsing::table::{read_table, table_to_string};
use crate::rules::parser::RuleSet;

pub mod diagnose;
pub mod reconcile;
pub mod rules;

#[derive(Parser)]
#[command(name = "name-recon")]
#[command(version)]
#[command(about = "Reconcile a table of records against a reference table by name")]
#[command(
    long_about = "name-recon matches every record of a source table to the most likely record of a target table.\n\nNames are normalized through an ordered rule set, scored by edit distance, and each source record is annotated with:\n- The matched tag, name and distance\n- A duplicate flag when an earlier record claimed the same name\n- A ranked shortlist of candidates when the match is not exact"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match source records against target records
    Reconcile(reconcile::ReconcileArgs),

    /// Show raw names next to their comparison keys
    Diagnose(diagnose::DiagnoseArgs),

    /// Parse rule text and list the resulting rules
    Rules(rules::RulesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Rule and configuration options shared by every command
#[derive(clap::Args, Default)]
pub struct RuleArgs {
    /// File containing rule text (`pattern=replacement`, one per line or comma-separated)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Inline rule text; may be repeated, applied after rules from --rules
    #[arg(long = "rule", value_name = "RULE")]
    pub rule: Vec<String>,

    /// Fail on malformed rule entries instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RuleArgs {
    /// Load the configuration file (if any) and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn load_config(&self) -> anyhow::Result<ReconConfig> {
        let mut config = match &self.config {
            Some(path) => ReconConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReconConfig::default(),
        };
        if self.strict {
            config.strict_rules = true;
        }
        Ok(config)
    }

    /// Concatenated rule text: the rules file first, then each `--rule`
    ///
    /// # Errors
    ///
    /// Returns an error if the rules file cannot be read.
    pub fn rule_text(&self) -> anyhow::Result<String> {
        let mut parts = Vec::new();
        if let Some(path) = &self.rules {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading rules {}", path.display()))?;
            parts.push(text);
        }
        parts.extend(self.rule.iter().cloned());
        Ok(parts.join("\n"))
    }

    /// Parse the rule text with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the rules file cannot be read, or in strict mode
    /// if a rule entry is malformed.
    pub fn load_rules(&self, config: &ReconConfig) -> anyhow::Result<RuleSet> {
        let text = self.rule_text()?;
        Ok(config.parse_rules(&text)?)
    }
}

fn load_table(path: &Path) -> anyhow::Result<Dataset> {
    read_table(path).with_context(|| format!("loading table {}", path.display()))
}

fn print_tsv_table(dataset: &Dataset) -> anyhow::Result<()> {
    print!("{}", table_to_string(dataset, b'\t')?);
    Ok(())
}
