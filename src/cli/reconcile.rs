use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{load_table, print_tsv_table, OutputFormat, RuleArgs};
use crate::core::dataset::Dataset;
use crate::core::types::{Annotation, MatchScope};
use crate::matching::engine::Reconciliation;
use crate::matching::summary::format_summary;
use crate::parsing::table::write_table_file;
use crate::session::ReconSession;

/// Which target rows each source row is compared with
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ScopeArg {
    /// Every target row
    All,
    /// Only target rows with the same corporation and manufacturer
    CorporationManufacturer,
}

impl From<ScopeArg> for MatchScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => Self::All,
            ScopeArg::CorporationManufacturer => Self::CorporationManufacturer,
        }
    }
}

#[derive(Args)]
pub struct ReconcileArgs {
    /// Target (reference) table, CSV or TSV
    #[arg(required = true)]
    pub target: PathBuf,

    /// Source table whose records are identified against the target
    #[arg(required = true)]
    pub source: PathBuf,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Which target rows each source row is compared with (overrides config)
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// Number of candidates listed for uncertain matches (overrides config)
    #[arg(short = 'n', long)]
    pub max_candidates: Option<usize>,

    /// Write the annotated source table here (.tsv for tab-separated, CSV otherwise)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the reconcile subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, rules are rejected in strict
/// mode, or reconciliation fails on the tables' shape.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReconcileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = args.rules.load_config()?;
    if let Some(scope) = args.scope {
        config.scope = scope.into();
    }
    if let Some(n) = args.max_candidates {
        config.max_candidates = n;
    }

    let rules = args.rules.load_rules(&config)?;
    let target = load_table(&args.target)?;
    let source = load_table(&args.source)?;

    if verbose {
        eprintln!(
            "Loaded {} target and {} source records, {} rules",
            target.records().len(),
            source.records().len(),
            rules.len()
        );
    }

    let mut session = ReconSession::new(config, target, source);
    session.set_rules(rules);
    let result = session.reconcile()?;

    if let Some(path) = &args.output {
        write_table_file(&result.annotated, path)
            .with_context(|| format!("writing {}", path.display()))?;
        if verbose {
            eprintln!("Wrote {} rows to {}", result.annotated.len(), path.display());
        }
    }

    match format {
        OutputFormat::Text => print_text_results(&result.reconciliation),
        OutputFormat::Json => print_json_results(&result.reconciliation, &result.annotated)?,
        OutputFormat::Tsv => print_tsv_table(&result.annotated)?,
    }

    Ok(())
}

fn print_text_results(result: &Reconciliation) {
    println!("Reconciliation Results");
    println!("{}", "=".repeat(60));
    println!("{}", format_summary(&result.summary));

    let duplicates: Vec<_> = result
        .outcomes
        .iter()
        .filter(|o| o.annotation == Annotation::Duplicate)
        .collect();
    if !duplicates.is_empty() {
        println!("\nDuplicates ({}):", duplicates.len());
        for o in duplicates {
            println!("  row {}: {} ({})", o.source_row + 1, o.matched_name, o.matched_tag);
        }
    }

    let uncertain: Vec<_> = result.outcomes.iter().filter(|o| !o.is_exact()).collect();
    if !uncertain.is_empty() {
        println!("\nUncertain matches ({}):", uncertain.len());
        for o in uncertain {
            println!(
                "  row {}: {} ({}), distance {}",
                o.source_row + 1,
                o.matched_name,
                o.matched_tag,
                o.distance
            );
        }
    }
}

fn print_json_results(result: &Reconciliation, annotated: &Dataset) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "summary": result.summary,
        "outcomes": result.outcomes,
        "rows": annotated.rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
