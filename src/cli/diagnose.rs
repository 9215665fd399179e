use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_table, print_tsv_table, OutputFormat, RuleArgs};
use crate::matching::diagnosis::{DiagnosticsReporter, NormalizationTrace, TRACE_HEADER};

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Target (reference) table, CSV or TSV
    #[arg(required = true)]
    pub target: PathBuf,

    /// Source table
    #[arg(required = true)]
    pub source: PathBuf,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Only list names the rules actually change
    #[arg(long)]
    pub changed_only: bool,
}

/// Execute the diagnose subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded or rules are rejected in
/// strict mode.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiagnoseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.rules.load_config()?;
    let rules = args.rules.load_rules(&config)?;
    let target = load_table(&args.target)?;
    let source = load_table(&args.source)?;

    let mut trace = DiagnosticsReporter::new(&rules)
        .with_layouts(config.target_layout, config.source_layout)
        .trace(&target, &source);

    if verbose {
        eprintln!(
            "Traced {} names with {} rules, {} changed by rules",
            trace.entries.len(),
            rules.len(),
            trace.changed().count()
        );
    }

    if args.changed_only {
        let changed: Vec<_> = trace.changed().cloned().collect();
        trace = NormalizationTrace { entries: changed };
    }

    match format {
        OutputFormat::Text => print_text_trace(&trace),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trace)?),
        OutputFormat::Tsv => print_tsv_table(&trace.to_dataset())?,
    }

    Ok(())
}

fn print_text_trace(trace: &NormalizationTrace) {
    let width = trace
        .entries
        .iter()
        .map(|e| e.original.chars().count())
        .chain(std::iter::once(TRACE_HEADER[0].len()))
        .max()
        .unwrap_or(0);

    println!("{:<width$}  {}", TRACE_HEADER[0], TRACE_HEADER[1]);
    println!("{}", "-".repeat(width + 2 + TRACE_HEADER[1].len()));
    for entry in &trace.entries {
        println!("{:<width$}  {}", entry.original, entry.key);
    }
}
