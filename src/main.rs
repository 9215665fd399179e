use clap::Parser;
use tracing_subscriber::EnvFilter;

use name_recon::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("name_recon=debug,info")
    } else {
        EnvFilter::new("name_recon=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Reconcile(args) => {
            cli::reconcile::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Diagnose(args) => {
            cli::diagnose::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Rules(args) => {
            cli::rules::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
