use clap::Parser;
use tracing_subscriber::EnvFilter;

use gfa_graph::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("gfa_graph=debug,info")
    } else {
        EnvFilter::new("gfa_graph=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Stats(args) => {
            cli::stats::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Dovetails(args) => {
            cli::dovetails::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Degree(args) => {
            cli::degree::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
