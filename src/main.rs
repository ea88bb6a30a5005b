use clap::Parser;
use tracing_subscriber::EnvFilter;

use quartet_solver::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("quartet_solver=debug,info")
    } else {
        EnvFilter::new("quartet_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        cli::Commands::Evaluate(args) => {
            cli::evaluate::run(args, cli.format, cli.verbose, config)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose, config)?;
        }
        cli::Commands::Validate(args) => {
            cli::validate::run(args, cli.format, cli.verbose, config)?;
        }
    }

    Ok(())
}
