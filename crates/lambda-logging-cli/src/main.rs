//! lambda-logging CLI entry point.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;
mod ui;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use lambda_logging_core::log::{init_default, init_with_filter};
    use tracing_subscriber::EnvFilter;

    let result = if verbose {
        init_with_filter(EnvFilter::new("lambda_logging=debug"))
    } else if quiet {
        init_with_filter(EnvFilter::new("lambda_logging=error"))
    } else {
        init_default()
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }
}
