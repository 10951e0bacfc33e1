mod cli;
mod pipeline;
mod summary;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colalign_introspect::PostgresSource;
use colalign_utils::{Stopwatch, init_logging};
use colored::Colorize;
use tracing::{debug, info, warn};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            warn!(failed, "some tables could not be analyzed");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Returns the number of tables that failed.
fn run(cli: &Cli) -> anyhow::Result<usize> {
    let stopwatch = Stopwatch::start_new();
    let config = cli.resolve_config()?;
    debug!(?config, "resolved configuration");

    let options = cli.run_options(&config);
    let mut source = PostgresSource::connect(&config.connection)
        .context("failed to open database connection")?;
    let outcomes = pipeline::run(&mut source, &options)?;
    let failed = summary::print_summary(&outcomes);

    info!(
        tables = outcomes.len(),
        failed,
        elapsed_ms = stopwatch.elapsed_ms(),
        "run finished"
    );
    Ok(failed)
}
