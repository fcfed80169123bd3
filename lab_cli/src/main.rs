//! # lab - Test Report CLI
//!
//! Derives results from laboratory observation records and renders the
//! printed A4 test reports.
//!
//! ```text
//! lab derive record.json --format json
//! lab render record.json -o Test_Report_1042.pdf --date 2025-09-05
//! lab fetch --store records/ --id 1042
//! ```

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
