//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "lab")]
#[command(version)]
#[command(about = "Derive test results and render A4 test reports for a construction materials lab")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Laboratory profile (TOML). The built-in profile is used when absent.
    #[arg(long, global = true, env = "LAB_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,
}

/// A record file and how to read it.
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Path to a record JSON file
    pub record: PathBuf,

    /// Treat the file as an observation sheet rather than a cube test record
    #[arg(long)]
    pub sheet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the derived values for a record
    Derive {
        #[command(flatten)]
        input: RecordArgs,
    },

    /// Print the laid-out display list as JSON
    Layout {
        #[command(flatten)]
        input: RecordArgs,
    },

    /// Print the Typst source for a record's report
    Typst {
        #[command(flatten)]
        input: RecordArgs,
    },

    /// Render a record's report to PDF
    Render {
        #[command(flatten)]
        input: RecordArgs,

        /// Output path. Defaults to Test_Report_<job>.pdf
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Fetch a record from a store directory and render it
    Fetch {
        /// Directory of <id>.json records
        #[arg(long)]
        store: PathBuf,

        /// Test request id
        #[arg(long)]
        id: u64,

        /// Output path. Defaults to Test_Report_<job>.pdf
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "lab", "render", "record.json", "-o", "out.pdf", "--date", "2025-09-05", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 9, 5));
        match cli.command {
            Commands::Render { input, output } => {
                assert_eq!(input.record, PathBuf::from("record.json"));
                assert!(!input.sheet);
                assert_eq!(output, Some(PathBuf::from("out.pdf")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from(["lab", "fetch", "--store", "store", "--id", "1042", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Fetch { id: 1042, .. }));
    }
}
