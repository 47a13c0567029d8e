//! CLI argument parsing for Timeparse

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for timing reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "timeparse")]
#[command(version)]
#[command(about = "Aggregate function and phase timings from a pipeline log", long_about = None)]
pub struct Cli {
    /// Timing log to parse
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Include per-phase tables (always included in JSON)
    #[arg(long = "phases")]
    pub phases: bool,

    /// Only show the N most expensive functions in each table
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Also show totals recorded after the last phase boundary
    #[arg(long = "include-trailing")]
    pub include_trailing: bool,

    /// Enable debug tracing on stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}
