//! Rendering of timing reports as text tables, JSON, or CSV
//!
//! The aggregation core only produces sorted tables; everything about how
//! they are shown lives here.

use crate::aggregator::TimingReport;
use crate::cli::OutputFormat;
use crate::table::{FunctionTime, TimingTable};
use serde::{Deserialize, Serialize};

/// Options shared by all output formats
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include per-phase tables (text and CSV; JSON always has them)
    pub phases: bool,
    /// Cap every table to its N largest entries
    pub top: Option<usize>,
    /// Include totals recorded after the last phase boundary
    pub include_trailing: bool,
}

/// Render `report` in the requested format
pub fn render(
    report: &TimingReport,
    format: OutputFormat,
    options: &RenderOptions,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, options)),
        OutputFormat::Json => render_json(report, options),
        OutputFormat::Csv => Ok(render_csv(report, options)),
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

const NAME_WIDTH: usize = 50;
const RULE_WIDTH: usize = 78;

/// Human-readable tables, largest totals first
pub fn render_text(report: &TimingReport, options: &RenderOptions) -> String {
    let mut out = String::new();

    if report.functions.is_empty() {
        out.push_str("No timing data found.\n");
        return out;
    }

    write_table(
        &mut out,
        "Function Timing Summary (sorted by total time)",
        &report.functions,
        options.top,
    );

    if options.phases {
        for (i, phase) in report.phases.iter().enumerate() {
            write_table(&mut out, &format!("Phase {}", i + 1), phase, options.top);
        }
    }

    if options.include_trailing {
        if let Some(trailing) = &report.trailing {
            write_table(&mut out, "Unclosed trailing phase", trailing, options.top);
        }
    }

    out.push_str(&format!(
        "{} lines read, {} matched, {} filtered, {} phases\n",
        report.stats.lines_read,
        report.stats.lines_matched,
        report.stats.lines_filtered,
        report.phases.len()
    ));

    out
}

fn write_table(out: &mut String, title: &str, table: &TimingTable, top: Option<usize>) {
    let rule = "─".repeat(RULE_WIDTH);

    out.push_str(&format!("=== {} ===\n", title));
    out.push_str(&format!(
        "{:<width$} {:>12} {:>12}\n",
        "Function",
        "Total (ms)",
        "Total Time",
        width = NAME_WIDTH
    ));
    out.push_str(&rule);
    out.push('\n');

    if table.is_empty() {
        out.push_str("(no timings)\n");
    }

    for entry in table.top(top) {
        out.push_str(&format_row(&entry.function, entry.ms));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format_row("Total", table.total_ms()));
    out.push('\n');
}

fn format_row(name: &str, ms: u64) -> String {
    format!(
        "{:<width$} {:>12} {:>11.3}s\n",
        name,
        ms,
        ms as f64 / 1000.0,
        width = NAME_WIDTH
    )
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// One phase in JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPhase {
    /// 1-based position in the log
    pub index: usize,
    pub total_ms: u64,
    pub functions: Vec<FunctionTime>,
}

/// Line counters and grand total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub total_ms: u64,
    pub lines_read: usize,
    pub lines_matched: usize,
    pub lines_filtered: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Whole-log totals, largest first
    pub functions: Vec<FunctionTime>,
    /// Closed phases in log order
    pub phases: Vec<JsonPhase>,
    /// Totals after the last boundary (if --include-trailing and non-empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing: Option<JsonPhase>,
    pub summary: JsonSummary,
}

impl JsonReport {
    pub fn from_report(report: &TimingReport, options: &RenderOptions) -> Self {
        let phase = |index: usize, table: &TimingTable| JsonPhase {
            index,
            total_ms: table.total_ms(),
            functions: table.top(options.top).to_vec(),
        };

        let trailing = if options.include_trailing {
            report
                .trailing
                .as_ref()
                .map(|t| phase(report.phases.len() + 1, t))
        } else {
            None
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "timeparse-json-v1".to_string(),
            functions: report.functions.top(options.top).to_vec(),
            phases: report
                .phases
                .iter()
                .enumerate()
                .map(|(i, t)| phase(i + 1, t))
                .collect(),
            trailing,
            summary: JsonSummary {
                total_ms: report.functions.total_ms(),
                lines_read: report.stats.lines_read,
                lines_matched: report.stats.lines_matched,
                lines_filtered: report.stats.lines_filtered,
            },
        }
    }
}

/// Pretty-printed JSON document
pub fn render_json(report: &TimingReport, options: &RenderOptions) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from_report(report, options))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One `scope,function,ms` row per entry
///
/// Scope is `total`, `phase_N`, or `trailing`.
pub fn render_csv(report: &TimingReport, options: &RenderOptions) -> String {
    let mut out = String::from("scope,function,ms\n");

    let mut rows = |scope: &str, table: &TimingTable| {
        for entry in table.top(options.top) {
            out.push_str(&format!(
                "{},{},{}\n",
                scope,
                escape_field(&entry.function),
                entry.ms
            ));
        }
    };

    rows("total", &report.functions);

    if options.phases {
        for (i, phase) in report.phases.iter().enumerate() {
            rows(&format!("phase_{}", i + 1), phase);
        }
    }

    if options.include_trailing {
        if let Some(trailing) = &report.trailing {
            rows("trailing", trailing);
        }
    }

    out
}
