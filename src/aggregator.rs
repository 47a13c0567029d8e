//! Function and phase time aggregation over a timing log
//!
//! A single pass over the log feeds every matched line into two running
//! totals: one for the whole file and one for the current phase. A phase ends
//! on any line containing `Phase`, or while the most recently matched function
//! name contains `AlternativeCorrection`. At that point the phase totals are
//! sorted, appended to the phase list, and reset.

use crate::classifier::{LineClass, LineClassifier};
use crate::error::{Result, TimingError};
use crate::table::{Accumulator, TimingTable};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Marker that closes the current phase when present anywhere on a line
const PHASE_MARKER: &str = "Phase";

/// Function name fragment that closes the current phase
const PHASE_FUNCTION_MARKER: &str = "AlternativeCorrection";

/// Line counters for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines read from the log
    pub lines_read: usize,
    /// Lines dropped by the repeated `time` / `Gb` filter
    pub lines_filtered: usize,
    /// Lines a timing annotation was extracted from
    pub lines_matched: usize,
}

/// Everything collected from one timing log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingReport {
    /// Whole-file totals, sorted descending
    pub functions: TimingTable,
    /// One table per closed phase, in file order
    pub phases: Vec<TimingTable>,
    /// Totals accumulated after the last phase boundary, if any
    ///
    /// These are not part of `phases`; the log ended before a boundary
    /// closed them.
    pub trailing: Option<TimingTable>,
    pub stats: ParseStats,
}

/// Per-invocation aggregation state
#[derive(Debug, Default)]
pub(crate) struct TimingAggregator {
    classifier: LineClassifier,
    functions: Accumulator,
    current_phase: Accumulator,
    phases: Vec<TimingTable>,
    /// Function name from the most recent matched line
    last_function: Option<String>,
    stats: ParseStats,
}

impl TimingAggregator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Process one line; `line_number` is 1-based and only used for errors
    pub(crate) fn process_line(&mut self, line_number: usize, line: &str) -> Result<()> {
        self.stats.lines_read += 1;

        let class = self
            .classifier
            .classify(line)
            .map_err(|source| TimingError::Parse {
                line: line_number,
                source,
            })?;

        match class {
            LineClass::Filtered => {
                self.stats.lines_filtered += 1;
                tracing::trace!(line = line_number, "skipping summary line");
                return Ok(());
            }
            LineClass::NoMatch => {}
            LineClass::Matched {
                function,
                duration_ms,
            } => {
                tracing::debug!(line = line_number, function, duration_ms, "matched timing");
                self.stats.lines_matched += 1;
                // A phase total never exceeds the whole-file total, so only the
                // first add can overflow
                self.functions
                    .add(function, duration_ms)
                    .and_then(|()| self.current_phase.add(function, duration_ms))
                    .map_err(|source| TimingError::Parse {
                        line: line_number,
                        source,
                    })?;
                self.last_function = Some(function.to_string());
            }
        }

        if self.is_phase_boundary(line) {
            self.close_phase(line_number);
        }

        Ok(())
    }

    fn is_phase_boundary(&self, line: &str) -> bool {
        line.contains(PHASE_MARKER)
            || self
                .last_function
                .as_deref()
                .is_some_and(|f| f.contains(PHASE_FUNCTION_MARKER))
    }

    fn close_phase(&mut self, line_number: usize) {
        let phase = self.current_phase.take_sorted();
        tracing::debug!(
            line = line_number,
            phase = self.phases.len() + 1,
            functions = phase.len(),
            total_ms = phase.total_ms(),
            "phase boundary"
        );
        self.phases.push(phase);
    }

    pub(crate) fn finish(self) -> TimingReport {
        let trailing = if self.current_phase.is_empty() {
            None
        } else {
            let table = self.current_phase.into_sorted();
            tracing::warn!(
                functions = table.len(),
                total_ms = table.total_ms(),
                "log ended inside an unclosed phase; its totals are not in the phase list"
            );
            Some(table)
        };

        TimingReport {
            functions: self.functions.into_sorted(),
            phases: self.phases,
            trailing,
            stats: self.stats,
        }
    }
}

/// Aggregate a timing log from any buffered reader
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<TimingReport> {
    let mut aggregator = TimingAggregator::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| TimingError::Read {
                line: line_number + 1,
                source,
            })?;
        if read == 0 {
            break;
        }

        let chunk = std::str::from_utf8(&buf).map_err(|e| TimingError::Read {
            line: line_number + 1,
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        let chunk = match chunk.strip_suffix('\n') {
            Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
            None => chunk.strip_suffix('\r').unwrap_or(chunk),
        };

        for line in chunk.split('\r') {
            line_number += 1;
            aggregator.process_line(line_number, line)?;
        }
    }

    Ok(aggregator.finish())
}

/// Aggregate the timing log at `path`, keeping the trailing phase and counters
pub fn parse_report<P: AsRef<Path>>(path: P) -> Result<TimingReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TimingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "parsing timing log");
    parse_reader(BufReader::new(file))
}

/// Aggregate the timing log at `path` into function totals and phase totals
///
/// Both the returned table and every phase table are sorted by elapsed time,
/// largest first. Totals after the last phase boundary are not returned; use
/// [`parse_report`] to get them.
///
/// # Example
///
/// ```no_run
/// let (functions, phases) = timeparse::parse_timings("assembly.log")?;
/// for entry in &functions {
///     println!("{} {}ms", entry.function, entry.ms);
/// }
/// println!("{} phases", phases.len());
/// # Ok::<(), timeparse::TimingError>(())
/// ```
pub fn parse_timings<P: AsRef<Path>>(path: P) -> Result<(TimingTable, Vec<TimingTable>)> {
    let report = parse_report(path)?;
    Ok((report.functions, report.phases))
}
