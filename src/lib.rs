//! Timeparse - function and phase timing aggregation for pipeline logs
//!
//! This library scans a log annotated with lines such as
//! `Polishing(k=5001) time: 00:12:03:250`, totals elapsed time per function,
//! and groups the totals into phases separated by `Phase` marker lines.

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod report;
pub mod table;

pub use aggregator::{parse_reader, parse_report, parse_timings, ParseStats, TimingReport};
pub use error::{FieldError, Result, TimingError};
pub use table::{FunctionTime, TimingTable};
