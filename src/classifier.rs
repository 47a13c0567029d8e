//! Timing line classification
//!
//! Each log line is one of:
//! - [`LineClass::Filtered`]: a summary or noise line mentioning `time` or
//!   `Gb` more than once. It is ignored outright.
//! - [`LineClass::NoMatch`]: neither timing pattern applies.
//! - [`LineClass::Matched`]: a function name and its elapsed time.
//!
//! Two pattern shapes are recognized:
//!
//! ```text
//! <function>(<anything> time: HH:MM:SS:MMM<anything>
//! <function> time: HH:MM:SS:MMM<anything>
//! ```
//!
//! The first applies whenever the line contains `(`. The function name then
//! stops at the first parenthesis.

use crate::error::FieldError;
use regex::{Captures, Regex};

/// Result of classifying one log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Dropped by the repeated `time` / `Gb` filter
    Filtered,
    /// No timing pattern matched
    NoMatch,
    /// A timing annotation was extracted
    Matched { function: &'a str, duration_ms: u64 },
}

/// Compiled timing patterns
#[derive(Debug, Clone)]
pub struct LineClassifier {
    parenthesized: Regex,
    plain: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            parenthesized: Regex::new(
                r"^([^(]+)\(.* time: ([0-9]+):([0-9]+):([0-9]+):([0-9]+)",
            )
            .expect("valid regex"),
            plain: Regex::new(r"^(.+) time: ([0-9]+):([0-9]+):([0-9]+):([0-9]+)")
                .expect("valid regex"),
        }
    }

    /// Classify a single line (without its line terminator)
    pub fn classify<'a>(&self, line: &'a str) -> Result<LineClass<'a>, FieldError> {
        if is_noise(line) {
            return Ok(LineClass::Filtered);
        }

        let pattern = if line.contains('(') {
            &self.parenthesized
        } else {
            &self.plain
        };

        let Some(caps) = pattern.captures(line) else {
            return Ok(LineClass::NoMatch);
        };

        let function = caps.get(1).map_or("", |m| m.as_str());
        let duration_ms = duration_from_captures(&caps)?;

        Ok(LineClass::Matched {
            function,
            duration_ms,
        })
    }
}

/// Lines carrying several timing-like tokens are summaries, not samples
fn is_noise(line: &str) -> bool {
    line.matches("time").count() > 1 || line.matches("Gb").count() > 1
}

fn duration_from_captures(caps: &Captures<'_>) -> Result<u64, FieldError> {
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let hours = clock_component("hours", field(2), 23)?;
    let minutes = clock_component("minutes", field(3), 59)?;
    let seconds = clock_component("seconds", field(4), 59)?;
    let millis = parse_number("milliseconds", field(5))?;

    clock_to_ms(hours, minutes, seconds, millis)
}

/// Combine an `HH:MM:SS` clock reading and a millisecond remainder
pub fn clock_to_ms(
    hours: u64,
    minutes: u64,
    seconds: u64,
    millis: u64,
) -> Result<u64, FieldError> {
    let whole_seconds = hours * 3600 + minutes * 60 + seconds;
    whole_seconds
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(millis))
        .ok_or(FieldError::Overflow {
            hours,
            minutes,
            seconds,
            millis,
        })
}

/// One `HH`, `MM` or `SS` field: one or two digits, at most `max`
fn clock_component(field: &'static str, text: &str, max: u64) -> Result<u64, FieldError> {
    if text.len() > 2 {
        return Err(FieldError::TooManyDigits {
            field,
            value: text.to_string(),
        });
    }
    let value = parse_number(field, text)?;
    if value > max {
        return Err(FieldError::OutOfRange { field, value, max });
    }
    Ok(value)
}

fn parse_number(field: &'static str, text: &str) -> Result<u64, FieldError> {
    text.parse().map_err(|_| FieldError::NotANumber {
        field,
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineClass<'_> {
        LineClassifier::new().classify(line).unwrap()
    }

    #[test]
    fn test_parenthesized_line() {
        assert_eq!(
            classify("foo(bar) time: 00:00:01:500"),
            LineClass::Matched {
                function: "foo",
                duration_ms: 1500
            }
        );
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(
            classify("foo time: 01:02:03:004"),
            LineClass::Matched {
                function: "foo",
                duration_ms: 3_723_004
            }
        );
    }

    #[test]
    fn test_name_stops_at_first_parenthesis() {
        assert_eq!(
            classify("Construct(k=501)(w=2000) done time: 00:00:02:007 memory: 3Gb"),
            LineClass::Matched {
                function: "Construct",
                duration_ms: 2007
            }
        );
    }

    #[test]
    fn test_parenthesis_after_time_field() {
        // The parenthesis selects pattern A, which then needs " time: " after it
        assert_eq!(classify("Align time: 00:00:01:000 (ok)"), LineClass::NoMatch);
    }

    #[test]
    fn test_plain_name_keeps_leading_text() {
        assert_eq!(
            classify("00:01:02 INFO Polishing time: 00:10:00:250"),
            LineClass::Matched {
                function: "00:01:02 INFO Polishing",
                duration_ms: 600_250
            }
        );
    }

    #[test]
    fn test_repeated_time_is_filtered() {
        assert_eq!(
            classify("total time: time: 00:00:01:000"),
            LineClass::Filtered
        );
        assert_eq!(classify("timetime"), LineClass::Filtered);
    }

    #[test]
    fn test_repeated_gb_is_filtered() {
        assert_eq!(
            classify("Peak 12Gb of 64Gb time: 00:00:01:000"),
            LineClass::Filtered
        );
        assert_eq!(
            classify("Peak 12Gb time: 00:00:01:000"),
            LineClass::Matched {
                function: "Peak 12Gb",
                duration_ms: 1000
            }
        );
    }

    #[test]
    fn test_unrelated_lines_do_not_match() {
        assert_eq!(classify(""), LineClass::NoMatch);
        assert_eq!(classify("=== Phase 2 ==="), LineClass::NoMatch);
        assert_eq!(classify("foo time: 1:2"), LineClass::NoMatch);
        assert_eq!(classify(" time: 00:00:01:000"), LineClass::NoMatch);
    }

    #[test]
    fn test_whitespace_name_is_verbatim() {
        assert_eq!(
            classify("  time: 00:00:00:010"),
            LineClass::Matched {
                function: " ",
                duration_ms: 10
            }
        );
    }

    #[test]
    fn test_single_digit_clock_fields() {
        assert_eq!(
            classify("Step time: 1:2:3:4"),
            LineClass::Matched {
                function: "Step",
                duration_ms: 3_723_004
            }
        );
    }

    #[test]
    fn test_three_digit_clock_fields_are_errors() {
        let classifier = LineClassifier::new();
        assert_eq!(
            classifier.classify("foo time: 001:02:03:004").unwrap_err(),
            FieldError::TooManyDigits {
                field: "hours",
                value: "001".to_string()
            }
        );
        assert!(matches!(
            classifier.classify("foo time: 01:002:03:004"),
            Err(FieldError::TooManyDigits { field: "minutes", .. })
        ));
        assert!(matches!(
            classifier.classify("foo time: 01:02:030:004"),
            Err(FieldError::TooManyDigits { field: "seconds", .. })
        ));
    }

    #[test]
    fn test_long_millis_remainder_is_accepted() {
        assert_eq!(
            classify("foo time: 00:00:01:0000250"),
            LineClass::Matched {
                function: "foo",
                duration_ms: 1250
            }
        );
    }

    #[test]
    fn test_out_of_range_clock_is_error() {
        let classifier = LineClassifier::new();
        let err = classifier.classify("foo time: 24:00:00:000").unwrap_err();
        assert_eq!(
            err,
            FieldError::OutOfRange {
                field: "hours",
                value: 24,
                max: 23
            }
        );

        let err = classifier.classify("foo time: 00:61:00:000").unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { field: "minutes", .. }));
    }

    #[test]
    fn test_oversized_millis_is_error() {
        let err = LineClassifier::new()
            .classify("foo time: 00:00:00:123456789012345678901234567890")
            .unwrap_err();
        assert!(matches!(
            err,
            FieldError::NotANumber {
                field: "milliseconds",
                ..
            }
        ));
    }

    #[test]
    fn test_clock_to_ms_overflow() {
        assert!(matches!(
            clock_to_ms(23, 59, 59, u64::MAX),
            Err(FieldError::Overflow { .. })
        ));
        assert_eq!(clock_to_ms(0, 0, 0, 0), Ok(0));
    }
}
