//! Per-function millisecond totals
//!
//! [`Accumulator`] is the running FunctionName → Milliseconds mapping used
//! while a log is scanned. [`TimingTable`] is its finalized form: entries
//! sorted by total time, largest first.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulated time for one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTime {
    /// Function name exactly as captured from the log line
    pub function: String,
    /// Total elapsed time in milliseconds
    pub ms: u64,
}

/// Function totals sorted by elapsed time (descending)
///
/// Entries with equal totals are listed most recently first-seen first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingTable {
    entries: Vec<FunctionTime>,
}

impl TimingTable {
    /// Number of distinct functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total for a function, if it appeared
    pub fn get(&self, function: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.function == function)
            .map(|e| e.ms)
    }

    /// Entries in descending order of elapsed time
    pub fn iter(&self) -> std::slice::Iter<'_, FunctionTime> {
        self.entries.iter()
    }

    /// The `n` largest entries (all of them when `n` is `None`)
    pub fn top(&self, n: Option<usize>) -> &[FunctionTime] {
        match n {
            Some(n) => &self.entries[..n.min(self.entries.len())],
            None => &self.entries,
        }
    }

    /// Sum of all entries in milliseconds, saturating at `u64::MAX`
    pub fn total_ms(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.ms))
    }

    /// `(function, ms)` pairs in table order
    pub fn to_pairs(&self) -> Vec<(&str, u64)> {
        self.entries
            .iter()
            .map(|e| (e.function.as_str(), e.ms))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TimingTable {
    type Item = &'a FunctionTime;
    type IntoIter = std::slice::Iter<'a, FunctionTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Running FunctionName → Milliseconds totals in first-seen order
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    entries: Vec<FunctionTime>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    /// Add `ms` to `function`, creating the entry at zero if absent
    pub(crate) fn add(&mut self, function: &str, ms: u64) -> Result<(), FieldError> {
        match self.index.get(function) {
            Some(&i) => {
                let total = self.entries[i].ms;
                self.entries[i].ms = total.checked_add(ms).ok_or_else(|| {
                    FieldError::TotalOverflow {
                        function: function.to_string(),
                        total,
                        added: ms,
                    }
                })?;
            }
            None => {
                self.index.insert(function.to_string(), self.entries.len());
                self.entries.push(FunctionTime {
                    function: function.to_string(),
                    ms,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finalize into a table sorted by elapsed time, largest first
    pub(crate) fn into_sorted(self) -> TimingTable {
        let mut entries = self.entries;
        // Stable ascending sort, then reverse: ties end up in reverse first-seen order
        entries.sort_by_key(|e| e.ms);
        entries.reverse();
        TimingTable { entries }
    }

    /// Finalize the current contents and leave the accumulator empty
    pub(crate) fn take_sorted(&mut self) -> TimingTable {
        std::mem::take(self).into_sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_adds_per_function() {
        let mut acc = Accumulator::default();
        acc.add("map", 100).unwrap();
        acc.add("map", 250).unwrap();
        acc.add("reduce", 40).unwrap();

        let table = acc.into_sorted();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("map"), Some(350));
        assert_eq!(table.get("reduce"), Some(40));
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.total_ms(), 390);
    }

    #[test]
    fn test_sorted_descending() {
        let mut acc = Accumulator::default();
        acc.add("fast", 1).unwrap();
        acc.add("slow", 900).unwrap();
        acc.add("medium", 50).unwrap();

        let table = acc.into_sorted();
        assert_eq!(
            table.to_pairs(),
            vec![("slow", 900), ("medium", 50), ("fast", 1)]
        );
    }

    #[test]
    fn test_ties_listed_latest_first_seen_first() {
        let mut acc = Accumulator::default();
        acc.add("b", 10).unwrap();
        acc.add("a", 10).unwrap();
        acc.add("c", 20).unwrap();
        acc.add("d", 10).unwrap();

        let table = acc.into_sorted();
        assert_eq!(
            table.to_pairs(),
            vec![("c", 20), ("d", 10), ("a", 10), ("b", 10)]
        );
    }

    #[test]
    fn test_add_overflow_is_error() {
        let mut acc = Accumulator::default();
        acc.add("a", u64::MAX).unwrap();
        let err = acc.add("a", 1).unwrap_err();
        assert_eq!(
            err,
            FieldError::TotalOverflow {
                function: "a".to_string(),
                total: u64::MAX,
                added: 1
            }
        );
        // The failed add leaves the total untouched
        assert_eq!(acc.into_sorted().get("a"), Some(u64::MAX));
    }

    #[test]
    fn test_total_ms_saturates() {
        let mut acc = Accumulator::default();
        acc.add("a", u64::MAX).unwrap();
        acc.add("b", 1).unwrap();
        assert_eq!(acc.into_sorted().total_ms(), u64::MAX);
    }

    #[test]
    fn test_take_sorted_resets() {
        let mut acc = Accumulator::default();
        acc.add("x", 5).unwrap();
        let table = acc.take_sorted();
        assert_eq!(table.get("x"), Some(5));
        assert!(acc.is_empty());

        acc.add("x", 7).unwrap();
        assert_eq!(acc.take_sorted().get("x"), Some(7));
    }

    #[test]
    fn test_whitespace_names_are_kept_verbatim() {
        let mut acc = Accumulator::default();
        acc.add(" ", 3).unwrap();
        acc.add("", 4).unwrap();
        let table = acc.into_sorted();
        assert_eq!(table.get(" "), Some(3));
        assert_eq!(table.get(""), Some(4));
    }

    #[test]
    fn test_top_clamps_to_len() {
        let mut acc = Accumulator::default();
        acc.add("a", 3).unwrap();
        acc.add("b", 2).unwrap();
        let table = acc.into_sorted();
        assert_eq!(table.top(Some(1)).len(), 1);
        assert_eq!(table.top(Some(10)).len(), 2);
        assert_eq!(table.top(None).len(), 2);
    }

    #[test]
    fn test_table_serializes_in_order() {
        let mut acc = Accumulator::default();
        acc.add("small", 1).unwrap();
        acc.add("big", 2).unwrap();
        let json = serde_json::to_string(&acc.into_sorted()).unwrap();
        assert_eq!(
            json,
            r#"[{"function":"big","ms":2},{"function":"small","ms":1}]"#
        );
    }
}
