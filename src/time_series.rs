//! Piecewise-constant per-minute series stored as change points.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};
use std::ops::RangeInclusive;

/// Simulation time in whole minutes from the start of the trace.
pub type Minute = usize;

/// A value per minute, where reading minute `t` returns the last write at or before `t`.
///
/// Writes are forward fills: `set_from(t, v)` makes every minute from `t` onwards equal to `v`
/// until something is written again. Only the minutes where the value changes are stored, so
/// long horizons with few events stay cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries<T> {
    initial: T,
    changes: BTreeMap<Minute, T>,
}

impl<T: Clone + PartialEq> TimeSeries<T> {
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            changes: BTreeMap::new(),
        }
    }

    pub fn value_at(&self, t: Minute) -> &T {
        self.changes
            .range(..=t)
            .next_back()
            .map(|(_, value)| value)
            .unwrap_or(&self.initial)
    }

    /// Writes `value` for minute `t` and every later minute, discarding later change points.
    pub fn set_from(&mut self, t: Minute, value: T) {
        self.changes.retain(|minute, _| *minute < t);
        if *self.value_at(t) != value {
            self.changes.insert(t, value);
        }
    }

    /// Distinct consecutive values observed over `range`, starting with the value at its start.
    pub fn values_over(&self, range: RangeInclusive<Minute>) -> impl Iterator<Item = &T> {
        let (start, end) = (*range.start(), *range.end());
        assert!(start <= end, "empty range {}..={}", start, end);
        std::iter::once(self.value_at(start)).chain(
            self.changes
                .range((Excluded(start), Included(end)))
                .map(|(_, value)| value),
        )
    }

    /// Returns true if every minute in `range` holds `value`.
    pub fn is_constant_over(&self, range: RangeInclusive<Minute>, value: &T) -> bool {
        self.values_over(range).all(|v| v == value)
    }

    pub fn change_points(&self) -> usize {
        self.changes.len()
    }

    /// Expands the series into one value per minute for `0..len`.
    pub fn to_dense(&self, len: Minute) -> Vec<T> {
        let mut dense = Vec::with_capacity(len);
        let mut current = self.initial.clone();
        let mut changes = self.changes.range(..len).peekable();
        for t in 0..len {
            while let Some((_, value)) = changes.next_if(|(minute, _)| **minute <= t) {
                current = value.clone();
            }
            dense.push(current.clone());
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_last_write_at_or_before() {
        let mut series = TimeSeries::new(0u32);
        series.set_from(3, 2);
        series.set_from(7, 1);
        assert_eq!(*series.value_at(0), 0);
        assert_eq!(*series.value_at(2), 0);
        assert_eq!(*series.value_at(3), 2);
        assert_eq!(*series.value_at(6), 2);
        assert_eq!(*series.value_at(7), 1);
        assert_eq!(*series.value_at(1000), 1);
    }

    #[test]
    fn test_forward_fill_overwrites_later_changes() {
        let mut series = TimeSeries::new('s');
        series.set_from(1, 'a');
        series.set_from(6, 'r');
        series.set_from(4, 'x');
        assert_eq!(series.to_dense(8), vec!['s', 'a', 'a', 'a', 'x', 'x', 'x', 'x']);
    }

    #[test]
    fn test_redundant_writes_are_not_stored() {
        let mut series = TimeSeries::new(0u32);
        series.set_from(5, 0);
        assert_eq!(series.change_points(), 0);
        series.set_from(5, 1);
        series.set_from(9, 1);
        assert_eq!(series.change_points(), 1);
    }

    #[test]
    fn test_constant_over_window() {
        let mut series = TimeSeries::new(0u32);
        series.set_from(2, 1);
        series.set_from(4, 0);
        assert!(series.is_constant_over(0..=1, &0));
        assert!(!series.is_constant_over(0..=2, &0));
        assert!(!series.is_constant_over(3..=6, &0));
        assert!(series.is_constant_over(4..=6, &0));
        assert!(series.is_constant_over(5..=5, &0));
    }
}
