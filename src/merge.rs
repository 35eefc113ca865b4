// src/merge.rs
//! Range merging: sums a period window of a `PeriodCountTable` into one table.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{ComentionError, Result};
use crate::table::{MergedCountTable, PeriodCountTable};
use crate::types::Period;

/// A closed, validated period interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodRange {
    low: Period,
    high: Period,
}

impl PeriodRange {
    /// # Errors
    /// Returns `InvalidRange` when `low > high`. Never clamps.
    pub fn new(low: Period, high: Period) -> Result<Self> {
        if low > high {
            return Err(ComentionError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// A one-period window.
    #[must_use]
    pub fn single(period: Period) -> Self {
        Self {
            low: period,
            high: period,
        }
    }

    #[must_use]
    pub fn low(&self) -> Period {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> Period {
        self.high
    }

    #[must_use]
    pub fn contains(&self, period: Period) -> bool {
        (self.low..=self.high).contains(&period)
    }

    #[must_use]
    pub fn as_range(&self) -> RangeInclusive<Period> {
        self.low..=self.high
    }
}

/// Sums every period inside `range`. Periods absent from the table add nothing,
/// and only periods actually present in the window are visited.
#[must_use]
pub fn merge_range(table: &PeriodCountTable, range: PeriodRange) -> MergedCountTable {
    let mut merged = MergedCountTable::new();
    let mut visited = 0usize;
    for (_, pairs) in table.range(range.as_range()) {
        visited += 1;
        for (pair, count) in pairs {
            merged.add(pair.clone(), *count);
        }
    }
    tracing::debug!(
        low = range.low(),
        high = range.high(),
        periods = visited,
        pairs = merged.len(),
        "merged period range"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PairKey;

    fn pair(a: &str, b: &str) -> PairKey {
        PairKey::new(a, b).unwrap()
    }

    fn sample() -> PeriodCountTable {
        let mut t = PeriodCountTable::new();
        t.add(2008, pair("A", "B"), 1);
        t.add(2010, pair("A", "B"), 2);
        t.add(2010, pair("B", "C"), 1);
        t.add(2012, pair("B", "C"), 4);
        t
    }

    #[test]
    fn rejects_inverted_range() {
        let err = PeriodRange::new(2011, 2010).unwrap_err();
        assert!(matches!(err, ComentionError::InvalidRange { low: 2011, high: 2010 }));
    }

    #[test]
    fn contains_includes_both_bounds() {
        let r = PeriodRange::new(2008, 2010).unwrap();
        assert!(r.contains(2008) && r.contains(2010));
        assert!(!r.contains(2007) && !r.contains(2011));
        assert!(PeriodRange::single(1999).contains(1999));
    }

    #[test]
    fn window_is_closed_on_both_ends() {
        let merged = merge_range(&sample(), PeriodRange::new(2008, 2010).unwrap());
        assert_eq!(merged.get(&pair("A", "B")), 3);
        assert_eq!(merged.get(&pair("B", "C")), 1);
    }

    #[test]
    fn window_with_no_periods_is_empty() {
        let merged = merge_range(&sample(), PeriodRange::single(2009));
        assert!(merged.is_empty());
    }

    #[test]
    fn split_windows_sum_to_whole() {
        let t = sample();
        let whole = merge_range(&t, PeriodRange::new(2000, 2020).unwrap());
        for mid in 2000..2020 {
            let mut left = merge_range(&t, PeriodRange::new(2000, mid).unwrap());
            let right = merge_range(&t, PeriodRange::new(mid + 1, 2020).unwrap());
            left.absorb(&right);
            assert_eq!(left, whole, "split at {mid}");
        }
    }
}
