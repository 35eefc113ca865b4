// src/table.rs
//! Sparse pair-count tables.
//!
//! A `PeriodCountTable` is produced once per ingestion pass and then shared
//! read-only between queries. A `MergedCountTable` is request-scoped.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use crate::types::{PairKey, Period, WeightedPair};

/// Period → pair → count. Absent periods and absent pairs mean zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodCountTable {
    periods: BTreeMap<Period, HashMap<PairKey, u64>>,
}

impl PeriodCountTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` to `pair` under `period`. Zero counts are not materialized.
    pub fn add(&mut self, period: Period, pair: PairKey, count: u64) {
        let bucket = self.periods.entry(period).or_default();
        if count > 0 {
            *bucket.entry(pair).or_default() += count;
        }
    }

    /// Registers a period with no pairs, so it still shows up in `periods()`.
    pub fn touch(&mut self, period: Period) {
        self.periods.entry(period).or_default();
    }

    #[must_use]
    pub fn count(&self, period: Period, pair: &PairKey) -> u64 {
        self.periods
            .get(&period)
            .and_then(|pairs| pairs.get(pair))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn period(&self, period: Period) -> Option<&HashMap<PairKey, u64>> {
        self.periods.get(&period)
    }

    /// Periods present in the table, ascending.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.periods.keys().copied()
    }

    /// Buckets whose period falls inside `range`, ascending. Only the periods in
    /// range are visited.
    pub fn range(
        &self,
        range: RangeInclusive<Period>,
    ) -> impl Iterator<Item = (Period, &HashMap<PairKey, u64>)> + '_ {
        self.periods.range(range).map(|(p, pairs)| (*p, pairs))
    }

    /// Lowest and highest period present.
    #[must_use]
    pub fn span(&self) -> Option<(Period, Period)> {
        let lo = self.periods.keys().next()?;
        let hi = self.periods.keys().next_back()?;
        Some((*lo, *hi))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Number of (period, pair) entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.periods.values().map(HashMap::len).sum()
    }

    /// Sums another table into this one. Integer addition keeps this
    /// associative and commutative, so shards can be reduced in any order.
    pub fn absorb(&mut self, other: PeriodCountTable) {
        for (period, pairs) in other.periods {
            let bucket = self.periods.entry(period).or_default();
            if bucket.is_empty() {
                *bucket = pairs;
                continue;
            }
            for (pair, count) in pairs {
                *bucket.entry(pair).or_default() += count;
            }
        }
    }
}

/// Pair → count, summed over a period window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedCountTable {
    pairs: HashMap<PairKey, u64>,
}

impl MergedCountTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pair: PairKey, count: u64) {
        if count > 0 {
            *self.pairs.entry(pair).or_default() += count;
        }
    }

    /// Elementwise sum of two merged tables.
    pub fn absorb(&mut self, other: &MergedCountTable) {
        for (pair, count) in &other.pairs {
            *self.pairs.entry(pair.clone()).or_default() += count;
        }
    }

    #[must_use]
    pub fn get(&self, pair: &PairKey) -> u64 {
        self.pairs.get(pair).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, u64)> + '_ {
        self.pairs.iter().map(|(p, c)| (p, *c))
    }

    /// All pairs, heaviest first with deterministic tie order.
    #[must_use]
    pub fn ranked(&self) -> Vec<WeightedPair> {
        let mut all: Vec<_> = self
            .iter()
            .map(|(p, c)| WeightedPair::new(p.clone(), c))
            .collect();
        all.sort_by(WeightedPair::rank_cmp);
        all
    }
}

impl FromIterator<(PairKey, u64)> for MergedCountTable {
    fn from_iter<I: IntoIterator<Item = (PairKey, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (pair, count) in iter {
            table.add(pair, count);
        }
        table
    }
}
