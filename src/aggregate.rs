// src/aggregate.rs
//! Co-occurrence aggregation: observations → period-keyed pair counts.
//!
//! Observations are hash-grouped by document. Each document resolves a single
//! period (the period of its first observation in stream order) and a set of
//! distinct entities; every unordered pair from that set adds 1 under that
//! period only.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::table::PeriodCountTable;
use crate::types::{Observation, PairKey, Period};

/// All mentions of one document, collapsed to distinct entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentGroup<'a> {
    pub document_id: &'a str,
    pub period: Period,
    pub entities: HashSet<&'a str>,
}

impl DocumentGroup<'_> {
    /// Number of pair increments this document contributes: k·(k−1)/2.
    #[must_use]
    pub fn pair_count(&self) -> u64 {
        let k = self.entities.len() as u64;
        k * k.saturating_sub(1) / 2
    }

    /// Canonical pairs, in a stable order.
    #[must_use]
    pub fn pairs(&self) -> Vec<PairKey> {
        let mut names: Vec<&str> = self.entities.iter().copied().collect();
        names.sort_unstable();
        let mut out = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                if let Some(pair) = PairKey::new(*a, *b) {
                    out.push(pair);
                }
            }
        }
        out
    }
}

/// Counters for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Distinct documents seen.
    pub documents: usize,
    /// Documents with at least two distinct entities.
    pub documents_paired: usize,
    /// Total pair increments written.
    pub pair_increments: u64,
    /// Observations whose period disagreed with their document's resolved period.
    pub conflicting_periods: usize,
}

impl AggregateStats {
    fn merge(mut self, other: Self) -> Self {
        self.documents += other.documents;
        self.documents_paired += other.documents_paired;
        self.pair_increments += other.pair_increments;
        self.conflicting_periods += other.conflicting_periods;
        self
    }
}

/// Groups observations by document id, keeping first-seen document order.
///
/// Returns the groups and the number of observations whose period conflicted
/// with the first period seen for their document.
#[must_use]
pub fn group_documents(observations: &[Observation]) -> (Vec<DocumentGroup<'_>>, usize) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DocumentGroup<'_>> = Vec::new();
    let mut conflicts = 0;

    for obs in observations {
        let slot = *index.entry(obs.document_id.as_str()).or_insert_with(|| {
            groups.push(DocumentGroup {
                document_id: obs.document_id.as_str(),
                period: obs.period,
                entities: HashSet::new(),
            });
            groups.len() - 1
        });
        let Some(group) = groups.get_mut(slot) else {
            continue;
        };
        if group.period != obs.period {
            tracing::debug!(
                document = %obs.document_id,
                resolved = group.period,
                seen = obs.period,
                "conflicting period for document"
            );
            conflicts += 1;
        }
        group.entities.insert(obs.entity.as_str());
    }

    (groups, conflicts)
}

/// Incremental accumulator. Feed it document groups from any grouping
/// mechanism that visits each document exactly once.
#[derive(Debug, Default)]
pub struct Aggregator {
    table: PeriodCountTable,
    stats: AggregateStats,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, group: &DocumentGroup<'_>) {
        self.stats.documents += 1;
        self.table.touch(group.period);
        if group.entities.len() < 2 {
            return;
        }
        self.stats.documents_paired += 1;
        for pair in group.pairs() {
            self.table.add(group.period, pair, 1);
            self.stats.pair_increments += 1;
        }
    }

    /// Folds another accumulator into this one.
    pub fn absorb(&mut self, other: Aggregator) {
        self.table.absorb(other.table);
        self.stats = self.stats.merge(other.stats);
    }

    #[must_use]
    pub fn finish(self) -> (PeriodCountTable, AggregateStats) {
        (self.table, self.stats)
    }
}

/// Aggregates on the current thread.
#[must_use]
pub fn aggregate(observations: &[Observation]) -> (PeriodCountTable, AggregateStats) {
    let (groups, conflicts) = group_documents(observations);
    let mut agg = Aggregator::new();
    for group in &groups {
        agg.add_document(group);
    }
    agg.stats.conflicting_periods = conflicts;
    let (table, stats) = agg.finish();
    log_summary(&table, &stats);
    (table, stats)
}

/// Aggregates with one private shard per rayon worker, reduced by summation.
/// Produces exactly the same table as [`aggregate`].
#[must_use]
pub fn aggregate_par(observations: &[Observation]) -> (PeriodCountTable, AggregateStats) {
    let (groups, conflicts) = group_documents(observations);
    let mut agg = groups
        .par_iter()
        .fold(Aggregator::new, |mut acc, group| {
            acc.add_document(group);
            acc
        })
        .reduce(Aggregator::new, |mut left, right| {
            left.absorb(right);
            left
        });
    agg.stats.conflicting_periods = conflicts;
    let (table, stats) = agg.finish();
    log_summary(&table, &stats);
    (table, stats)
}

fn log_summary(table: &PeriodCountTable, stats: &AggregateStats) {
    tracing::info!(
        documents = stats.documents,
        paired = stats.documents_paired,
        increments = stats.pair_increments,
        conflicting_periods = stats.conflicting_periods,
        entries = table.entry_count(),
        "aggregated co-mentions"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(doc: &str, period: Period, entity: &str) -> Observation {
        Observation::new(doc, period, entity)
    }

    fn pair(a: &str, b: &str) -> PairKey {
        PairKey::new(a, b).unwrap()
    }

    #[test]
    fn duplicate_mentions_count_once() {
        let input = vec![
            obs("d1", 2010, "A"),
            obs("d1", 2010, "A"),
            obs("d1", 2010, "B"),
        ];
        let (table, stats) = aggregate(&input);
        assert_eq!(table.count(2010, &pair("A", "B")), 1);
        assert_eq!(stats.pair_increments, 1);
    }

    #[test]
    fn document_period_resolved_once() {
        let input = vec![
            obs("d1", 2010, "A"),
            obs("d1", 2011, "B"),
            obs("d1", 2010, "C"),
        ];
        let (table, stats) = aggregate(&input);
        assert_eq!(table.count(2010, &pair("A", "B")), 1);
        assert_eq!(table.count(2011, &pair("A", "B")), 0);
        assert!(table.period(2011).is_none());
        assert_eq!(stats.conflicting_periods, 1);
        assert_eq!(stats.pair_increments, 3);
    }

    #[test]
    fn single_entity_document_contributes_nothing() {
        let (table, stats) = aggregate(&[obs("d1", 2010, "A"), obs("d1", 2010, "A")]);
        assert_eq!(table.entry_count(), 0);
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.documents_paired, 0);
    }

    #[test]
    fn interleaved_documents_group_correctly() {
        let input = vec![
            obs("d1", 2010, "A"),
            obs("d2", 2011, "A"),
            obs("d1", 2010, "B"),
            obs("d2", 2011, "C"),
        ];
        let (table, _) = aggregate(&input);
        assert_eq!(table.count(2010, &pair("A", "B")), 1);
        assert_eq!(table.count(2011, &pair("A", "C")), 1);
        assert_eq!(table.count(2010, &pair("A", "C")), 0);
    }

    #[test]
    fn pair_count_is_k_choose_two() {
        let input: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|e| obs("d", 2000, e))
            .collect();
        let (groups, _) = group_documents(&input);
        assert_eq!(groups[0].pair_count(), 10);
        assert_eq!(groups[0].pairs().len(), 10);
    }
}
