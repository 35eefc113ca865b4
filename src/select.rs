// src/select.rs
//! Top-K selection over a merged table.

use crate::table::MergedCountTable;
use crate::types::WeightedPair;

/// Returns the `k` heaviest pairs, heaviest first, ties broken by the
/// lexicographic order of the canonical pair. `k` larger than the table
/// returns every pair; `k == 0` returns nothing.
#[must_use]
pub fn top_k(table: &MergedCountTable, k: usize) -> Vec<WeightedPair> {
    if k == 0 || table.is_empty() {
        return Vec::new();
    }

    let mut all: Vec<WeightedPair> = table
        .iter()
        .map(|(pair, count)| WeightedPair::new(pair.clone(), count))
        .collect();

    if k < all.len() {
        all.select_nth_unstable_by(k - 1, WeightedPair::rank_cmp);
        all.truncate(k);
    }
    all.sort_by(WeightedPair::rank_cmp);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PairKey;

    fn table(entries: &[(&str, &str, u64)]) -> MergedCountTable {
        entries
            .iter()
            .map(|(a, b, c)| (PairKey::new(*a, *b).unwrap(), *c))
            .collect()
    }

    #[test]
    fn zero_k_is_empty() {
        assert!(top_k(&table(&[("A", "B", 3)]), 0).is_empty());
    }

    #[test]
    fn oversized_k_returns_everything() {
        let t = table(&[("A", "B", 3), ("B", "C", 1)]);
        assert_eq!(top_k(&t, 50).len(), 2);
    }

    #[test]
    fn ties_resolve_lexicographically() {
        let t = table(&[("C", "D", 2), ("A", "C", 1), ("B", "C", 2), ("A", "B", 2)]);
        let got: Vec<String> = top_k(&t, 2).iter().map(|w| w.pair.to_string()).collect();
        assert_eq!(got, vec!["(A, B)", "(B, C)"]);
    }

    #[test]
    fn matches_full_ranking_prefix() {
        let entries: Vec<(String, String, u64)> = (0..40u64)
            .map(|i| (format!("e{i:02}"), format!("f{:02}", i % 7), i % 5))
            .collect();
        let t: MergedCountTable = entries
            .iter()
            .map(|(a, b, c)| (PairKey::new(a.as_str(), b.as_str()).unwrap(), *c))
            .collect();
        let ranked = t.ranked();
        for k in 0..=ranked.len() + 2 {
            let want: Vec<_> = ranked.iter().take(k).cloned().collect();
            assert_eq!(top_k(&t, k), want, "k = {k}");
        }
    }
}
