// src/types.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A discrete time bucket, in practice a calendar year.
pub type Period = i32;

/// One mention of an entity inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub document_id: String,
    pub period: Period,
    pub entity: String,
}

impl Observation {
    #[must_use]
    pub fn new(document_id: impl Into<String>, period: Period, entity: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            period,
            entity: entity.into(),
        }
    }
}

/// Unordered pair of two distinct entity names.
///
/// The names are stored sorted, so `(A, B)` and `(B, A)` compare and hash
/// identically. The derived ordering is lexicographic on the canonical pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Canonicalizes two names into a pair. Returns `None` when they are equal.
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            Ordering::Less => Some(Self { first: a, second: b }),
            Ordering::Greater => Some(Self { first: b, second: a }),
            Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// A pair together with its merged count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPair {
    pub pair: PairKey,
    pub count: u64,
}

impl WeightedPair {
    #[must_use]
    pub fn new(pair: PairKey, count: u64) -> Self {
        Self { pair, count }
    }

    /// Heaviest first, then lexicographic on the pair.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.pair.cmp(&other.pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pair_key_is_order_independent() {
        let ab = PairKey::new("numpy", "scipy");
        let ba = PairKey::new("scipy", "numpy");
        assert_eq!(ab, ba);

        let set: HashSet<_> = [ab, ba].into_iter().flatten().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn pair_key_contains_either_member() {
        let pair = PairKey::new("scipy", "numpy").unwrap();
        assert!(pair.contains("numpy"));
        assert!(pair.contains("scipy"));
        assert!(!pair.contains("pandas"));
    }

    #[test]
    fn pair_key_rejects_self_pair() {
        assert!(PairKey::new("R", "R").is_none());
    }

    #[test]
    fn rank_cmp_breaks_ties_on_pair() {
        let ab = WeightedPair::new(PairKey::new("A", "B").unwrap(), 2);
        let bc = WeightedPair::new(PairKey::new("B", "C").unwrap(), 2);
        let ac = WeightedPair::new(PairKey::new("A", "C").unwrap(), 5);
        let mut v = vec![bc.clone(), ab.clone(), ac.clone()];
        v.sort_by(WeightedPair::rank_cmp);
        assert_eq!(v, vec![ac, ab, bc]);
    }
}
