// src/trends.rs
//! Mention trends: how often each entity is mentioned per period.
//!
//! Unlike co-occurrence, every observation counts here, including repeated
//! mentions inside one document.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::merge::PeriodRange;
use crate::types::{Observation, Period};

/// Raw mention counts per period and entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionCounts {
    periods: BTreeMap<Period, HashMap<String, u64>>,
}

impl MentionCounts {
    #[must_use]
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut periods: BTreeMap<Period, HashMap<String, u64>> = BTreeMap::new();
        for obs in observations {
            *periods
                .entry(obs.period)
                .or_default()
                .entry(obs.entity.clone())
                .or_default() += 1;
        }
        Self { periods }
    }

    #[must_use]
    pub fn count(&self, period: Period, entity: &str) -> u64 {
        self.periods
            .get(&period)
            .and_then(|m| m.get(entity))
            .copied()
            .unwrap_or(0)
    }

    /// All mentions in `period`.
    #[must_use]
    pub fn period_total(&self, period: Period) -> u64 {
        self.periods.get(&period).map_or(0, |m| m.values().sum())
    }

    #[must_use]
    pub fn span(&self) -> Option<(Period, Period)> {
        Some((*self.periods.keys().next()?, *self.periods.keys().next_back()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendMode {
    #[default]
    Count,
    /// Share of all mentions in the period, in percent.
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTrend {
    pub entity: String,
    /// Mentions over the whole range.
    pub total: u64,
    /// One value per period present in the range, ascending.
    pub series: Vec<(Period, f64)>,
}

/// The `n` most mentioned entities in `range` (ties by name), each with its
/// per-period series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn top_entities(
    counts: &MentionCounts,
    range: PeriodRange,
    n: usize,
    mode: TrendMode,
) -> Vec<EntityTrend> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for (_, entities) in counts.periods.range(range.as_range()) {
        for (entity, c) in entities {
            *totals.entry(entity.as_str()).or_default() += c;
        }
    }

    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);

    let periods: Vec<(Period, u64)> = counts
        .periods
        .range(range.as_range())
        .map(|(p, m)| (*p, m.values().sum()))
        .collect();

    ranked
        .into_iter()
        .map(|(entity, total)| {
            let series = periods
                .iter()
                .map(|&(period, period_total)| {
                    let c = counts.count(period, entity) as f64;
                    let value = match mode {
                        TrendMode::Count => c,
                        TrendMode::Percentage if period_total > 0 => c / period_total as f64 * 100.0,
                        TrendMode::Percentage => 0.0,
                    };
                    (period, value)
                })
                .collect();
            EntityTrend {
                entity: entity.to_string(),
                total,
                series,
            }
        })
        .collect()
}
