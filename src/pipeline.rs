// src/pipeline.rs
//! Query orchestration: merge → select → build → layout → encode.
//!
//! Queries only borrow the `PeriodCountTable`, so any number of them may run
//! concurrently against one shared table.

use crate::config::Config;
use crate::encode::{self, EncodedGraph};
use crate::error::{ComentionError, Result};
use crate::graph::{self, layout, CoGraph, LayoutResult};
use crate::merge::{merge_range, PeriodRange};
use crate::select::top_k;
use crate::table::PeriodCountTable;
use crate::types::{Period, WeightedPair};

/// A validated request: a closed period window and a Top-K bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub range: PeriodRange,
    pub top_k: usize,
}

impl Query {
    /// Validates raw boundary values.
    ///
    /// # Errors
    /// Returns `InvalidRange` when `low > high` and `InvalidTopK` when `k < 0`.
    pub fn new(low: Period, high: Period, k: i64) -> Result<Self> {
        let range = PeriodRange::new(low, high)?;
        let top_k = usize::try_from(k).map_err(|_| ComentionError::InvalidTopK(k))?;
        Ok(Self { range, top_k })
    }
}

/// Every intermediate product of one query.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub selected: Vec<WeightedPair>,
    pub graph: CoGraph,
    pub layout: LayoutResult,
    pub encoded: EncodedGraph,
}

/// Runs a query and keeps the intermediate stages.
#[must_use]
pub fn run_detailed(table: &PeriodCountTable, query: &Query, config: &Config) -> QueryOutput {
    let merged = merge_range(table, query.range);
    let selected = top_k(&merged, query.top_k);
    if selected.is_empty() {
        tracing::warn!(
            low = query.range.low(),
            high = query.range.high(),
            "query selected no pairs"
        );
    }
    let graph = graph::build(&selected);
    let layout = layout::compute(&graph, &config.layout);
    let encoded = encode::encode(&graph, &layout, &config.encoding, query.range);

    tracing::info!(
        low = query.range.low(),
        high = query.range.high(),
        k = query.top_k,
        merged = merged.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "query complete"
    );

    QueryOutput {
        selected,
        graph,
        layout,
        encoded,
    }
}

/// Runs a query and returns only the renderer payload.
#[must_use]
pub fn run_query(table: &PeriodCountTable, query: &Query, config: &Config) -> EncodedGraph {
    run_detailed(table, query, config).encoded
}
