//! Software co-mention networks.
//!
//! Observations of `(document, period, entity)` are aggregated into
//! per-period pair counts, merged over a period window, cut down to the
//! top-K heaviest pairs, turned into a graph, laid out in 2-D, and encoded
//! as node/edge geometry for a renderer.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod encode;
pub mod error;
pub mod exit;
pub mod graph;
pub mod ingest;
pub mod merge;
pub mod pipeline;
pub mod select;
pub mod store;
pub mod table;
pub mod trends;
pub mod types;

pub use error::{ComentionError, Result};
pub use pipeline::{run_query, Query};
pub use table::{MergedCountTable, PeriodCountTable};
pub use types::{Observation, PairKey, Period, WeightedPair};
