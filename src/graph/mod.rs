// src/graph/mod.rs
//! Co-mention graph: nodes and weighted edges built from selected pairs.

pub mod builder;
pub mod components;
pub mod layout;

pub use builder::build;
pub use layout::{LayoutResult, Point};

use std::collections::HashMap;

use serde::Serialize;

/// An entity with its weighted-degree statistics.
///
/// Edges are stored once per pair, from the pair's first name to its second,
/// so `in_weight`/`out_weight` split `total_weight` by storage direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub in_weight: u64,
    pub out_weight: u64,
    /// Distinct incident edges.
    pub degree: usize,
    /// Sum of incident edge weights.
    pub total_weight: u64,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            in_weight: 0,
            out_weight: 0,
            degree: 0,
            total_weight: 0,
        }
    }
}

/// A selected pair. `weight` is its merged count and is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: u64,
}

/// The graph for one query.
#[derive(Debug, Clone, Default)]
pub struct CoGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Endpoint indices into `nodes`, parallel to `edges`.
    links: Vec<(usize, usize)>,
    index: HashMap<String, usize>,
}

impl CoGraph {
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Endpoint indices for each edge, in edge order.
    #[must_use]
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).and_then(|&i| self.nodes.get(i))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_edge_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}
