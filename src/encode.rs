// src/encode.rs
//! Visual encoding: node size/color and edge thickness/opacity.
//!
//! Every value here is a pure function of the graph, its layout and the
//! encoding configuration.

use serde::Serialize;

use crate::config::EncodingConfig;
use crate::graph::{CoGraph, LayoutResult, Point};
use crate::merge::PeriodRange;
use crate::types::Period;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedNode {
    pub name: String,
    /// Present for the first `label_limit` nodes only.
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// The node's degree; mapped through the colorbar domain by the renderer.
    pub color_value: usize,
    pub degree: usize,
    pub total_weight: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedEdge {
    pub source_name: String,
    pub target_name: String,
    pub thickness: f64,
    pub opacity: f64,
    pub weight: u64,
    /// Weight rescaled to `[0, 1]` over the selected edges.
    pub normalized: f64,
    /// Anchor for the edge's hover marker.
    pub midpoint: Point,
}

/// Colorbar domain. Equal bounds mean every node has the same degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDomain {
    pub min_degree: usize,
    pub max_degree: usize,
}

impl ColorDomain {
    /// True when the domain collapsed to one value.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.min_degree == self.max_degree
    }

    /// Position of `degree` inside the domain, in `[0, 1]`. A single-value
    /// domain maps everything to 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, degree: usize) -> f64 {
        if self.is_single_value() {
            return 1.0;
        }
        let clamped = degree.clamp(self.min_degree, self.max_degree);
        (clamped - self.min_degree) as f64 / (self.max_degree - self.min_degree) as f64
    }
}

/// The payload handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedGraph {
    pub period_low: Period,
    pub period_high: Period,
    pub nodes: Vec<EncodedNode>,
    pub edges: Vec<EncodedEdge>,
    #[serde(flatten)]
    pub color_domain: ColorDomain,
}

impl EncodedGraph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// `sqrt(total_weight) * size_scale`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn node_size(total_weight: u64, config: &EncodingConfig) -> f64 {
    (total_weight as f64).sqrt() * config.size_scale
}

/// Rescales `weight` into `[0, 1]` over `[min, max]`; a flat range maps to 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalize_weight(weight: u64, min: u64, max: u64) -> f64 {
    if max > min {
        (weight.saturating_sub(min)) as f64 / (max - min) as f64
    } else {
        1.0
    }
}

#[must_use]
pub fn edge_opacity(norm: f64, config: &EncodingConfig) -> f64 {
    config.min_alpha + config.alpha_range * norm
}

#[must_use]
pub fn edge_thickness(norm: f64, config: &EncodingConfig) -> f64 {
    config.min_thickness + config.thickness_range * norm
}

/// Encodes `graph` with positions from `layout`.
#[must_use]
pub fn encode(
    graph: &CoGraph,
    layout: &LayoutResult,
    config: &EncodingConfig,
    range: PeriodRange,
) -> EncodedGraph {
    let color_domain = color_domain(graph);

    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let p = layout.get(i).unwrap_or_default();
            EncodedNode {
                name: node.name.clone(),
                label: (i < config.label_limit).then(|| node.name.clone()),
                x: p.x,
                y: p.y,
                size: node_size(node.total_weight, config),
                color_value: node.degree,
                degree: node.degree,
                total_weight: node.total_weight,
            }
        })
        .collect();

    let min_w = graph.edges().iter().map(|e| e.weight).min().unwrap_or(0);
    let max_w = graph.edges().iter().map(|e| e.weight).max().unwrap_or(0);

    let edges = graph
        .edges()
        .iter()
        .zip(graph.links())
        .map(|(edge, &(s, t))| {
            let norm = normalize_weight(edge.weight, min_w, max_w);
            let (ps, pt) = (layout.get(s).unwrap_or_default(), layout.get(t).unwrap_or_default());
            EncodedEdge {
                source_name: edge.source.clone(),
                target_name: edge.target.clone(),
                thickness: edge_thickness(norm, config),
                opacity: edge_opacity(norm, config),
                weight: edge.weight,
                normalized: norm,
                midpoint: ps.midpoint(pt),
            }
        })
        .collect();

    EncodedGraph {
        period_low: range.low(),
        period_high: range.high(),
        nodes,
        edges,
        color_domain,
    }
}

/// A node in the Sankey view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SankeyNode {
    pub name: String,
}

/// A flow between two nodes, referenced by their position in `nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

/// Index-linked flow view of the same selection as [`EncodedGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SankeyPayload {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// Sankey payload: nodes in graph order, one link per edge in selection order.
#[must_use]
pub fn sankey(graph: &CoGraph) -> SankeyPayload {
    SankeyPayload {
        nodes: graph
            .nodes()
            .iter()
            .map(|n| SankeyNode { name: n.name.clone() })
            .collect(),
        links: graph
            .edges()
            .iter()
            .zip(graph.links())
            .map(|(edge, &(source, target))| SankeyLink {
                source,
                target,
                value: edge.weight,
            })
            .collect(),
    }
}

/// Min/max degree over all nodes; `0..0` for an empty graph.
#[must_use]
pub fn color_domain(graph: &CoGraph) -> ColorDomain {
    let degrees = graph.nodes().iter().map(|n| n.degree);
    ColorDomain {
        min_degree: degrees.clone().min().unwrap_or(0),
        max_degree: degrees.max().unwrap_or(0),
    }
}
