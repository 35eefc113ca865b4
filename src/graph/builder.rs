// src/graph/builder.rs
//! Graph construction from the selected pair list.

use std::collections::HashMap;

use super::{CoGraph, Edge, Node};
use crate::types::WeightedPair;

/// Builds nodes and edges in one pass over `selected`, using a name → index map.
///
/// Nodes appear in order of first mention in `selected` (first name before
/// second), each exactly once. Only names referenced by a selected pair become
/// nodes. Zero-count pairs are skipped.
#[must_use]
pub fn build(selected: &[WeightedPair]) -> CoGraph {
    let mut nodes: Vec<Node> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut edges = Vec::with_capacity(selected.len());
    let mut links = Vec::with_capacity(selected.len());

    for wp in selected.iter().filter(|wp| wp.count > 0) {
        let src = intern(wp.pair.first(), &mut nodes, &mut index);
        let dst = intern(wp.pair.second(), &mut nodes, &mut index);

        accumulate(&mut nodes, src, wp.count, Direction::Out);
        accumulate(&mut nodes, dst, wp.count, Direction::In);

        edges.push(Edge {
            source: wp.pair.first().to_string(),
            target: wp.pair.second().to_string(),
            weight: wp.count,
        });
        links.push((src, dst));
    }

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "built co-mention graph");
    CoGraph {
        nodes,
        edges,
        links,
        index,
    }
}

#[derive(Clone, Copy)]
enum Direction {
    In,
    Out,
}

fn intern(name: &str, nodes: &mut Vec<Node>, index: &mut HashMap<String, usize>) -> usize {
    if let Some(&i) = index.get(name) {
        return i;
    }
    let i = nodes.len();
    nodes.push(Node::new(name.to_string()));
    index.insert(name.to_string(), i);
    i
}

fn accumulate(nodes: &mut [Node], idx: usize, weight: u64, dir: Direction) {
    let Some(node) = nodes.get_mut(idx) else {
        return;
    };
    node.degree += 1;
    node.total_weight += weight;
    match dir {
        Direction::In => node.in_weight += weight,
        Direction::Out => node.out_weight += weight,
    }
}
