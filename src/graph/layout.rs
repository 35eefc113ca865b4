// src/graph/layout.rs
//! Deterministic force-directed layout.
//!
//! Each connected component gets its own `force_graph::ForceGraph` (charge
//! repulsion plus edge springs, damped) stepped a fixed number of times.
//! Components are then shelf-packed (largest first) with a gap, and the whole
//! drawing is scaled into `[-1, 1]²` keeping its aspect ratio.
//!
//! Initialization: nodes of a component start on a circle in node order, with
//! a small jitter from a `StdRng` seeded by `LayoutConfig::seed` and the
//! component's rank. The simulation itself is deterministic, so the same graph
//! and parameters always yield the same coordinates.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::components::connected_components;
use super::CoGraph;
use crate::config::LayoutConfig;

/// Simulation space is in pixels; one ideal edge length maps to this many.
const PIXELS_PER_UNIT: f64 = 100.0;
/// Initial jitter, in pixels.
const JITTER: f64 = 0.1;
const NODE_MASS: f32 = 10.0;
const STEP: f32 = 0.016;
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    fn of(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        }))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Node coordinates, parallel to `CoGraph::nodes()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    points: Vec<Point>,
}

impl LayoutResult {
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    #[must_use]
    pub fn position(&self, graph: &CoGraph, name: &str) -> Option<Point> {
        graph.index_of(name).and_then(|i| self.get(i))
    }

    /// Name → coordinates.
    #[must_use]
    pub fn to_map(&self, graph: &CoGraph) -> BTreeMap<String, Point> {
        graph
            .nodes()
            .iter()
            .zip(&self.points)
            .map(|(n, p)| (n.name.clone(), *p))
            .collect()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(self.points.iter().copied())
    }
}

/// Computes coordinates for every node of `graph`.
#[must_use]
pub fn compute(graph: &CoGraph, config: &LayoutConfig) -> LayoutResult {
    let n = graph.node_count();
    if n == 0 {
        return LayoutResult::default();
    }
    let k = config.ideal_length.unwrap_or(1.0);

    let components = connected_components(graph);
    let mut component_of = vec![0usize; n];
    let mut local_of = vec![0usize; n];
    for (ci, members) in components.iter().enumerate() {
        for (li, &node) in members.iter().enumerate() {
            if let (Some(c), Some(l)) = (component_of.get_mut(node), local_of.get_mut(node)) {
                *c = ci;
                *l = li;
            }
        }
    }

    let mut local_links: Vec<Vec<(usize, usize)>> = vec![Vec::new(); components.len()];
    for &(a, b) in graph.links() {
        let (Some(&ci), Some(&la), Some(&lb)) = (component_of.get(a), local_of.get(a), local_of.get(b)) else {
            continue;
        };
        if let Some(links) = local_links.get_mut(ci) {
            links.push((la, lb));
        }
    }

    let drawings: Vec<Vec<Point>> = components
        .iter()
        .zip(&local_links)
        .enumerate()
        .map(|(ci, (members, links))| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add((ci as u64).wrapping_mul(STREAM_STRIDE)));
            spring_embed(members.len(), links, k, config.iterations, &mut rng)
        })
        .collect();

    // gap must stay positive
    let gap = if config.component_gap > 0.0 { k * config.component_gap } else { k };
    let packed = pack(drawings, gap);

    let mut points = vec![Point::default(); n];
    for (members, drawing) in components.iter().zip(packed) {
        for (&node, p) in members.iter().zip(drawing) {
            if let Some(slot) = points.get_mut(node) {
                *slot = p;
            }
        }
    }
    normalize(&mut points);

    tracing::debug!(nodes = n, components = components.len(), "computed layout");
    LayoutResult { points }
}

/// Runs a `ForceGraph` simulation on one connected component and returns
/// its drawing centered on the origin, in units of the ideal edge length.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn spring_embed(n: usize, links: &[(usize, usize)], k: f64, iterations: usize, rng: &mut StdRng) -> Vec<Point> {
    if n == 1 {
        return vec![Point::default()];
    }

    let radius = (n as f64 / (2.0 * PI)).max(0.5) * PIXELS_PER_UNIT;
    let start: Vec<Point> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Point::new(
                radius * angle.cos() + rng.random_range(-JITTER..JITTER),
                radius * angle.sin() + rng.random_range(-JITTER..JITTER),
            )
        })
        .collect();

    let mut graph: ForceGraph<(), ()> = ForceGraph::new(simulation_parameters());
    let mut local: HashMap<DefaultNodeIdx, usize> = HashMap::with_capacity(n);
    let handles: Vec<DefaultNodeIdx> = start
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let idx = graph.add_node(NodeData {
                x: p.x as f32,
                y: p.y as f32,
                mass: NODE_MASS,
                is_anchor: false,
                user_data: (),
            });
            local.insert(idx, i);
            idx
        })
        .collect();
    for &(a, b) in links {
        if let (Some(&src), Some(&tgt)) = (handles.get(a), handles.get(b)) {
            graph.add_edge(src, tgt, EdgeData::default());
        }
    }

    for _ in 0..iterations {
        graph.update(STEP);
    }

    let mut pos = start.clone();
    let mut finite = true;
    graph.visit_nodes(|node| {
        let (x, y) = (f64::from(node.x()), f64::from(node.y()));
        finite &= x.is_finite() && y.is_finite();
        if let Some(slot) = local.get(&node.index()).and_then(|&i| pos.get_mut(i)) {
            *slot = Point::new(x, y);
        }
    });
    if !finite {
        tracing::warn!(nodes = n, "force simulation diverged, keeping initial circle");
        pos = start;
    }

    let scale = k / PIXELS_PER_UNIT;
    for p in &mut pos {
        p.x *= scale;
        p.y *= scale;
    }
    center(&mut pos);
    pos
}

fn simulation_parameters() -> SimulationParameters {
    SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    }
}

/// Shelf packing: rows of components, left to right, each bounding box at
/// least `gap` away from its neighbours. Input order is kept.
fn pack(drawings: Vec<Vec<Point>>, gap: f64) -> Vec<Vec<Point>> {
    let boxes: Vec<Bounds> = drawings
        .iter()
        .map(|d| Bounds::of(d.iter().copied()).unwrap_or(Bounds { min: Point::default(), max: Point::default() }))
        .collect();

    let area: f64 = boxes
        .iter()
        .map(|b| (b.width() + gap) * (b.height() + gap))
        .sum();
    let widest = boxes.iter().map(Bounds::width).fold(0.0, f64::max);
    let row_limit = area.sqrt().max(widest);

    let (mut cursor_x, mut cursor_y, mut row_height) = (0.0_f64, 0.0_f64, 0.0_f64);
    let mut row_started = false;
    let mut out = Vec::with_capacity(drawings.len());

    for (mut drawing, b) in drawings.into_iter().zip(&boxes) {
        if row_started && cursor_x + b.width() > row_limit {
            cursor_x = 0.0;
            cursor_y += row_height + gap;
            row_height = 0.0;
        }
        let (shift_x, shift_y) = (cursor_x - b.min.x, cursor_y - b.min.y);
        for p in &mut drawing {
            p.x += shift_x;
            p.y += shift_y;
        }
        cursor_x += b.width() + gap;
        row_height = row_height.max(b.height());
        row_started = true;
        out.push(drawing);
    }
    out
}

/// Moves the drawing's bounding-box midpoint to the origin.
fn center(points: &mut [Point]) {
    let Some(b) = Bounds::of(points.iter().copied()) else {
        return;
    };
    let (cx, cy) = ((b.min.x + b.max.x) / 2.0, (b.min.y + b.max.y) / 2.0);
    for p in points.iter_mut() {
        p.x -= cx;
        p.y -= cy;
    }
}

/// Centers the drawing and scales its longer side to span `[-1, 1]`.
fn normalize(points: &mut [Point]) {
    let Some(b) = Bounds::of(points.iter().copied()) else {
        return;
    };
    let span = b.width().max(b.height());
    let (cx, cy) = ((b.min.x + b.max.x) / 2.0, (b.min.y + b.max.y) / 2.0);
    let scale = if span > 0.0 { 2.0 / span } else { 0.0 };
    for p in points.iter_mut() {
        p.x = (p.x - cx) * scale;
        p.y = (p.y - cy) * scale;
    }
}
