// src/graph/components.rs
//! Connected components via union-find.

use super::CoGraph;

pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

// Indexing is safe here: all indices passed to find/union must be < n (from new()).
// Graph links only ever hold indices into the node list the structure was sized from.
#[allow(clippy::indexing_slicing)]
impl UnionFind {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);

        if rx == ry {
            return;
        }

        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }
}

/// Node indices of each connected component.
///
/// Members are ascending within a component. Components are ordered largest
/// first, ties by smallest member index, so the order depends only on topology
/// and node order.
#[must_use]
pub fn connected_components(graph: &CoGraph) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut uf = UnionFind::new(n);
    for &(a, b) in graph.links() {
        uf.union(a, b);
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for node in 0..n {
        let root = uf.find(node);
        let slot = match slot_of_root.get(root).copied().flatten() {
            Some(s) => s,
            None => {
                groups.push(Vec::new());
                if let Some(entry) = slot_of_root.get_mut(root) {
                    *entry = Some(groups.len() - 1);
                }
                groups.len() - 1
            }
        };
        if let Some(group) = groups.get_mut(slot) {
            group.push(node);
        }
    }

    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));
    groups
}
