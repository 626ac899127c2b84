//! Nearest-node lookup.
//!
//! [`NodeIndex`] is an R-tree (via `rstar`) over node positions embedded on
//! the unit sphere.  Straight-line chord distance between two unit vectors
//! grows strictly with the great-circle angle between them, so the
//! R-tree's Euclidean nearest neighbour is the great-circle nearest
//! neighbour: same answer as [`nearest_scan`], without the O(N) scan.
//!
//! [`nearest_scan`] is the plain exhaustive version, kept as the reference
//! semantics.  It breaks exact ties by node order; the R-tree breaks them
//! arbitrarily.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rn_core::{GeoPoint, NodeId};

use crate::network::{Node, RoadGraph};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3], // unit vector
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── NodeIndex ─────────────────────────────────────────────────────────────────

/// Spatial index over a fixed node set.
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load an index over `nodes`; `NodeId`s are positions in the slice.
    pub fn new(nodes: &[Node]) -> Self {
        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry {
                point: n.pos.to_unit_vector(),
                id:    NodeId::from_index(i),
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node to `pos`.  `None` for an empty index or a non-finite
    /// query point.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        self.tree
            .nearest_neighbor(&pos.to_unit_vector())
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes, sorted by ascending distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        if !pos.is_finite() {
            return Vec::new();
        }
        self.tree
            .nearest_neighbor_iter(&pos.to_unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

/// Exhaustive nearest-node scan by haversine distance.
///
/// O(nodes) per query.  Returns the first node with the minimal distance, or
/// `None` if the graph has no nodes.
pub fn nearest_scan(graph: &RoadGraph, pos: GeoPoint) -> Option<NodeId> {
    if !pos.is_finite() {
        return None;
    }
    let mut best: Option<(NodeId, f64)> = None;
    for (i, node) in graph.nodes().iter().enumerate() {
        let d = node.pos.distance_m(pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((NodeId::from_index(i), d));
        }
    }
    best.map(|(id, _)| id)
}
