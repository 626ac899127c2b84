//! Road graph representation and builder.
//!
//! # Data layout
//!
//! Segments are stored in creation order and indexed by `EdgeId`.  Creation
//! order is the order ways (and their coordinate pairs) were fed to the
//! builder, so writing a graph out and reading it back reproduces the same
//! ids.  Adjacency is kept in **CSR** form as index arrays on top of that:
//!
//! ```text
//! out_edges[ out_start[n] .. out_start[n+1] ]   // EdgeIds leaving n
//! in_edges [ in_start[n]  .. in_start[n+1]  ]   // EdgeIds entering n
//! ```
//!
//! Both slices preserve creation order within a node, so iteration order is
//! deterministic.
//!
//! # Mutability
//!
//! After [`RoadGraphBuilder::build`] the topology is frozen.  The only
//! mutation is flipping block flags on existing segments (see
//! [`crate::incident`]), which requires `&mut RoadGraph`; concurrent searches
//! take `&RoadGraph`, so the borrow checker serializes the two.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use rn_core::{EdgeId, GeoPoint, GraphConfig, NodeId, NodeKey};

use crate::attributes::{BlockFlags, SegmentAttributes, derive_attributes};
use crate::index::NodeIndex;
use crate::way::RawWay;
use crate::GraphResult;

// ── Node / Segment ────────────────────────────────────────────────────────────

/// A graph node.  `pos` is fixed when the node is created and never updated.
///
/// Graphs built from ways keep the first raw coordinate that produced `key`;
/// graphs read back from an edge table only have the key, so their `pos` is
/// [`NodeKey::to_point`].  The two differ by at most half a quantization step
/// per axis, which can shift heuristic estimates and nearest-node ties
/// slightly between a built graph and its reloaded copy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub key: NodeKey,
    pub pos: GeoPoint,
}

/// A directed unit segment between two consecutive way coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub from:        NodeId,
    pub to:          NodeId,
    /// Identifier of the way this segment was split from.
    pub way_id:      i64,
    pub attrs:       SegmentAttributes,
    /// Great-circle distance between the two endpoint coordinates, metres.
    pub length_m:    f64,
    pub block:       BlockFlags,
    pub provenance:  String,
    pub ingested_at: DateTime<Utc>,
}

impl Segment {
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.block.is_blocked()
    }

    /// `true` if `node` is either endpoint.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road-segment graph with CSR adjacency and a spatial node index.
///
/// Do not construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    nodes:     Vec<Node>,
    key_index: FxHashMap<NodeKey, NodeId>,
    precision: u32,

    edges: Vec<Segment>,

    out_start: Vec<u32>,
    out_edges: Vec<EdgeId>,
    in_start:  Vec<u32>,
    in_edges:  Vec<EdgeId>,

    spatial_idx: NodeIndex,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any search against it finds no path and any nearest-node query
    /// returns `None`.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    /// Build a graph from `ways` in one call.
    pub fn from_ways<'a>(
        ways: impl IntoIterator<Item = &'a RawWay>,
        config: GraphConfig,
    ) -> GraphResult<Self> {
        let mut b = RoadGraphBuilder::with_config(config)?;
        for way in ways {
            b.add_way(way);
        }
        Ok(b.build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Decimal precision of every key in this graph.
    pub fn key_precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    // ── Element access ────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    /// # Panics
    /// Panics if `id` is out of range; edge ids only come from this graph.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Segment {
        &self.edges[id.index()]
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Segment {
        &mut self.edges[id.index()]
    }

    /// Resolve a key to its node, if the graph has one.
    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        if key.precision() != self.precision {
            return None;
        }
        self.key_index.get(key).copied()
    }

    /// Resolve a `"<lat>_<lon>"` string at this graph's precision.  Malformed
    /// strings are a miss, not an error.
    pub fn node_id_str(&self, key: &str) -> Option<NodeId> {
        NodeKey::parse(key, self.precision)
            .ok()
            .and_then(|k| self.node_id(&k))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `EdgeId`s of all segments leaving `node`, in creation order.
    ///
    /// # Panics
    /// Panics if `node` is not in the graph.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.out_start[node.index()] as usize;
        let end   = self.out_start[node.index() + 1] as usize;
        self.out_edges[start..end].iter().copied()
    }

    /// `EdgeId`s of all segments entering `node`, in creation order.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.in_start[node.index()] as usize;
        let end   = self.in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.out_start[node.index() + 1] - self.out_start[node.index()]) as usize
    }

    /// Every segment with `node` as source or destination, each once
    /// (self-loops are not duplicated).
    pub fn touching_edges(&self, node: NodeId) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .out_edges(node)
            .chain(self.in_edges(node))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos` by great-circle distance, or `None` if the
    /// graph has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx.nearest(pos)
    }

    /// Up to `k` nearest nodes, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx.k_nearest(pos, k)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes are created lazily, the first time a quantized coordinate is seen.
/// Each way yields exactly `coords.len() - 1` directed segments in coordinate
/// order; no reverse segments are added and parallel segments from distinct
/// ways are kept.
///
/// # Example
///
/// ```
/// use rn_core::GeoPoint;
/// use rn_graph::{RawWay, RoadGraphBuilder};
///
/// let way = RawWay::with_tags(
///     1,
///     [("highway", "residential")],
///     vec![GeoPoint::new(12.9700, 77.5900), GeoPoint::new(12.9710, 77.5900)],
/// );
/// let mut b = RoadGraphBuilder::new();
/// assert_eq!(b.add_way(&way), 1);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct RoadGraphBuilder {
    config:       GraphConfig,
    ingested_at:  DateTime<Utc>,
    nodes:        Vec<Node>,
    key_index:    FxHashMap<NodeKey, NodeId>,
    edges:        Vec<Segment>,
    skipped_ways: usize,
}

impl RoadGraphBuilder {
    /// A builder with [`GraphConfig::default`], stamping segments with the
    /// current time.
    pub fn new() -> Self {
        Self {
            config:       GraphConfig::default(),
            ingested_at:  Utc::now(),
            nodes:        Vec::new(),
            key_index:    FxHashMap::default(),
            edges:        Vec::new(),
            skipped_ways: 0,
        }
    }

    /// A builder with a validated custom configuration.
    pub fn with_config(config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    /// Override the ingestion timestamp recorded on every segment built from
    /// ways.  Fixes the value for reproducible output.
    pub fn ingested_at(mut self, ts: DateTime<Utc>) -> Self {
        self.ingested_at = ts;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Ways dropped so far for having under two usable coordinates.
    pub fn skipped_ways(&self) -> usize { self.skipped_ways }

    /// Split `way` into unit segments and add them.  Returns the number of
    /// segments added.
    ///
    /// Ways with fewer than two coordinates, or with a coordinate that cannot
    /// be quantized (NaN, ±∞), are skipped whole and counted in
    /// [`skipped_ways`](Self::skipped_ways).
    pub fn add_way(&mut self, way: &RawWay) -> usize {
        if way.coords.len() < 2 {
            debug!("skipping way {}: {} coordinate(s)", way.id, way.coords.len());
            self.skipped_ways += 1;
            return 0;
        }

        // Quantize everything first so a bad coordinate leaves no partial way.
        let keys: Result<Vec<NodeKey>, _> = way
            .coords
            .iter()
            .map(|&c| NodeKey::new(c, self.config.key_precision))
            .collect();
        let keys = match keys {
            Ok(keys) => keys,
            Err(e) => {
                warn!("skipping way {}: {e}", way.id);
                self.skipped_ways += 1;
                return 0;
            }
        };

        let attrs = derive_attributes(&way.tags);

        for (pair, key_pair) in way.coords.windows(2).zip(keys.windows(2)) {
            let (a, b) = (pair[0], pair[1]);
            let from = self.intern(key_pair[0], a);
            let to   = self.intern(key_pair[1], b);
            self.edges.push(Segment {
                from,
                to,
                way_id:      way.id,
                attrs:       attrs.clone(),
                length_m:    a.distance_m(b),
                block:       BlockFlags::default(),
                provenance:  self.config.provenance.clone(),
                ingested_at: self.ingested_at,
            });
        }
        way.segment_count()
    }

    /// Return the node for `key`, creating it at `pos` if unseen.
    pub fn intern(&mut self, key: NodeKey, pos: GeoPoint) -> NodeId {
        if let Some(&id) = self.key_index.get(&key) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node { key, pos });
        self.key_index.insert(key, id);
        id
    }

    /// Add a fully formed segment, e.g. one read back from a persisted edge
    /// table.  `seg.from` / `seg.to` must come from [`intern`](Self::intern).
    pub fn push_segment(&mut self, seg: Segment) -> EdgeId {
        debug_assert!(seg.from.index() < self.nodes.len());
        debug_assert!(seg.to.index() < self.nodes.len());
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(seg);
        id
    }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(N + E) for the two counting sorts plus
    /// O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();

        let (out_start, out_edges) = csr(node_count, &self.edges, |s| s.from);
        let (in_start, in_edges)   = csr(node_count, &self.edges, |s| s.to);

        let spatial_idx = NodeIndex::new(&self.nodes);

        if !self.edges.is_empty() {
            info!(
                "built road graph: {} nodes, {} segments ({} ways skipped)",
                node_count,
                self.edges.len(),
                self.skipped_ways
            );
        }

        RoadGraph {
            nodes: self.nodes,
            key_index: self.key_index,
            precision: self.config.key_precision,
            edges: self.edges,
            out_start,
            out_edges,
            in_start,
            in_edges,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Counting sort of edge ids by `endpoint`, stable in creation order.
fn csr(
    node_count: usize,
    edges: &[Segment],
    endpoint: impl Fn(&Segment) -> NodeId,
) -> (Vec<u32>, Vec<EdgeId>) {
    let mut start = vec![0u32; node_count + 1];
    for e in edges {
        start[endpoint(e).index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    debug_assert_eq!(start[node_count] as usize, edges.len());

    let mut cursor = start.clone();
    let mut ids = vec![EdgeId::INVALID; edges.len()];
    for (i, e) in edges.iter().enumerate() {
        let slot = &mut cursor[endpoint(e).index()];
        ids[*slot as usize] = EdgeId::from_index(i);
        *slot += 1;
    }
    (start, ids)
}
