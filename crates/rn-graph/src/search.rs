//! Best-first path search.
//!
//! # Algorithm
//!
//! Textbook A*: a binary-heap frontier keyed by `f = g + h`, `g` initialized
//! to 0 at the source and `+∞` elsewhere, standard relaxation on every
//! outgoing segment.  Nodes may be pushed several times; stale heap entries
//! (`g` above the settled best) are skipped on pop.
//!
//! With [`ZeroHeuristic`] (the default) this *is* Dijkstra's algorithm.
//! [`GreatCircleHeuristic`] is admissible whenever every segment costs at
//! least `cost_per_meter × length_m`.
//!
//! # Outcomes
//!
//! | Situation                              | Result                       |
//! |----------------------------------------|------------------------------|
//! | source or goal not in the graph        | `Ok(None)`                   |
//! | goal unreachable (incl. only via `+∞`) | `Ok(None)`                   |
//! | `source == goal`                       | one-node route, cost 0       |
//! | cost function returns `< 0` or NaN     | `Err(GraphError::InvalidCost)` |
//!
//! Ties between equal `f` values are broken by the heap and are not stable
//! across equal-cost alternatives.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rn_core::{EdgeId, NodeId};

use crate::cost::CostFunction;
use crate::network::RoadGraph;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A found path: nodes from source to goal inclusive, the segments between
/// them, and the accumulated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes:      Vec<NodeId>,
    /// `edges[i]` goes from `nodes[i]` to `nodes[i + 1]`.
    pub edges:      Vec<EdgeId>,
    pub total_cost: f64,
}

impl Route {
    /// `true` if the source and goal are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Canonical key strings of the route's nodes.
    pub fn node_keys(&self, graph: &RoadGraph) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|&n| graph.node(n))
            .map(|n| n.key.to_string())
            .collect()
    }

    /// Sum of segment lengths along the route, metres.
    pub fn length_m(&self, graph: &RoadGraph) -> f64 {
        self.edges.iter().map(|&e| graph.edge(e).length_m).sum()
    }
}

// ── Heuristics ────────────────────────────────────────────────────────────────

/// Lower-bound estimate of the remaining cost from `node` to `goal`.
pub trait Heuristic: Send + Sync {
    fn estimate(&self, graph: &RoadGraph, node: NodeId, goal: NodeId) -> f64;
}

/// Always 0.  Turns A* into Dijkstra; always admissible.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _: &RoadGraph, _: NodeId, _: NodeId) -> f64 {
        0.0
    }
}

/// Great-circle metres to the goal times a minimum cost per metre.
///
/// Distances are measured between node positions, which may differ from the
/// raw segment endpoints by up to the key quantization step; keep
/// `cost_per_meter` a little under the true lower bound.
#[derive(Copy, Clone, Debug)]
pub struct GreatCircleHeuristic {
    pub cost_per_meter: f64,
}

impl Heuristic for GreatCircleHeuristic {
    fn estimate(&self, graph: &RoadGraph, node: NodeId, goal: NodeId) -> f64 {
        match (graph.node(node), graph.node(goal)) {
            (Some(a), Some(b)) => a.pos.distance_m(b.pos) * self.cost_per_meter,
            _ => 0.0,
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync`; searches only read the graph, so
/// any number may run in parallel against the same `&RoadGraph`.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`; `Ok(None)` if there is none.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> GraphResult<Option<Route>>;

    /// Like [`route`](Self::route) but addressed by node key strings.
    /// Unknown or malformed keys give `Ok(None)`.
    fn route_keys(&self, graph: &RoadGraph, from: &str, to: &str) -> GraphResult<Option<Route>> {
        match (graph.node_id_str(from), graph.node_id_str(to)) {
            (Some(a), Some(b)) => self.route(graph, a, b),
            _ => Ok(None),
        }
    }
}

/// A* over a [`CostFunction`] and a [`Heuristic`].
///
/// ```
/// use rn_graph::{AStarRouter, BlockedAsInfinite, LengthCost, RoadGraph, Router};
///
/// let router = AStarRouter::new(BlockedAsInfinite(LengthCost));
/// let graph = RoadGraph::empty();
/// assert!(router.route_keys(&graph, "0_0", "1_1").unwrap().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AStarRouter<C, H = ZeroHeuristic> {
    pub cost:      C,
    pub heuristic: H,
}

impl<C: CostFunction> AStarRouter<C> {
    /// Router with the zero heuristic.
    pub fn new(cost: C) -> Self {
        Self { cost, heuristic: ZeroHeuristic }
    }
}

impl<C: CostFunction, H: Heuristic> AStarRouter<C, H> {
    pub fn with_heuristic<H2: Heuristic>(self, heuristic: H2) -> AStarRouter<C, H2> {
        AStarRouter { cost: self.cost, heuristic }
    }

    /// Route every `(from, to)` pair in parallel over a frozen graph.
    #[cfg(feature = "parallel")]
    pub fn route_batch(
        &self,
        graph: &RoadGraph,
        pairs: &[(NodeId, NodeId)],
    ) -> Vec<GraphResult<Option<Route>>> {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .map(|&(from, to)| self.route(graph, from, to))
            .collect()
    }
}

impl<C: CostFunction, H: Heuristic> Router for AStarRouter<C, H> {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> GraphResult<Option<Route>> {
        astar(graph, &self.cost, &self.heuristic, from, to)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct State {
    f:    f64,
    g:    f64,
    node: NodeId,
}

// Min-heap by `f` (reversed for Rust's max-heap BinaryHeap).  Values are
// never NaN: costs are validated and heuristics are finite.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// A* from `source` to `goal`.
///
/// # Errors
///
/// [`GraphError::InvalidCost`] if `cost` yields a negative or NaN weight for
/// any segment the search inspects.
pub fn astar<C, H>(
    graph: &RoadGraph,
    cost: &C,
    heuristic: &H,
    source: NodeId,
    goal: NodeId,
) -> GraphResult<Option<Route>>
where
    C: CostFunction + ?Sized,
    H: Heuristic + ?Sized,
{
    if !graph.contains(source) || !graph.contains(goal) {
        return Ok(None);
    }
    if source == goal {
        return Ok(Some(Route { nodes: vec![source], edges: vec![], total_cost: 0.0 }));
    }

    let n = graph.node_count();
    // g[v] = best known cost from source to v.
    let mut g         = vec![f64::INFINITY; n];
    // prev_edge[v] = segment that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    g[source.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(State { f: heuristic.estimate(graph, source, goal), g: 0.0, node: source });

    while let Some(State { g: g_cur, node, .. }) = heap.pop() {
        if node == goal {
            let total = g[goal.index()];
            return Ok(Some(reconstruct(graph, &prev_edge, source, goal, total)));
        }

        // Skip stale heap entries.
        if g_cur > g[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let w = cost.cost(graph.edge(edge));
            if w.is_nan() || w < 0.0 {
                return Err(GraphError::InvalidCost { edge, cost: w });
            }
            if w == f64::INFINITY {
                continue;
            }

            let neighbor = graph.edge(edge).to;
            let tentative = g_cur + w;
            if tentative < g[neighbor.index()] {
                g[neighbor.index()] = tentative;
                prev_edge[neighbor.index()] = edge;
                let h = heuristic.estimate(graph, neighbor, goal);
                heap.push(State { f: tentative + h, g: tentative, node: neighbor });
            }
        }
    }

    Ok(None)
}

/// Shortest path with the zero heuristic.
pub fn dijkstra<C>(
    graph: &RoadGraph,
    cost: &C,
    source: NodeId,
    goal: NodeId,
) -> GraphResult<Option<Route>>
where
    C: CostFunction + ?Sized,
{
    astar(graph, cost, &ZeroHeuristic, source, goal)
}

fn reconstruct(
    graph: &RoadGraph,
    prev_edge: &[EdgeId],
    source: NodeId,
    goal: NodeId,
    total_cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = goal;
    while cur != source {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "settled node without predecessor");
        edges.push(e);
        cur = graph.edge(e).from;
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(source);
    nodes.extend(edges.iter().map(|&e| graph.edge(e).to));

    Route { nodes, edges, total_cost }
}
