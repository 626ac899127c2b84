//! Incident application: flipping block flags around a graph node.
//!
//! An incident is a `(position, kind)` pair from an external feed.  It is
//! snapped to the nearest node, and every segment with that node as source
//! or destination gets one block flag set.  Which flag is a matter of
//! configuration ([`IncidentTable`]); the defaults reproduce the reference
//! pipeline:
//!
//! | Kind        | Flag                        |
//! |-------------|-----------------------------|
//! | `roadworks` | `closed_for_construction`   |
//! | `closure`   | `event_blocked`             |
//! | `vip`       | `vip_blocked`               |
//! | `event`     | `event_blocked`             |
//! | `other`     | `event_blocked`             |
//!
//! Flags are only ever set, never cleared, so incidents on the same node
//! compose by union.

use std::fmt;
use std::str::FromStr;

use log::debug;

use rn_core::{GeoPoint, NodeId};

use crate::GraphError;
use crate::attributes::BlockFlags;
use crate::network::RoadGraph;

// ── Kinds and flags ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IncidentKind {
    Roadworks,
    Closure,
    Vip,
    Event,
    Other,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 5] = [
        IncidentKind::Roadworks,
        IncidentKind::Closure,
        IncidentKind::Vip,
        IncidentKind::Event,
        IncidentKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentKind::Roadworks => "roadworks",
            IncidentKind::Closure   => "closure",
            IncidentKind::Vip       => "vip",
            IncidentKind::Event     => "event",
            IncidentKind::Other     => "other",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncidentKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentKind::ALL
            .into_iter()
            .find(|k| s.trim().eq_ignore_ascii_case(k.as_str()))
            .ok_or_else(|| GraphError::UnknownIncidentKind(s.to_string()))
    }
}

/// One of the three [`BlockFlags`] fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockFlag {
    EventBlocked,
    VipBlocked,
    ClosedForConstruction,
}

impl BlockFlag {
    /// `flags` with this flag set.
    pub fn set_on(self, flags: BlockFlags) -> BlockFlags {
        let mut out = flags;
        match self {
            BlockFlag::EventBlocked          => out.event_blocked = true,
            BlockFlag::VipBlocked            => out.vip_blocked = true,
            BlockFlag::ClosedForConstruction => out.closed_for_construction = true,
        }
        out
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Incident kind → block flag mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IncidentTable {
    pub roadworks: BlockFlag,
    pub closure:   BlockFlag,
    pub vip:       BlockFlag,
    pub event:     BlockFlag,
    pub other:     BlockFlag,
}

impl IncidentTable {
    pub fn flag_for(&self, kind: IncidentKind) -> BlockFlag {
        match kind {
            IncidentKind::Roadworks => self.roadworks,
            IncidentKind::Closure   => self.closure,
            IncidentKind::Vip       => self.vip,
            IncidentKind::Event     => self.event,
            IncidentKind::Other     => self.other,
        }
    }
}

impl Default for IncidentTable {
    fn default() -> Self {
        Self {
            roadworks: BlockFlag::ClosedForConstruction,
            closure:   BlockFlag::EventBlocked,
            vip:       BlockFlag::VipBlocked,
            event:     BlockFlag::EventBlocked,
            other:     BlockFlag::EventBlocked,
        }
    }
}

/// Maps a traffic feed's numeric icon category and description to an
/// [`IncidentKind`].
///
/// The defaults are a rough heuristic for TomTom Incident Details data with
/// no documented ground truth; treat them as tunable configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IncidentClassifier {
    /// Case-insensitive substrings that mark a description as roadworks.
    pub roadworks_keywords:   Vec<String>,
    pub roadworks_categories: Vec<u32>,
    pub closure_categories:   Vec<u32>,
}

impl IncidentClassifier {
    /// Keywords are checked first, then categories; anything else is
    /// [`IncidentKind::Other`].
    pub fn classify(&self, icon_category: u32, description: &str) -> IncidentKind {
        let desc = description.to_lowercase();
        if self
            .roadworks_keywords
            .iter()
            .any(|kw| desc.contains(&kw.to_lowercase()))
        {
            return IncidentKind::Roadworks;
        }
        if self.roadworks_categories.contains(&icon_category) {
            return IncidentKind::Roadworks;
        }
        if self.closure_categories.contains(&icon_category) {
            return IncidentKind::Closure;
        }
        IncidentKind::Other
    }
}

impl Default for IncidentClassifier {
    fn default() -> Self {
        Self {
            roadworks_keywords: ["roadworks", "construction", "maintenance", "repair"]
                .into_iter()
                .map(String::from)
                .collect(),
            roadworks_categories: vec![4, 5, 6, 7],
            closure_categories:   vec![8, 9, 10],
        }
    }
}

// ── Application ───────────────────────────────────────────────────────────────

/// An incident as delivered by a feed: where, and what.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    pub pos:  GeoPoint,
    pub kind: IncidentKind,
}

/// Outcome of applying one incident.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IncidentReport {
    pub node:          NodeId,
    pub flag:          BlockFlag,
    /// Segments with `node` as an endpoint.
    pub edges_touched: usize,
    /// Of those, how many did not already have `flag` set.
    pub edges_changed: usize,
}

/// Set the flag mapped to `kind` on every segment touching `node`.
///
/// A node with no touching segments (including one outside the graph) is a
/// no-op.  The touching set is collected before any flag is written and
/// nothing after that point can fail, so an incident is applied to all of
/// its segments or to none.
pub fn apply_incident(
    graph: &mut RoadGraph,
    node: NodeId,
    kind: IncidentKind,
    table: &IncidentTable,
) -> IncidentReport {
    let flag = table.flag_for(kind);
    let touching = if graph.contains(node) {
        graph.touching_edges(node)
    } else {
        Vec::new()
    };

    let mut edges_changed = 0;
    for &id in &touching {
        let seg = graph.edge_mut(id);
        let next = flag.set_on(seg.block);
        if next != seg.block {
            seg.block = next;
            edges_changed += 1;
        }
    }

    if touching.is_empty() {
        debug!("incident {kind} at {node}: no touching segments");
    } else {
        debug!(
            "incident {kind} at {node}: {flag:?} on {} segment(s), {edges_changed} newly blocked",
            touching.len()
        );
    }

    IncidentReport { node, flag, edges_touched: touching.len(), edges_changed }
}

/// Snap `incident.pos` to the nearest node and apply it there.
///
/// Returns `None` only when the graph has no nodes.
pub fn apply_incident_at(
    graph: &mut RoadGraph,
    incident: Incident,
    table: &IncidentTable,
) -> Option<IncidentReport> {
    let node = graph.nearest_node(incident.pos)?;
    Some(apply_incident(graph, node, incident.kind, table))
}
