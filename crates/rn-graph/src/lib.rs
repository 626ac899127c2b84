//! `rn-graph` — road-segment graph, incidents, and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`way`]        | `RawWay`, `Tags` — input from an external map source          |
//! | [`attributes`] | `derive_attributes`, `SegmentAttributes`, `BlockFlags`        |
//! | [`network`]    | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`                |
//! | [`index`]      | `NodeIndex`, `nearest_scan`                                   |
//! | [`incident`]   | `apply_incident`, `IncidentTable`, `IncidentClassifier`       |
//! | [`cost`]       | `CostFunction` and stock implementations                      |
//! | [`search`]     | `astar`, `Router`, `AStarRouter`, `Route`, heuristics         |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `AStarRouter::route_batch` via Rayon.                     |
//! | `serde`    | Derives `Serialize`/`Deserialize` on config types.        |

pub mod attributes;
pub mod cost;
pub mod error;
pub mod incident;
pub mod index;
pub mod network;
pub mod search;
pub mod way;


pub use attributes::{BlockFlags, SegmentAttributes, derive_attributes};
pub use cost::{
    BlockedAsInfinite, CompositeCost, CostFunction, LengthCost, ModelCost, SegmentFeatures,
    WeightModel,
};
pub use error::{GraphError, GraphResult};
pub use incident::{
    BlockFlag, Incident, IncidentClassifier, IncidentKind, IncidentReport, IncidentTable,
    apply_incident, apply_incident_at,
};
pub use index::{NodeIndex, nearest_scan};
pub use network::{Node, RoadGraph, RoadGraphBuilder, Segment};
pub use search::{
    AStarRouter, GreatCircleHeuristic, Heuristic, Route, Router, ZeroHeuristic, astar, dijkstra,
};
pub use way::{RawWay, Tags};
