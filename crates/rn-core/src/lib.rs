//! `rn-core` — foundational types for the `road_nav` routing stack.
//!
//! This crate is a dependency of every other `rn-*` crate.  It has no `rn-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`key`]         | `NodeKey` — quantized coordinate identity             |
//! | [`config`]      | `GraphConfig`                                         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod key;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DEFAULT_KEY_PRECISION, DEFAULT_PROVENANCE, GraphConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, EARTH_RADIUS_M, haversine_m};
pub use ids::{EdgeId, NodeId};
pub use key::NodeKey;
