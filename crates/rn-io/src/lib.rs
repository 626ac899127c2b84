//! `rn-io` — persisted edge tables and external feed decoding.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`table`]     | edge table read/write (CSV)                              |
//! | [`overpass`]  | Overpass JSON → `RawWay`s                                |
//! | [`incidents`] | TomTom incident JSON and `lat,lon,kind` CSV → `Incident`s |
//! | [`row`]       | `SegmentRow`, `IncidentRow`                              |
//! | [`error`]     | `DataError`, `DataResult<T>`                             |

pub mod error;
pub mod incidents;
pub mod overpass;
pub mod row;
pub mod table;

#[cfg(test)]
mod tests;

pub use error::{DataError, DataResult};
pub use incidents::{parse_tomtom_incidents, read_incidents_csv};
pub use overpass::{parse_overpass, read_overpass};
pub use row::{IncidentRow, SegmentRow};
pub use table::{read_segments, read_segments_csv, write_segments, write_segments_csv};
