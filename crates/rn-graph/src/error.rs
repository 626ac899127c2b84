//! Graph-subsystem error type.

use thiserror::Error;

use rn_core::{CoreError, EdgeId};

/// Errors produced by `rn-graph`.
///
/// Missing data and lookup misses are *not* errors here: they resolve to
/// defaults or `None`.  What remains are contract violations and malformed
/// configuration values.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("cost function returned {cost} for edge {edge}: costs must be non-negative and not NaN")]
    InvalidCost { edge: EdgeId, cost: f64 },

    #[error("unknown incident kind {0:?}")]
    UnknownIncidentKind(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;
