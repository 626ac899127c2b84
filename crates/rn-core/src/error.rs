//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `rn-core`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid node key {0:?}: expected \"<lat>_<lon>\"")]
    InvalidNodeKey(String),

    #[error("coordinate {0} cannot be quantized at precision {1}")]
    Quantization(String, u32),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
