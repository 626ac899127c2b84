//! Graph construction configuration.
//!
//! Typically loaded from a TOML file by the application crate and passed to
//! the graph builder.  Every field has a default reproducing the reference
//! pipeline.

use crate::key::MAX_PRECISION;
use crate::{CoreError, CoreResult};

/// Decimal digits kept when quantizing coordinates into node keys.
pub const DEFAULT_KEY_PRECISION: u32 = 6;

/// Provenance tag stamped on every segment built from raw ways.
pub const DEFAULT_PROVENANCE: &str = "overpass";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Fractional digits of the node key.  6 digits ≈ 0.11 m at the equator.
    pub key_precision: u32,

    /// Source label recorded on each segment (`"overpass"`, `"fixture"`, …).
    pub provenance: String,
}

impl GraphConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.key_precision > MAX_PRECISION {
            return Err(CoreError::Config(format!(
                "key_precision {} exceeds the maximum of {MAX_PRECISION}",
                self.key_precision
            )));
        }
        if self.provenance.contains(['\n', '\r']) {
            return Err(CoreError::Config("provenance must be a single line".into()));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            key_precision: DEFAULT_KEY_PRECISION,
            provenance:    DEFAULT_PROVENANCE.to_string(),
        }
    }
}
