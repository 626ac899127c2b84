//! `navingest` configuration file.
//!
//! ```toml
//! [graph]
//! key_precision = 6
//! provenance    = "overpass"
//!
//! [incidents]
//! closure = "closed_for_construction"
//! vip     = "vip_blocked"
//!
//! [classifier]
//! roadworks_keywords   = ["roadworks", "construction"]
//! closure_categories   = [8, 9, 10]
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use rn_core::GraphConfig;
use rn_graph::{IncidentClassifier, IncidentTable};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub graph:      GraphConfig,
    pub incidents:  IncidentTable,
    pub classifier: IncidentClassifier,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
