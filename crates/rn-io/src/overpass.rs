//! Overpass API `[out:json]` documents → [`RawWay`]s.
//!
//! Fetching is the caller's business; this module only decodes a response
//! body.  A way's coordinates come from its inline `geometry` when present
//! and non-empty (`out geom`), otherwise from its `nodes` refs resolved
//! against the document's node elements (`out body; >; out skel`).  Refs
//! with no matching node are dropped.

use std::collections::HashMap;
use std::io::Read;

use log::{debug, info};
use serde::Deserialize;

use rn_core::GeoPoint;
use rn_graph::{RawWay, Tags};

use crate::DataResult;

#[derive(Deserialize)]
struct OverpassDoc {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id:  i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        tags: Tags,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        geometry: Option<Vec<Option<LatLon>>>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

/// Decode an Overpass JSON document.
pub fn parse_overpass(json: &str) -> DataResult<Vec<RawWay>> {
    ways_from_doc(serde_json::from_str(json)?)
}

/// Like [`parse_overpass`] but reads from any `Read` source.
pub fn read_overpass<R: Read>(reader: R) -> DataResult<Vec<RawWay>> {
    ways_from_doc(serde_json::from_reader(reader)?)
}

fn ways_from_doc(doc: OverpassDoc) -> DataResult<Vec<RawWay>> {
    let nodes: HashMap<i64, GeoPoint> = doc
        .elements
        .iter()
        .filter_map(|el| match el {
            Element::Node { id, lat, lon } => Some((*id, GeoPoint::new(*lat, *lon))),
            _ => None,
        })
        .collect();

    let mut ways = Vec::new();
    for el in doc.elements {
        let Element::Way { id, tags, nodes: refs, geometry } = el else {
            continue;
        };
        let inline: Vec<GeoPoint> = geometry
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|p| GeoPoint::new(p.lat, p.lon))
            .collect();
        let coords = if inline.is_empty() {
            let resolved: Vec<GeoPoint> =
                refs.iter().filter_map(|r| nodes.get(r).copied()).collect();
            if resolved.len() < refs.len() {
                debug!("way {id}: {} of {} node refs unresolved", refs.len() - resolved.len(), refs.len());
            }
            resolved
        } else {
            inline
        };
        ways.push(RawWay::new(id, tags, coords));
    }

    info!("parsed {} ways ({} standalone nodes)", ways.len(), nodes.len());
    Ok(ways)
}
