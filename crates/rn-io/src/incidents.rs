//! Incident feeds → [`Incident`]s.
//!
//! Two inputs are understood:
//!
//! - a TomTom Incident Details (v5) response body, classified with an
//!   [`IncidentClassifier`];
//! - a plain `lat,lon,kind` CSV for feeds that were geocoded and classified
//!   upstream.
//!
//! The representative point of a TomTom incident is the middle vertex of its
//! geometry.  Coordinates in the feed are GeoJSON order, `[lon, lat]`.

use std::io::Read;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use rn_core::GeoPoint;
use rn_graph::{Incident, IncidentClassifier};

use crate::DataResult;
use crate::row::IncidentRow;

#[derive(Deserialize)]
struct IncidentDoc {
    #[serde(default)]
    incidents: Vec<FeedIncident>,
}

#[derive(Deserialize)]
struct FeedIncident {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

#[derive(Deserialize, Default)]
struct Properties {
    #[serde(rename = "iconCategory", default)]
    icon_category: u32,
    #[serde(default)]
    description: Option<String>,
}

/// Decode a TomTom Incident Details document.  Incidents without usable
/// geometry are skipped.
pub fn parse_tomtom_incidents(json: &str, classifier: &IncidentClassifier) -> DataResult<Vec<Incident>> {
    let doc: IncidentDoc = serde_json::from_str(json)?;
    let total = doc.incidents.len();

    let incidents: Vec<Incident> = doc
        .incidents
        .into_iter()
        .filter_map(|inc| {
            let vertices = inc.geometry.as_ref().map(points).unwrap_or_default();
            let pos = *vertices.get(vertices.len() / 2)?;
            let desc = inc.properties.description.as_deref().unwrap_or("");
            let kind = classifier.classify(inc.properties.icon_category, desc);
            debug!("incident {desc:?} (category {}) → {kind} at {pos}", inc.properties.icon_category);
            Some(Incident { pos, kind })
        })
        .collect();

    if incidents.len() < total {
        debug!("skipped {} incident(s) without geometry", total - incidents.len());
    }
    Ok(incidents)
}

/// Read `lat,lon,kind` rows.
pub fn read_incidents_csv<R: Read>(reader: R) -> DataResult<Vec<Incident>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<IncidentRow>()
        .map(|row| {
            let row = row?;
            Ok(Incident { pos: GeoPoint::new(row.lat, row.lon), kind: row.kind })
        })
        .collect()
}

fn points(geom: &Geometry) -> Vec<GeoPoint> {
    let pair = |v: &Value| -> Option<GeoPoint> {
        let arr = v.as_array()?;
        let lon = arr.first()?.as_f64()?;
        let lat = arr.get(1)?.as_f64()?;
        Some(GeoPoint::new(lat, lon))
    };
    match geom.kind.as_str() {
        "Point" => pair(&geom.coordinates).into_iter().collect(),
        // LineString, and a first-level scan of anything else.
        _ => geom
            .coordinates
            .as_array()
            .map(|items| items.iter().filter_map(pair).collect())
            .unwrap_or_default(),
    }
}
