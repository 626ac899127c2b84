//! Persisted edge table (CSV).
//!
//! One row per directed segment, columns as in [`SegmentRow`].  This is the
//! interchange format between graph construction, incident enrichment, and
//! routing; writing a graph and reading it back preserves every segment
//! attribute exactly, including the three block flags and the creation
//! order (and therefore the `EdgeId`s and `NodeId`s).
//!
//! ```csv
//! from_node,to_node,way_id,road_type,lane_count,...,provenance,ingested_at
//! 12.970000_77.590000,12.971000_77.590000,42,residential,1,...,overpass,2023-11-14T22:13:20Z
//! ```
//!
//! Node positions are not stored; on read they are decoded from the keys.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;

use rn_core::{GraphConfig, NodeKey};
use rn_graph::{RoadGraph, RoadGraphBuilder, Segment};

use crate::row::SegmentRow;
use crate::{DataError, DataResult};

/// Write every segment of `graph`, in `EdgeId` order, with a header row.
pub fn write_segments<W: Write>(graph: &RoadGraph, writer: W) -> DataResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    for seg in graph.edges() {
        w.serialize(SegmentRow::from_segment(graph, seg))?;
    }
    // An empty graph still gets a header.
    if graph.edge_count() == 0 {
        w.write_record(HEADER)?;
    }
    w.flush()?;
    Ok(())
}

/// [`write_segments`] to a file, creating or truncating it.
pub fn write_segments_csv(graph: &RoadGraph, path: &Path) -> DataResult<()> {
    write_segments(graph, File::create(path)?)?;
    info!("wrote {} segments to {}", graph.edge_count(), path.display());
    Ok(())
}

/// Rebuild a graph from an edge table.
///
/// Keys are interpreted at `config.key_precision`; a key that does not parse
/// fails the whole read with [`DataError::InvalidRow`].
pub fn read_segments<R: Read>(reader: R, config: &GraphConfig) -> DataResult<RoadGraph> {
    let mut b = RoadGraphBuilder::with_config(config.clone())?;
    let mut rdr = csv::Reader::from_reader(reader);

    for result in rdr.deserialize::<SegmentRow>() {
        let row = result?;
        // Header is line 1, first record line 2.
        let line = b.edge_count() as u64 + 2;
        let from = parse_key(&row.from_node, config.key_precision, line)?;
        let to   = parse_key(&row.to_node, config.key_precision, line)?;
        let from = b.intern(from, from.to_point());
        let to   = b.intern(to, to.to_point());
        b.push_segment(Segment {
            from,
            to,
            way_id:      row.way_id,
            attrs:       row.attributes(),
            length_m:    row.length_m,
            block:       row.block(),
            provenance:  row.provenance,
            ingested_at: row.ingested_at,
        });
    }

    Ok(b.build())
}

/// [`read_segments`] from a file.
pub fn read_segments_csv(path: &Path, config: &GraphConfig) -> DataResult<RoadGraph> {
    let graph = read_segments(File::open(path)?, config)?;
    info!("read {} segments from {}", graph.edge_count(), path.display());
    Ok(graph)
}

fn parse_key(s: &str, precision: u32, line: u64) -> DataResult<NodeKey> {
    NodeKey::parse(s, precision).map_err(|e| DataError::InvalidRow { line, reason: e.to_string() })
}

const HEADER: [&str; 22] = [
    "from_node",
    "to_node",
    "way_id",
    "road_type",
    "lane_count",
    "speed_limit_kph",
    "toll",
    "length_m",
    "road_quality",
    "surface_type",
    "surface_quality",
    "lit",
    "one_way",
    "foot_traffic_score",
    "historical_congestion",
    "pothole_risk",
    "accident_risk",
    "event_blocked",
    "vip_blocked",
    "closed_for_construction",
    "provenance",
    "ingested_at",
];
