//! Tests for rn-io.

#[cfg(test)]
mod helpers {
    use chrono::{DateTime, Utc};
    use rn_core::{GeoPoint, GraphConfig};
    use rn_graph::{RawWay, RoadGraph, RoadGraphBuilder};

    pub fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// A→B→C along the equator plus a tagged one-way A→C and a two-way
    /// residential C↔D.
    pub fn sample_graph() -> RoadGraph {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.001);
        let c = GeoPoint::new(0.0, 0.002);
        let d = GeoPoint::new(0.001, 0.002);
        let ways = [
            RawWay::with_tags(
                10,
                [("highway", "primary"), ("lanes", "2"), ("surface", "asphalt"), ("lit", "yes")],
                vec![a, b, c],
            ),
            RawWay::with_tags(
                11,
                [("highway", "trunk"), ("oneway", "yes"), ("toll", "yes"), ("maxspeed", "80")],
                vec![a, c],
            ),
            RawWay::with_tags(12, [("highway", "residential"), ("surface", "gravel")], vec![c, d]),
        ];
        let mut builder = RoadGraphBuilder::with_config(GraphConfig::default())
            .unwrap()
            .ingested_at(ts());
        for w in &ways {
            builder.add_way(w);
        }
        builder.build()
    }
}

// ── Edge table ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use rn_core::{EdgeId, GeoPoint, GraphConfig};
    use rn_graph::{BlockFlags, IncidentKind, IncidentTable, apply_incident};
    use tempfile::TempDir;

    use super::helpers::{sample_graph, ts};
    use crate::{DataError, read_segments, read_segments_csv, write_segments, write_segments_csv};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_matches_row_layout() {
        let g = sample_graph();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers.len(), 22);
        assert_eq!(headers[0], "from_node");
        assert_eq!(headers[1], "to_node");
        assert_eq!(headers[17], "event_blocked");
        assert_eq!(headers[21], "ingested_at");
        assert_eq!(rdr.records().count(), g.edge_count());
    }

    #[test]
    fn empty_graph_writes_header_only() {
        let g = rn_graph::RoadGraph::empty();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("from_node,to_node,way_id"));

        let back = read_segments(buf.as_slice(), &GraphConfig::default()).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.edge_count(), 0);
    }

    #[test]
    fn round_trip_preserves_segments() {
        let mut g = sample_graph();
        let c = g.node_id_str("0.000000_0.002000").unwrap();
        apply_incident(&mut g, c, IncidentKind::Vip, &IncidentTable::default());
        assert!(g.edges().iter().any(|s| s.is_blocked()));

        let dir = tmp();
        let path = dir.path().join("segments.csv");
        write_segments_csv(&g, &path).unwrap();
        let back = read_segments_csv(&path, &GraphConfig::default()).unwrap();

        assert_eq!(back.node_count(), g.node_count());
        assert_eq!(back.edge_count(), g.edge_count());
        for (n, m) in g.nodes().iter().zip(back.nodes()) {
            assert_eq!(n.key, m.key);
        }
        for (s, t) in g.edges().iter().zip(back.edges()) {
            assert_eq!(s.from, t.from);
            assert_eq!(s.to, t.to);
            assert_eq!(s.way_id, t.way_id);
            assert_eq!(s.attrs, t.attrs);
            assert_eq!(s.length_m.to_bits(), t.length_m.to_bits());
            assert_eq!(s.block, t.block);
            assert_eq!(s.provenance, t.provenance);
            assert_eq!(t.ingested_at, ts());
        }
    }

    #[test]
    fn round_trip_keeps_each_block_flag_apart() {
        let mut g = sample_graph();
        let table = IncidentTable::default();
        for (key, kind) in [
            ("0.000000_0.000000", IncidentKind::Roadworks),
            ("0.001000_0.002000", IncidentKind::Event),
            ("0.000000_0.001000", IncidentKind::Vip),
        ] {
            let node = g.node_id_str(key).unwrap();
            apply_incident(&mut g, node, kind, &table);
        }

        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();
        let back = read_segments(buf.as_slice(), &GraphConfig::default()).unwrap();

        for (s, t) in g.edges().iter().zip(back.edges()) {
            assert_eq!(s.block, t.block, "way {}", s.way_id);
        }

        let only = |event, vip, construction| BlockFlags {
            event_blocked:           event,
            vip_blocked:             vip,
            closed_for_construction: construction,
        };
        // A→B: roadworks + vip; B→C: vip; A→C: roadworks; C→D: event.
        assert_eq!(back.edge(EdgeId(0)).block, only(false, true, true));
        assert_eq!(back.edge(EdgeId(1)).block, only(false, true, false));
        assert_eq!(back.edge(EdgeId(2)).block, only(false, false, true));
        assert_eq!(back.edge(EdgeId(3)).block, only(true, false, false));
    }

    #[test]
    fn reloaded_positions_are_key_points() {
        let g = sample_graph();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();
        let back = read_segments(buf.as_slice(), &GraphConfig::default()).unwrap();

        for (n, m) in g.nodes().iter().zip(back.nodes()) {
            assert_eq!(m.pos, n.key.to_point());
            assert!(n.pos.distance_m(m.pos) < 0.1);
        }
    }

    #[test]
    fn round_trip_keeps_adjacency() {
        let g = sample_graph();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();
        let back = read_segments(buf.as_slice(), &GraphConfig::default()).unwrap();

        for n in 0..g.node_count() {
            let id = rn_core::NodeId(n as u32);
            let a: Vec<_> = g.out_edges(id).collect();
            let b: Vec<_> = back.out_edges(id).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn positions_come_from_keys() {
        let g = sample_graph();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();
        let back = read_segments(buf.as_slice(), &GraphConfig::default()).unwrap();

        let d = back.node_id_str("0.001000_0.002000").unwrap();
        let pos = back.node(d).unwrap().pos;
        assert!((pos.lat - 0.001).abs() < 1e-12);
        assert!((pos.lon - 0.002).abs() < 1e-12);
        assert_eq!(back.nearest_node(GeoPoint::new(0.0011, 0.0021)), Some(d));
    }

    #[test]
    fn bad_key_reports_line() {
        let g = sample_graph();
        let mut buf = Vec::new();
        write_segments(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // Corrupt the second data row's from key.
        let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();
        let rest = lines[2].split_once(',').unwrap().1.to_owned();
        lines[2] = format!("not-a-key,{rest}");
        let corrupted = lines.join("\n");

        match read_segments(corrupted.as_bytes(), &GraphConfig::default()) {
            Err(DataError::InvalidRow { line, .. }) => assert_eq!(line, 3),
            Err(other) => panic!("expected InvalidRow, got {other:?}"),
            Ok(_) => panic!("expected InvalidRow, got a graph"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tmp();
        let err = read_segments_csv(&dir.path().join("nope.csv"), &GraphConfig::default());
        assert!(matches!(err, Err(DataError::Io(_))));
    }
}

// ── Overpass ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod overpass {
    use crate::{parse_overpass, read_overpass};

    const GEOM_DOC: &str = r#"{
        "version": 0.6,
        "elements": [
            {
                "type": "way",
                "id": 100,
                "tags": { "highway": "primary", "lanes": "2" },
                "nodes": [1, 2, 3],
                "geometry": [
                    { "lat": 12.97, "lon": 77.59 },
                    { "lat": 12.971, "lon": 77.59 },
                    { "lat": 12.972, "lon": 77.591 }
                ]
            },
            { "type": "relation", "id": 5, "members": [] }
        ]
    }"#;

    const REFS_DOC: &str = r#"{
        "elements": [
            { "type": "way", "id": 7, "tags": { "highway": "service" }, "nodes": [1, 2, 99, 3] },
            { "type": "way", "id": 8, "nodes": [3, 1] },
            { "type": "node", "id": 1, "lat": 1.0, "lon": 2.0 },
            { "type": "node", "id": 2, "lat": 1.001, "lon": 2.0 },
            { "type": "node", "id": 3, "lat": 1.002, "lon": 2.0 }
        ]
    }"#;

    #[test]
    fn inline_geometry() {
        let ways = parse_overpass(GEOM_DOC).unwrap();
        assert_eq!(ways.len(), 1);
        let w = &ways[0];
        assert_eq!(w.id, 100);
        assert_eq!(w.tags.get("highway").map(String::as_str), Some("primary"));
        assert_eq!(w.coords.len(), 3);
        assert_eq!(w.coords[2].lon, 77.591);
    }

    #[test]
    fn node_refs_resolved_and_unknown_dropped() {
        let ways = parse_overpass(REFS_DOC).unwrap();
        assert_eq!(ways.len(), 2);
        assert_eq!(ways[0].coords.len(), 3);
        assert_eq!(ways[0].coords[1].lat, 1.001);
        assert!(ways[1].tags.is_empty());
        assert_eq!(ways[1].coords.len(), 2);
    }

    #[test]
    fn empty_geometry_falls_back_to_refs() {
        let doc = r#"{ "elements": [
            { "type": "way", "id": 1, "nodes": [1, 2], "geometry": [] },
            { "type": "node", "id": 1, "lat": 0.0, "lon": 0.0 },
            { "type": "node", "id": 2, "lat": 0.0, "lon": 0.001 }
        ] }"#;
        let ways = read_overpass(doc.as_bytes()).unwrap();
        assert_eq!(ways[0].coords.len(), 2);
    }

    #[test]
    fn parsed_ways_build_a_graph() {
        let ways = parse_overpass(REFS_DOC).unwrap();
        let g = rn_graph::RoadGraph::from_ways(&ways, rn_core::GraphConfig::default()).unwrap();
        // way 7: 2 segments; way 8: 1 segment; nodes shared.
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_overpass("{ not json"), Err(crate::DataError::Json(_))));
    }
}

// ── Incident feeds ────────────────────────────────────────────────────────────

#[cfg(test)]
mod incidents {
    use rn_graph::{IncidentClassifier, IncidentKind};

    use crate::{parse_tomtom_incidents, read_incidents_csv};

    const FEED: &str = r#"{
        "incidents": [
            {
                "type": "Feature",
                "properties": { "iconCategory": 9, "description": "Road closed" },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[77.590, 12.970], [77.591, 12.971], [77.592, 12.972]]
                }
            },
            {
                "type": "Feature",
                "properties": { "iconCategory": 1, "description": "Pipe repair in lane" },
                "geometry": { "type": "Point", "coordinates": [77.6, 13.0] }
            },
            {
                "type": "Feature",
                "properties": { "iconCategory": 6 },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[1.0, 2.0], [3.0, 4.0]]
                }
            },
            { "type": "Feature", "properties": { "iconCategory": 8 } },
            {
                "type": "Feature",
                "properties": { "iconCategory": 14, "description": "Broken down vehicle" },
                "geometry": { "type": "Point", "coordinates": [0.5, 0.25] }
            }
        ]
    }"#;

    #[test]
    fn classifies_and_locates() {
        let out = parse_tomtom_incidents(FEED, &IncidentClassifier::default()).unwrap();
        // The incident with no geometry is skipped.
        assert_eq!(out.len(), 4);

        assert_eq!(out[0].kind, IncidentKind::Closure);
        assert_eq!(out[0].pos.lat, 12.971);
        assert_eq!(out[0].pos.lon, 77.591);

        // Keyword beats category.
        assert_eq!(out[1].kind, IncidentKind::Roadworks);
        assert_eq!(out[1].pos.lat, 13.0);

        // Middle of two points is index 1.
        assert_eq!(out[2].kind, IncidentKind::Roadworks);
        assert_eq!(out[2].pos.lat, 4.0);
        assert_eq!(out[2].pos.lon, 3.0);

        assert_eq!(out[3].kind, IncidentKind::Other);
    }

    #[test]
    fn custom_classifier() {
        let classifier = IncidentClassifier {
            roadworks_keywords:   vec![],
            roadworks_categories: vec![],
            closure_categories:   vec![14],
        };
        let out = parse_tomtom_incidents(FEED, &classifier).unwrap();
        assert_eq!(out[1].kind, IncidentKind::Other);
        assert_eq!(out[3].kind, IncidentKind::Closure);
    }

    #[test]
    fn empty_feed() {
        let out = parse_tomtom_incidents("{}", &IncidentClassifier::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn csv_rows() {
        let text = "lat,lon,kind\n12.97,77.59,vip\n0.0,0.0,roadworks\n";
        let out = read_incidents_csv(text.as_bytes()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, IncidentKind::Vip);
        assert_eq!(out[0].pos.lon, 77.59);
        assert_eq!(out[1].kind, IncidentKind::Roadworks);
    }

    #[test]
    fn csv_unknown_kind_is_an_error() {
        let text = "lat,lon,kind\n1.0,2.0,meteor\n";
        assert!(read_incidents_csv(text.as_bytes()).is_err());
    }
}
