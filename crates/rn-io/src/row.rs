//! Plain row types for the persisted edge table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rn_graph::{BlockFlags, IncidentKind, RoadGraph, Segment, SegmentAttributes};

/// One directed segment, flattened.  Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub from_node:               String,
    pub to_node:                 String,
    pub way_id:                  i64,
    pub road_type:               String,
    pub lane_count:              u32,
    pub speed_limit_kph:         u32,
    pub toll:                    bool,
    pub length_m:                f64,
    pub road_quality:            f64,
    pub surface_type:            String,
    pub surface_quality:         f64,
    pub lit:                     bool,
    pub one_way:                 bool,
    pub foot_traffic_score:      f64,
    pub historical_congestion:   f64,
    pub pothole_risk:            f64,
    pub accident_risk:           f64,
    pub event_blocked:           bool,
    pub vip_blocked:             bool,
    pub closed_for_construction: bool,
    pub provenance:              String,
    pub ingested_at:             DateTime<Utc>,
}

impl SegmentRow {
    pub fn from_segment(graph: &RoadGraph, s: &Segment) -> Self {
        let key = |n| {
            graph
                .node(n)
                .map(|node| node.key.to_string())
                .unwrap_or_default()
        };
        let a = &s.attrs;
        Self {
            from_node:               key(s.from),
            to_node:                 key(s.to),
            way_id:                  s.way_id,
            road_type:               a.road_type.clone(),
            lane_count:              a.lane_count,
            speed_limit_kph:         a.speed_limit_kph,
            toll:                    a.toll,
            length_m:                s.length_m,
            road_quality:            a.road_quality,
            surface_type:            a.surface_type.clone(),
            surface_quality:         a.surface_quality,
            lit:                     a.lit,
            one_way:                 a.one_way,
            foot_traffic_score:      a.foot_traffic_score,
            historical_congestion:   a.historical_congestion,
            pothole_risk:            a.pothole_risk,
            accident_risk:           a.accident_risk,
            event_blocked:           s.block.event_blocked,
            vip_blocked:             s.block.vip_blocked,
            closed_for_construction: s.block.closed_for_construction,
            provenance:              s.provenance.clone(),
            ingested_at:             s.ingested_at,
        }
    }

    pub(crate) fn attributes(&self) -> SegmentAttributes {
        SegmentAttributes {
            road_type:             self.road_type.clone(),
            lane_count:            self.lane_count,
            speed_limit_kph:       self.speed_limit_kph,
            toll:                  self.toll,
            road_quality:          self.road_quality,
            surface_type:          self.surface_type.clone(),
            surface_quality:       self.surface_quality,
            lit:                   self.lit,
            one_way:               self.one_way,
            foot_traffic_score:    self.foot_traffic_score,
            historical_congestion: self.historical_congestion,
            pothole_risk:          self.pothole_risk,
            accident_risk:         self.accident_risk,
        }
    }

    pub(crate) fn block(&self) -> BlockFlags {
        BlockFlags {
            event_blocked:           self.event_blocked,
            vip_blocked:             self.vip_blocked,
            closed_for_construction: self.closed_for_construction,
        }
    }
}

/// A pre-classified, pre-geocoded incident as exchanged between feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    pub lat:  f64,
    pub lon:  f64,
    pub kind: IncidentKind,
}
