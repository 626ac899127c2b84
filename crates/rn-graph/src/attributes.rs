//! Segment attribute derivation from raw way tags.
//!
//! Every unit segment split from a way carries the same [`SegmentAttributes`];
//! they are derived once per way by [`derive_attributes`].  Missing or
//! malformed tags never fail: each field falls back to a fixed default.
//!
//! # Derived scores
//!
//! ```text
//! speed_factor          = min(speed_limit, 120) / 120
//! foot_traffic_score    = min(base_foot[class] · (0.8 + 0.05 · lanes), 1)
//! historical_congestion = clamp(base_hist[class] · (0.7 + 0.6 · speed_factor), 0, 1)
//! road_quality          = base_quality[class] + tagged_lanes
//! pothole_risk          = clamp((1 − surface_quality) · 0.6
//!                               + max(12 − road_quality, 0) / 12 · 0.4, 0, 1)
//! accident_risk         = clamp(0.2 + 0.5 · speed_factor + 0.3 · historical_congestion, 0, 1)
//! ```
//!
//! `tagged_lanes` is the parsed lane tag or 0 when absent; `lanes` is the
//! stored lane count, which defaults to 1.  The two differ on purpose and the
//! numeric ranges above are relied on by downstream cost models.

use crate::way::Tags;

pub const DEFAULT_ROAD_TYPE:    &str = "unclassified";
pub const DEFAULT_SURFACE_TYPE: &str = "unknown";
pub const DEFAULT_LANE_COUNT:   u32  = 1;
pub const DEFAULT_SPEED_KPH:    u32  = 40;

/// Per-way physical and risk attributes, fully defaulted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentAttributes {
    pub road_type:             String,
    pub lane_count:            u32,
    pub speed_limit_kph:       u32,
    pub toll:                  bool,
    pub road_quality:          f64,
    pub surface_type:          String,
    /// In `[0, 1]`; 0.5 for surfaces missing from the lookup table.
    pub surface_quality:       f64,
    pub lit:                   bool,
    pub one_way:               bool,
    pub foot_traffic_score:    f64,
    pub historical_congestion: f64,
    pub pothole_risk:          f64,
    pub accident_risk:         f64,
}

/// The three independent block states an incident can set on a segment.
///
/// Flags only ever go from `false` to `true` within a graph's lifetime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockFlags {
    pub event_blocked:           bool,
    pub vip_blocked:             bool,
    pub closed_for_construction: bool,
}

impl BlockFlags {
    /// `true` if any flag is set.
    #[inline]
    pub fn is_blocked(self) -> bool {
        self.event_blocked || self.vip_blocked || self.closed_for_construction
    }

    /// Flag-wise OR.
    #[inline]
    pub fn union(self, other: BlockFlags) -> BlockFlags {
        BlockFlags {
            event_blocked:           self.event_blocked || other.event_blocked,
            vip_blocked:             self.vip_blocked || other.vip_blocked,
            closed_for_construction: self.closed_for_construction || other.closed_for_construction,
        }
    }
}

// ── Deriver ───────────────────────────────────────────────────────────────────

/// Derive way-level attributes from raw tags.
pub fn derive_attributes(tags: &Tags) -> SegmentAttributes {
    let road_type = non_empty(tags, "highway").unwrap_or(DEFAULT_ROAD_TYPE).to_string();

    let tagged_lanes = parse_lanes(tags);
    let lane_count = tagged_lanes.unwrap_or(DEFAULT_LANE_COUNT);
    let speed_limit_kph = tags
        .get("maxspeed")
        .and_then(|v| parse_leading_int(v))
        .unwrap_or(DEFAULT_SPEED_KPH);

    let toll = tags.get("toll").is_some_and(|v| is_truthy(v));
    let lit = tags.get("lit").is_some_and(|v| is_truthy(v));
    let one_way = tags.get("oneway").is_some_and(|v| is_truthy(v) || v.trim() == "-1");

    let surface_type = non_empty(tags, "surface").unwrap_or(DEFAULT_SURFACE_TYPE).to_string();
    let surface_quality = surface_quality(&surface_type);

    let speed_factor = speed_limit_kph.min(120) as f64 / 120.0;

    let foot_traffic_score =
        (base_foot_traffic(&road_type) * (0.8 + 0.05 * lane_count as f64)).min(1.0);

    let historical_congestion =
        (base_congestion(&road_type) * (0.7 + 0.6 * speed_factor)).clamp(0.0, 1.0);

    let road_quality = base_road_quality(&road_type) + tagged_lanes.unwrap_or(0) as f64;

    let pothole_risk = ((1.0 - surface_quality) * 0.6
        + ((12.0 - road_quality).max(0.0) / 12.0) * 0.4)
        .clamp(0.0, 1.0);

    let accident_risk =
        (0.2 + 0.5 * speed_factor + 0.3 * historical_congestion).clamp(0.0, 1.0);

    SegmentAttributes {
        road_type,
        lane_count,
        speed_limit_kph,
        toll,
        road_quality,
        surface_type,
        surface_quality,
        lit,
        one_way,
        foot_traffic_score,
        historical_congestion,
        pothole_risk,
        accident_risk,
    }
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn non_empty<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// `yes` / `true` / `1`, case-insensitive.
pub fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true") || v == "1"
}

/// The first present lane tag wins; an unparseable value does not fall
/// through to the next variant.
fn parse_lanes(tags: &Tags) -> Option<u32> {
    ["lanes", "lanes:forward", "lanes:backward"]
        .iter()
        .find_map(|k| non_empty(tags, k))
        .and_then(|v| v.trim().parse().ok())
}

/// Leading integer of the first whitespace token: `"50 mph"` and `"50mph"`
/// both give 50, `"none"` gives `None`.
fn parse_leading_int(v: &str) -> Option<u32> {
    let token = v.split_whitespace().next()?;
    let end = token.find(|c: char| !c.is_ascii_digit()).unwrap_or(token.len());
    token[..end].parse().ok()
}

// ── Lookup tables ─────────────────────────────────────────────────────────────

pub fn surface_quality(surface: &str) -> f64 {
    match surface {
        "asphalt" | "concrete" => 0.9,
        "paved"                => 0.8,
        "compacted"            => 0.7,
        "fine_gravel"          => 0.6,
        "gravel"               => 0.5,
        "ground" | "unpaved"   => 0.4,
        "dirt"                 => 0.3,
        "sand"                 => 0.2,
        _                      => 0.5,
    }
}

fn base_foot_traffic(road_type: &str) -> f64 {
    match road_type {
        "living_street" => 0.9,
        "residential"   => 0.8,
        "tertiary"      => 0.7,
        "service"       => 0.6,
        "secondary"     => 0.5,
        "unclassified"  => 0.5,
        "primary"       => 0.4,
        "trunk"         => 0.3,
        "motorway"      => 0.1,
        _               => 0.4,
    }
}

fn base_congestion(road_type: &str) -> f64 {
    match road_type {
        "primary"              => 0.7,
        "trunk" | "secondary"  => 0.6,
        "motorway" | "tertiary" | "unclassified" => 0.5,
        "service"              => 0.45,
        "residential"          => 0.4,
        _                      => 0.5,
    }
}

fn base_road_quality(road_type: &str) -> f64 {
    match road_type {
        "motorway"                => 10.0,
        "trunk"                   => 8.0,
        "primary"                 => 7.0,
        "secondary"               => 6.0,
        "tertiary"                => 5.0,
        "unclassified" | "service" => 4.0,
        "residential"             => 3.0,
        _                         => 4.0,
    }
}
