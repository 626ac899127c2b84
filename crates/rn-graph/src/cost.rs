//! Edge cost functions.
//!
//! The search engine only knows [`CostFunction`]: a deterministic map from a
//! segment's current state to a non-negative weight.  `+∞` is allowed and
//! means "impassable"; negative or NaN weights are rejected by the search.
//!
//! Blocked segments are not special to the search.  Wrap any cost in
//! [`BlockedAsInfinite`] to make them impassable.
//!
//! | Type                   | Weight                                            |
//! |------------------------|---------------------------------------------------|
//! | [`LengthCost`]         | metres                                            |
//! | [`CompositeCost`]      | metres scaled by congestion, risk and speed, plus toll |
//! | [`ModelCost`]          | whatever an external [`WeightModel`] predicts     |
//! | [`BlockedAsInfinite`]  | `+∞` if any block flag is set, else the inner cost |
//!
//! Any `Fn(&Segment) -> f64 + Send + Sync` closure is also a cost function.

use crate::network::Segment;

/// Maps a segment to its traversal weight.
///
/// Must be deterministic for a given segment state and never negative.
/// Implementations must be `Send + Sync` so one instance can serve parallel
/// searches over a frozen graph.
pub trait CostFunction: Send + Sync {
    fn cost(&self, segment: &Segment) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&Segment) -> f64 + Send + Sync,
{
    #[inline]
    fn cost(&self, segment: &Segment) -> f64 {
        self(segment)
    }
}

// ── Simple costs ──────────────────────────────────────────────────────────────

/// Physical length in metres.
#[derive(Copy, Clone, Debug, Default)]
pub struct LengthCost;

impl CostFunction for LengthCost {
    #[inline]
    fn cost(&self, segment: &Segment) -> f64 {
        segment.length_m
    }
}

/// `+∞` for any segment with a block flag set; otherwise defers to `C`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlockedAsInfinite<C>(pub C);

impl<C: CostFunction> CostFunction for BlockedAsInfinite<C> {
    #[inline]
    fn cost(&self, segment: &Segment) -> f64 {
        if segment.is_blocked() {
            f64::INFINITY
        } else {
            self.0.cost(segment)
        }
    }
}

// ── Composite fallback ────────────────────────────────────────────────────────

/// Hand-tuned composite weight used when no learned model is available.
///
/// ```text
/// cost = length_m · (1 + congestion_weight · historical_congestion
///                      + pothole_weight    · pothole_risk
///                      + accident_weight   · accident_risk
///                      + slowness_weight   · (1 − min(speed, 120) / 120))
///      + toll_penalty_m · toll
/// ```
///
/// Every term is non-negative as long as the weights are, and the
/// multiplier is at least 1, so the cost never undercuts [`LengthCost`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompositeCost {
    pub congestion_weight: f64,
    pub pothole_weight:    f64,
    pub accident_weight:   f64,
    pub slowness_weight:   f64,
    /// Flat surcharge for a tolled segment, in metre-equivalents.
    pub toll_penalty_m:    f64,
}

impl Default for CompositeCost {
    fn default() -> Self {
        Self {
            congestion_weight: 0.5,
            pothole_weight:    0.3,
            accident_weight:   0.2,
            slowness_weight:   0.25,
            toll_penalty_m:    200.0,
        }
    }
}

impl CostFunction for CompositeCost {
    fn cost(&self, s: &Segment) -> f64 {
        let a = &s.attrs;
        let speed_factor = a.speed_limit_kph.min(120) as f64 / 120.0;
        let multiplier = 1.0
            + self.congestion_weight * a.historical_congestion
            + self.pothole_weight * a.pothole_risk
            + self.accident_weight * a.accident_risk
            + self.slowness_weight * (1.0 - speed_factor);
        let toll = if a.toll { self.toll_penalty_m } else { 0.0 };
        s.length_m * multiplier + toll
    }
}

// ── External model adapter ────────────────────────────────────────────────────

/// The attribute vector handed to an external cost model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentFeatures<'a> {
    pub length_m:              f64,
    pub road_type:             &'a str,
    pub road_quality:          f64,
    pub lane_count:            u32,
    pub speed_limit_kph:       u32,
    pub toll:                  bool,
    pub surface_type:          &'a str,
    pub surface_quality:       f64,
    pub lit:                   bool,
    pub one_way:               bool,
    pub foot_traffic_score:    f64,
    pub historical_congestion: f64,
    pub pothole_risk:          f64,
    pub accident_risk:         f64,
    pub event_blocked:           bool,
    pub vip_blocked:             bool,
    pub closed_for_construction: bool,
}

impl<'a> From<&'a Segment> for SegmentFeatures<'a> {
    fn from(s: &'a Segment) -> Self {
        let a = &s.attrs;
        Self {
            length_m:                s.length_m,
            road_type:               &a.road_type,
            road_quality:            a.road_quality,
            lane_count:              a.lane_count,
            speed_limit_kph:         a.speed_limit_kph,
            toll:                    a.toll,
            surface_type:            &a.surface_type,
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
        }
    }
}

/// A trained predictor of segment traversal cost, owned by the caller.
pub trait WeightModel: Send + Sync {
    fn predict(&self, features: &SegmentFeatures<'_>) -> f64;
}

/// Adapts a [`WeightModel`] to [`CostFunction`].
#[derive(Clone, Debug, Default)]
pub struct ModelCost<M>(pub M);

impl<M: WeightModel> CostFunction for ModelCost<M> {
    #[inline]
    fn cost(&self, segment: &Segment) -> f64 {
        self.0.predict(&SegmentFeatures::from(segment))
    }
}
