//! Raw road ways as supplied by an external map source.

use std::collections::HashMap;

use rn_core::GeoPoint;

/// Free-form OSM-style tags (`highway`, `lanes`, `maxspeed`, …).
pub type Tags = HashMap<String, String>;

/// One physical road way: an ordered polyline plus its tags.
///
/// Ways with fewer than two coordinates are valid input; the builder skips
/// them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawWay {
    pub id:     i64,
    pub tags:   Tags,
    pub coords: Vec<GeoPoint>,
}

impl RawWay {
    pub fn new(id: i64, tags: Tags, coords: Vec<GeoPoint>) -> Self {
        Self { id, tags, coords }
    }

    /// Convenience for fixtures: build the tag map from string pairs.
    pub fn with_tags<'a>(
        id: i64,
        tags: impl IntoIterator<Item = (&'a str, &'a str)>,
        coords: Vec<GeoPoint>,
    ) -> Self {
        let tags = tags
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { id, tags, coords }
    }

    /// Sum of the great-circle lengths of all consecutive coordinate pairs.
    pub fn length_m(&self) -> f64 {
        self.coords.windows(2).map(|w| w[0].distance_m(w[1])).sum()
    }

    /// Number of unit segments this way yields.
    pub fn segment_count(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }
}
