//! Geographic coordinate type and great-circle distance.
//!
//! Coordinates are `f64`: node keys are quantized at up to 1e-6 degrees and
//! `f32` cannot represent that step reliably at city longitudes.

/// Mean Earth radius used by every distance computation, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to `other` in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }

    /// `true` if both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Position on the unit sphere.  Chord length between two such vectors is
    /// strictly monotonic in great-circle distance.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance in metres on a sphere of radius
/// [`EARTH_RADIUS_M`].
///
/// Uses the `atan2` form: `a` may overshoot 1.0 by a rounding error for
/// antipodal points, which `asin(sqrt(a))` would turn into NaN.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();

    let a = (d_lat * 0.5).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lon * 0.5).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}
