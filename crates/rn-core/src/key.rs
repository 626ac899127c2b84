//! Quantized coordinate identity.
//!
//! A [`NodeKey`] is the graph's only de-duplication mechanism: every
//! coordinate is rounded to `precision` decimal digits and the two rounded
//! integers *are* the node's identity.  Two points that round to the same
//! integers resolve to the same node, across different ways.
//!
//! The canonical string form is `"<lat>_<lon>"` with exactly `precision`
//! fractional digits, rendered from the integers (never from a float), so the
//! string is a pure function of the key:
//!
//! ```text
//! (12.9716, 77.59461234) @ 6  →  "12.971600_77.594612"
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult, GeoPoint};

/// Largest supported number of fractional digits.  At 15 digits,
/// `180 × 10^15` still fits comfortably in an `i64`.
pub const MAX_PRECISION: u32 = 15;

/// Quantized `(lat, lon)` pair at a fixed decimal precision.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeKey {
    lat_q:     i64,
    lon_q:     i64,
    precision: u32,
}

impl NodeKey {
    /// Quantize `pos` at `precision` decimal digits.
    ///
    /// # Errors
    ///
    /// [`CoreError::Quantization`] if a component is not finite or the
    /// precision exceeds [`MAX_PRECISION`].
    pub fn new(pos: GeoPoint, precision: u32) -> CoreResult<Self> {
        Ok(Self {
            lat_q: quantize(pos.lat, precision)?,
            lon_q: quantize(pos.lon, precision)?,
            precision,
        })
    }

    /// Parse a canonical `"<lat>_<lon>"` string and re-quantize it at
    /// `precision`.  Accepts any decimal rendering, not only the canonical one.
    pub fn parse(s: &str, precision: u32) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidNodeKey(s.to_string());
        let (lat, lon) = s.trim().split_once('_').ok_or_else(invalid)?;
        let lat: f64 = lat.parse().map_err(|_| invalid())?;
        let lon: f64 = lon.parse().map_err(|_| invalid())?;
        Self::new(GeoPoint::new(lat, lon), precision).map_err(|_| invalid())
    }

    pub fn precision(self) -> u32 {
        self.precision
    }

    /// The quantized position this key stands for.
    pub fn to_point(self) -> GeoPoint {
        let scale = 10f64.powi(self.precision as i32);
        GeoPoint::new(self.lat_q as f64 / scale, self.lon_q as f64 / scale)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.lat_q, self.precision)?;
        f.write_str("_")?;
        write_fixed(f, self.lon_q, self.precision)
    }
}

/// Parses at the default precision of 6 digits.
impl FromStr for NodeKey {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s, crate::config::DEFAULT_KEY_PRECISION)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn quantize(v: f64, precision: u32) -> CoreResult<i64> {
    if precision > MAX_PRECISION {
        return Err(CoreError::Quantization(v.to_string(), precision));
    }
    let scaled = (v * 10f64.powi(precision as i32)).round();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
        return Err(CoreError::Quantization(v.to_string(), precision));
    }
    Ok(scaled as i64)
}

fn write_fixed(f: &mut fmt::Formatter<'_>, q: i64, precision: u32) -> fmt::Result {
    let sign = if q < 0 { "-" } else { "" };
    let abs = q.unsigned_abs();
    if precision == 0 {
        return write!(f, "{sign}{abs}");
    }
    let scale = 10u64.pow(precision);
    write!(
        f,
        "{sign}{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = precision as usize
    )
}
