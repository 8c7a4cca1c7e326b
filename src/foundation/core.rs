use std::fmt;

use crate::foundation::error::{SatError, SatResult};

/// Geographic point in degrees on a spherical earth (no datum correction).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Rectangular lat/lon extent of a map request.
///
/// `south < north` and `west < east` is expected but not validated.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Build a box from `(south, west, north, east)`.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }
}

/// Renders `south,west,north,east`, the WMS 1.3.0 `EPSG:4326` axis order.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            fmt_degrees(self.south),
            fmt_degrees(self.west),
            fmt_degrees(self.north),
            fmt_degrees(self.east)
        )
    }
}

/// Shortest round-trip decimal that always keeps a fractional part (`10.0`, `-3.25`).
pub(crate) fn fmt_degrees(v: f64) -> String {
    let s = v.to_string();
    if !v.is_finite() || s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Target width:height ratio used to derive ground coverage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    /// Must be non-zero.
    pub height: f64,
}

impl AspectRatio {
    /// Create a validated aspect ratio.
    pub fn new(width: f64, height: f64) -> SatResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SatError::validation(
                "aspect ratio components must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// `width / height`.
    pub fn ratio(self) -> f64 {
        self.width / self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
        }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> SatResult<Self> {
        if width == 0 || height == 0 {
            return Err(SatError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}
