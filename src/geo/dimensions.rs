use crate::foundation::core::{AspectRatio, Canvas};

/// Ground width in km at zoom level 0.
pub const MAX_COVERAGE_KM: f64 = 1000.0;
/// Kilometers removed from the width between zoom 0 and [`MAX_ZOOM_LEVEL`].
pub const ZOOM_SPAN_KM: f64 = 850.0;
/// Highest supported zoom level; the width there is `MAX_COVERAGE_KM - ZOOM_SPAN_KM`.
pub const MAX_ZOOM_LEVEL: f64 = 4.0;

pub const DEFAULT_PIXEL_WIDTH: u32 = 1920;
pub const DEFAULT_PIXEL_HEIGHT: u32 = 1080;

/// Ground coverage of a request in kilometers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundExtent {
    pub width_km: f64,
    /// North-south extent, truncated to whole kilometers.
    pub height_km: f64,
}

/// Linear zoom-to-coverage mapping.
///
/// The zoom range is the caller's responsibility; values outside `0..=4` extrapolate.
pub fn coordinate_dimensions(zoom_level: f64, aspect: AspectRatio) -> GroundExtent {
    let width_km = MAX_COVERAGE_KM - (zoom_level / MAX_ZOOM_LEVEL) * ZOOM_SPAN_KM;
    let height_km = (width_km / aspect.ratio()).trunc();
    GroundExtent {
        width_km,
        height_km,
    }
}

/// Aspect ratio from an explicit output size, or 16:9 when either side is missing or zero.
pub fn aspect_for(width: Option<u32>, height: Option<u32>) -> AspectRatio {
    match (width, height) {
        (Some(w), Some(h)) => AspectRatio::new(f64::from(w), f64::from(h)).unwrap_or_default(),
        _ => AspectRatio::default(),
    }
}

/// Requested pixel size, falling back to 1920x1080.
pub fn image_dimensions(width: Option<u32>, height: Option<u32>) -> Canvas {
    let fallback = Canvas {
        width: DEFAULT_PIXEL_WIDTH,
        height: DEFAULT_PIXEL_HEIGHT,
    };
    match (width, height) {
        (Some(w), Some(h)) => Canvas::new(w, h).unwrap_or(fallback),
        _ => fallback,
    }
}
