use crate::{
    foundation::core::{AspectRatio, BoundingBox, Canvas, Coordinate},
    foundation::error::{SatError, SatResult},
    geo::dimensions::coordinate_dimensions,
    geo::geodesy::bounding_box,
};

/// EUMETSAT geoserver WMS endpoint.
pub const DEFAULT_WMS_ENDPOINT: &str = "https://view.eumetsat.int/geoserver/wms";

/// Daily Sentinel-3 A/B OLCI true-color composite layer.
pub const DEFAULT_LAYER: &str = "copernicus:daily_sentinel3ab_olci_l1_rgb_fulres";

/// Format a WMS 1.3.0 `GetMap` request for a transparent PNG in `EPSG:4326`.
///
/// Query parameter order is fixed so identical inputs produce identical URLs.
pub fn build_tile_url(
    endpoint: &str,
    bbox: BoundingBox,
    layer: &str,
    iso_timestamp: &str,
    pixel_width: u32,
    pixel_height: u32,
) -> String {
    format!(
        "{endpoint}?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetMap&FORMAT=image/png&TRANSPARENT=true\
         &LAYERS={layer}&STYLES=&tiled=true&TIME={iso_timestamp}\
         &WIDTH={pixel_width}&HEIGHT={pixel_height}&CRS=EPSG:4326&BBOX={bbox}"
    )
}

/// View parameters that turn into one WMS request per timestamp.
#[derive(Clone, Debug)]
pub struct WmsView {
    /// Center latitude; required before a URL can be built.
    pub latitude: Option<f64>,
    /// Center longitude; required before a URL can be built.
    pub longitude: Option<f64>,
    /// Zoom level, `0` (widest) to `4` (closest).
    pub zoom_level: f64,
    /// Requested pixel size.
    pub canvas: Canvas,
    /// Aspect ratio of the ground extent.
    pub aspect: AspectRatio,
}

impl WmsView {
    /// Center coordinate, or [`SatError::InvalidCoordinate`] when either component is unset.
    pub fn center(&self) -> SatResult<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Coordinate { lat, lon }),
            _ => Err(SatError::invalid_coordinate(
                "no coordinates specified: both latitude and longitude are required",
            )),
        }
    }

    /// Geographic extent of the view.
    pub fn bbox(&self) -> SatResult<BoundingBox> {
        let center = self.center()?;
        let ext = coordinate_dimensions(self.zoom_level, self.aspect);
        Ok(bounding_box(center, ext.width_km, ext.height_km))
    }

    /// Full `GetMap` URL for `layer` at `iso_timestamp`.
    pub fn tile_url(&self, endpoint: &str, layer: &str, iso_timestamp: &str) -> SatResult<String> {
        let bbox = self.bbox()?;
        Ok(build_tile_url(
            endpoint,
            bbox,
            layer,
            iso_timestamp,
            self.canvas.width,
            self.canvas.height,
        ))
    }
}
