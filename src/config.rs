use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    color::ColorCorrection,
    composite::CompositePolicy,
    fetch::orchestrator::DEFAULT_DAYS,
    fetch::wms::{DEFAULT_LAYER, DEFAULT_WMS_ENDPOINT, WmsView},
    foundation::core::{AspectRatio, Canvas},
    foundation::error::{SatError, SatResult},
    geo::dimensions::{MAX_ZOOM_LEVEL, aspect_for, image_dimensions},
};

/// Settings for a Sentinel mosaic run.
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
    /// Center latitude in degrees.
    pub latitude: Option<f64>,
    /// Center longitude in degrees.
    pub longitude: Option<f64>,
    /// `0` (1000 km wide) to `4` (150 km wide).
    pub zoom_level: f64,
    /// Output width in pixels; needs `height` too.
    pub width: Option<u32>,
    /// Output height in pixels; needs `width` too.
    pub height: Option<u32>,
    /// Number of past days to fetch and stack.
    pub days: u32,
    /// WMS layer name.
    pub layer: String,
    /// WMS base URL.
    pub wms_endpoint: String,
    /// Frame stacking strategy.
    pub policy: CompositePolicy,
    /// Correction applied after compositing.
    pub correction: ColorCorrection,
    /// Per-request timeout; unset keeps the transport default.
    pub fetch_timeout_secs: Option<u64>,
    /// Download workers; unset runs one per requested day.
    pub fetch_workers: Option<usize>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            zoom_level: 0.0,
            width: None,
            height: None,
            days: DEFAULT_DAYS,
            layer: DEFAULT_LAYER.to_owned(),
            wms_endpoint: DEFAULT_WMS_ENDPOINT.to_owned(),
            policy: CompositePolicy::default(),
            correction: ColorCorrection::default(),
            fetch_timeout_secs: None,
            fetch_workers: None,
        }
    }
}

impl MosaicConfig {
    /// Load a JSON config file.
    pub fn from_path(path: &Path) -> SatResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Check value ranges. Missing coordinates are reported later, when URLs are built.
    pub fn validate(&self) -> SatResult<()> {
        if !self.zoom_level.is_finite() || !(0.0..=MAX_ZOOM_LEVEL).contains(&self.zoom_level) {
            return Err(SatError::validation(format!(
                "zoom_level must be within 0..={MAX_ZOOM_LEVEL}, got {}",
                self.zoom_level
            )));
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => {
                Canvas::new(w, h)?;
                AspectRatio::new(f64::from(w), f64::from(h))?;
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(SatError::validation(
                    "width and height must be given together",
                ));
            }
            (None, None) => {}
        }
        if self.days == 0 {
            return Err(SatError::validation("days must be >= 1"));
        }
        if self.fetch_workers == Some(0) {
            return Err(SatError::validation("fetch_workers must be >= 1"));
        }
        if self.layer.trim().is_empty() {
            return Err(SatError::validation("layer must not be empty"));
        }
        if self.wms_endpoint.trim().is_empty() {
            return Err(SatError::validation("wms_endpoint must not be empty"));
        }
        if let ColorCorrection::PercentileStretch { percentile } = self.correction
            && (!percentile.is_finite() || !(0.0..50.0).contains(&percentile))
        {
            return Err(SatError::invalid_parameter(format!(
                "stretch percentile must be in [0, 50), got {percentile}"
            )));
        }
        Ok(())
    }

    /// Output size in pixels.
    pub fn canvas(&self) -> Canvas {
        image_dimensions(self.width, self.height)
    }

    /// WMS view described by this config.
    pub fn view(&self) -> WmsView {
        WmsView {
            latitude: self.latitude,
            longitude: self.longitude,
            zoom_level: self.zoom_level,
            canvas: self.canvas(),
            aspect: aspect_for(self.width, self.height),
        }
    }

    /// Per-request timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}
