pub mod gray_world;
pub mod lab;
pub mod stretch;

use image::RgbImage;

use crate::foundation::error::SatResult;

pub use gray_world::{DEFAULT_GRAY_WORLD_STRENGTH, gray_world_balance};
pub use stretch::{DEFAULT_STRETCH_PERCENTILE, percentile_stretch};

/// Color correction applied to the composited image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColorCorrection {
    /// Leave the composite untouched.
    None,
    /// LAB gray-world cast removal.
    GrayWorld {
        /// Chroma shift multiplier.
        #[serde(default = "default_strength")]
        strength: f32,
    },
    /// Per-channel percentile contrast stretch.
    PercentileStretch {
        /// Tail percentile clipped from each end, in `[0, 50)`.
        #[serde(default = "default_percentile")]
        percentile: f64,
    },
}

impl Default for ColorCorrection {
    fn default() -> Self {
        ColorCorrection::GrayWorld {
            strength: DEFAULT_GRAY_WORLD_STRENGTH,
        }
    }
}

fn default_strength() -> f32 {
    DEFAULT_GRAY_WORLD_STRENGTH
}

fn default_percentile() -> f64 {
    DEFAULT_STRETCH_PERCENTILE
}

impl ColorCorrection {
    /// Apply the correction, returning a new image.
    pub fn apply(self, img: &RgbImage) -> SatResult<RgbImage> {
        match self {
            ColorCorrection::None => Ok(img.clone()),
            ColorCorrection::GrayWorld { strength } => Ok(gray_world_balance(img, strength)),
            ColorCorrection::PercentileStretch { percentile } => {
                percentile_stretch(img, percentile)
            }
        }
    }
}
