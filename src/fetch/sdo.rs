use std::{fmt, str::FromStr};

use image::{RgbImage, imageops::FilterType};

use crate::{
    fetch::http::ImageFetcher,
    foundation::error::{SatError, SatResult},
};

/// Edge length of the square SDO output image.
pub const SDO_OUTPUT_SIZE: u32 = 1080;

/// NASA SDO "latest" image channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SdoColorMode {
    /// AIA 171 Å.
    #[serde(rename = "0171")]
    Aia171,
    /// AIA 171 Å with PFSS field lines.
    #[serde(rename = "0171pfss")]
    Aia171Pfss,
    /// AIA 304 Å.
    #[default]
    #[serde(rename = "0304")]
    Aia304,
    /// AIA 304 Å with PFSS field lines.
    #[serde(rename = "0304pfss")]
    Aia304Pfss,
    /// HMI intensitygram.
    #[serde(rename = "HMIIC")]
    HmiIntensity,
}

impl SdoColorMode {
    /// Every supported mode, in the order the endpoint documents them.
    pub const ALL: [SdoColorMode; 5] = [
        SdoColorMode::Aia171,
        SdoColorMode::Aia171Pfss,
        SdoColorMode::Aia304,
        SdoColorMode::Aia304Pfss,
        SdoColorMode::HmiIntensity,
    ];

    /// Identifier used in the SDO asset file name.
    pub fn as_str(self) -> &'static str {
        match self {
            SdoColorMode::Aia171 => "0171",
            SdoColorMode::Aia171Pfss => "0171pfss",
            SdoColorMode::Aia304 => "0304",
            SdoColorMode::Aia304Pfss => "0304pfss",
            SdoColorMode::HmiIntensity => "HMIIC",
        }
    }

    /// Latest 2048px image URL for this mode.
    pub fn url(self) -> String {
        format!(
            "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_2048_{}.jpg",
            self.as_str()
        )
    }
}

impl fmt::Display for SdoColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdoColorMode {
    type Err = SatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let supported = Self::ALL.map(SdoColorMode::as_str).join(", ");
                SatError::invalid_parameter(format!(
                    "unsupported SDO color mode '{s}' (supported: {supported})"
                ))
            })
    }
}

/// Download the latest SDO image for `mode` and resize it to 1080x1080.
#[tracing::instrument(skip(fetcher))]
pub fn fetch_sdo_image(fetcher: &dyn ImageFetcher, mode: SdoColorMode) -> SatResult<RgbImage> {
    let url = mode.url();
    tracing::info!(%url, "downloading SDO image");
    let img = fetcher.fetch(&url)?;
    Ok(image::imageops::resize(
        &img.to_rgb8(),
        SDO_OUTPUT_SIZE,
        SDO_OUTPUT_SIZE,
        FilterType::CatmullRom,
    ))
}
