//! satmosaic fetches daily satellite imagery from public web endpoints and composites it into a
//! single color-corrected image.
//!
//! - [`compose_sentinel`]: N daily EUMETSAT WMS frames, stacked and color-corrected
//! - [`fetch_sdo_image`]: the latest NASA SDO solar image
#![forbid(unsafe_code)]

pub mod color;
pub mod composite;
pub mod config;
pub mod fetch;
mod foundation;
pub mod geo;
pub mod pipeline;

pub use crate::color::ColorCorrection;
pub use crate::composite::{CompositePolicy, composite};
pub use crate::config::MosaicConfig;
pub use crate::fetch::http::{HttpFetcher, ImageFetcher};
pub use crate::fetch::orchestrator::{
    CancelToken, FetchOrchestrator, FetchReport, FrameRequest, ImageFrame,
};
pub use crate::fetch::sdo::{SdoColorMode, fetch_sdo_image};
pub use crate::fetch::wms::{WmsView, build_tile_url};
pub use crate::foundation::core::{AspectRatio, BoundingBox, Canvas, Coordinate};
pub use crate::foundation::error::{SatError, SatResult};
pub use crate::pipeline::{MosaicOutput, compose_sentinel, compose_sentinel_at};
