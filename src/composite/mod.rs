//! Stacking of daily frames into one canvas.
//!
//! Two strategies are available, picked through [`CompositePolicy`]:
//!
//! - [`CompositePolicy::Overlay`] paints frames oldest-first so the newest data ends on top and
//!   transparent (not yet imaged) regions reveal older days underneath.
//! - [`CompositePolicy::LeastCloud`] picks, per pixel, between the darkest and the most saturated
//!   candidate. This heuristic is exploratory and has not been validated against ground truth.

pub mod blend;
pub mod least_cloud;
pub mod overlay;

use image::RgbImage;

use crate::{
    composite::blend::{PremulRgba8, unpremultiply},
    fetch::orchestrator::ImageFrame,
    foundation::core::Canvas,
};

/// Frame stacking strategy.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CompositePolicy {
    /// Alpha-composite frames back-to-front.
    #[default]
    Overlay,
    /// Per-pixel least-bright / most-saturated selection.
    LeastCloud,
}

/// Opaque black RGBA8 premultiplied working buffer.
#[derive(Clone, Debug)]
pub struct CompositeCanvas {
    canvas: Canvas,
    data: Vec<u8>,
}

impl CompositeCanvas {
    /// Blank (opaque black) canvas.
    pub fn new(canvas: Canvas) -> Self {
        let data = [0u8, 0, 0, 255].repeat(canvas.pixel_count());
        Self { canvas, data }
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, px: PremulRgba8) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4
    }

    /// Drop alpha and return the straight-color RGB result.
    pub fn into_rgb(self) -> RgbImage {
        let Canvas { width, height } = self.canvas;
        let mut rgb = Vec::with_capacity(self.canvas.pixel_count() * 3);
        for px in self.data.chunks_exact(4) {
            let s = unpremultiply([px[0], px[1], px[2], px[3]]);
            rgb.extend_from_slice(&s[..3]);
        }
        RgbImage::from_raw(width, height, rgb)
            .unwrap_or_else(|| RgbImage::new(width, height))
    }
}

/// Stack `frames` (request order, newest first) onto a blank canvas using `policy`.
///
/// An empty frame list yields a blank canvas of the requested size, not an error.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn composite(frames: &[ImageFrame], canvas: Canvas, policy: CompositePolicy) -> RgbImage {
    let mut target = CompositeCanvas::new(canvas);
    match policy {
        CompositePolicy::Overlay => overlay::overlay_frames(&mut target, frames),
        CompositePolicy::LeastCloud => least_cloud::least_cloud_frames(&mut target, frames),
    }
    target.into_rgb()
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbaImage};

    use super::*;

    fn frame(img: DynamicImage) -> ImageFrame {
        ImageFrame {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            image: img,
        }
    }

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 60) as u8, ((x + y) * 17) as u8])
        })
    }

    #[test]
    fn zero_frames_is_blank_canvas_for_every_policy() {
        let canvas = Canvas {
            width: 5,
            height: 3,
        };
        for policy in [CompositePolicy::Overlay, CompositePolicy::LeastCloud] {
            let out = composite(&[], canvas, policy);
            assert_eq!(out.dimensions(), (5, 3));
            assert!(out.as_raw().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn single_opaque_frame_is_identity() {
        let img = gradient(6, 4);
        let canvas = Canvas {
            width: 6,
            height: 4,
        };
        let out = composite(
            &[frame(DynamicImage::ImageRgb8(img.clone()))],
            canvas,
            CompositePolicy::Overlay,
        );
        assert_eq!(out, img);

        let rgba = DynamicImage::ImageRgb8(img.clone()).to_rgba8();
        let out = composite(
            &[frame(DynamicImage::ImageRgba8(rgba))],
            canvas,
            CompositePolicy::Overlay,
        );
        assert_eq!(out, img);
    }

    #[test]
    fn newest_frame_ends_on_top() {
        let canvas = Canvas {
            width: 2,
            height: 1,
        };
        let newest = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        let oldest = RgbaImage::from_raw(2, 1, vec![0, 0, 255, 255, 0, 255, 0, 255]).unwrap();
        let frames = [
            frame(DynamicImage::ImageRgba8(newest)),
            frame(DynamicImage::ImageRgba8(oldest)),
        ];
        let out = composite(&frames, canvas, CompositePolicy::Overlay);
        // Pixel 0: newest red covers older blue. Pixel 1: newest is transparent, older green shows.
        assert_eq!(out.as_raw(), &vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn policy_names_are_kebab_case() {
        let p: CompositePolicy = serde_json::from_str("\"least-cloud\"").unwrap();
        assert_eq!(p, CompositePolicy::LeastCloud);
        assert_eq!(
            serde_json::to_string(&CompositePolicy::Overlay).unwrap(),
            "\"overlay\""
        );
    }
}
