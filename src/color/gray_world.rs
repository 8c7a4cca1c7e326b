use image::{Rgb, RgbImage};

use crate::color::lab::{lab_8bit_to_srgb, srgb_to_lab_8bit};

/// Default chroma shift multiplier.
pub const DEFAULT_GRAY_WORLD_STRENGTH: f32 = 1.1;

/// Remove a global color cast by pulling the average chroma toward neutral.
///
/// In 8-bit LAB, each pixel's `a` and `b` are shifted by `(avg - 128) * (L / 255) * strength`,
/// so bright pixels are corrected more than dark ones.
pub fn gray_world_balance(img: &RgbImage, strength: f32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }

    let lab: Vec<[f32; 3]> = img.pixels().map(|p| srgb_to_lab_8bit(p.0)).collect();

    let n = lab.len() as f64;
    let (sum_a, sum_b) = lab.iter().fold((0.0f64, 0.0f64), |(sa, sb), px| {
        (sa + f64::from(px[1]), sb + f64::from(px[2]))
    });
    let shift_a = (sum_a / n - 128.0) as f32;
    let shift_b = (sum_b / n - 128.0) as f32;
    tracing::debug!(shift_a, shift_b, "gray-world chroma cast");

    let mut out = RgbImage::new(w, h);
    for (dst, [l, a, b]) in out.pixels_mut().zip(lab) {
        let weight = (l / 255.0) * strength;
        let a = (a - shift_a * weight).clamp(0.0, 255.0);
        let b = (b - shift_b * weight).clamp(0.0, 255.0);
        *dst = Rgb(lab_8bit_to_srgb([l, a, b]));
    }
    out
}
