use image::RgbImage;

use crate::foundation::error::{SatError, SatResult};

/// Default tail percentile clipped from each end.
pub const DEFAULT_STRETCH_PERCENTILE: f64 = 0.6;

/// Counts of each 8-bit value.
#[derive(Clone, Debug)]
struct Histogram {
    bins: [u64; 256],
    total: u64,
}

impl Histogram {
    fn new() -> Self {
        Self {
            bins: [0; 256],
            total: 0,
        }
    }

    fn add(&mut self, v: u8) {
        self.bins[v as usize] += 1;
        self.total += 1;
    }

    /// Value at sorted position `rank` (0-based).
    fn nth(&self, rank: u64) -> u8 {
        let mut seen = 0u64;
        for (v, &count) in self.bins.iter().enumerate() {
            seen += count;
            if rank < seen {
                return v as u8;
            }
        }
        255
    }

    /// `q`-th percentile with linear interpolation between closest ranks.
    fn percentile(&self, q: f64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pos = (q / 100.0) * (self.total - 1) as f64;
        let lo = pos.floor();
        let frac = pos - lo;
        let lo_v = f64::from(self.nth(lo as u64));
        if frac == 0.0 {
            return lo_v;
        }
        let hi_v = f64::from(self.nth(lo as u64 + 1));
        lo_v + (hi_v - lo_v) * frac
    }
}

/// Per-channel contrast stretch toward the whole-image percentile range.
///
/// The `[p, 100 - p]` percentile range of each channel is mapped linearly onto the same range
/// computed over all channels together. Channels whose range is empty are left unchanged, and
/// results are clamped to `0..=255` and truncated.
pub fn percentile_stretch(img: &RgbImage, percentile: f64) -> SatResult<RgbImage> {
    if !percentile.is_finite() || !(0.0..50.0).contains(&percentile) {
        return Err(SatError::invalid_parameter(format!(
            "stretch percentile must be in [0, 50), got {percentile}"
        )));
    }

    let mut all = Histogram::new();
    let mut per_channel = [Histogram::new(), Histogram::new(), Histogram::new()];
    for px in img.pixels() {
        for (c, hist) in per_channel.iter_mut().enumerate() {
            hist.add(px[c]);
            all.add(px[c]);
        }
    }

    let p0 = all.percentile(percentile);
    let p1 = all.percentile(100.0 - percentile);

    let mut out = img.clone();
    for (c, hist) in per_channel.iter().enumerate() {
        let pc0 = hist.percentile(percentile);
        let pc1 = hist.percentile(100.0 - percentile);
        if pc1 == pc0 {
            tracing::debug!(channel = c, "flat channel; stretch skipped");
            continue;
        }
        let scale = (p1 - p0) / (pc1 - pc0);
        for px in out.pixels_mut() {
            let v = scale * (f64::from(px[c]) - pc0) + p0;
            px[c] = v.clamp(0.0, 255.0).trunc() as u8;
        }
    }
    Ok(out)
}
