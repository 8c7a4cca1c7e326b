use image::RgbaImage;

use crate::{composite::CompositeCanvas, fetch::orchestrator::ImageFrame};

/// Sum used for black (no-data) pixels so they never win the darkness test.
const NO_DATA_SUM: u32 = 255 * 3;

/// For every pixel, average the darkest candidate with the most saturated one.
///
/// Darkest means lowest RGB sum, which favors ground over bright cloud tops. Most saturated means
/// the largest spread between RGB channels, which favors colored surfaces over washed-out haze.
/// Fully transparent pixels are swath gaps, not data, and are never candidates. Pixels with no
/// candidate are left blank.
pub(crate) fn least_cloud_frames(target: &mut CompositeCanvas, frames: &[ImageFrame]) {
    if frames.is_empty() {
        return;
    }
    let layers: Vec<RgbaImage> = frames.iter().map(|f| f.image.to_rgba8()).collect();
    let canvas = target.canvas();

    let mut candidates = Vec::with_capacity(layers.len());
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            candidates.clear();
            candidates.extend(
                layers
                    .iter()
                    .filter(|l| x < l.width() && y < l.height())
                    .map(|l| l.get_pixel(x, y).0)
                    .filter(|px| px[3] != 0),
            );
            if let Some(px) = pick_pixel(&candidates) {
                target.put_pixel(x, y, px);
            }
        }
    }
}

/// Blend of the lowest-sum and highest-deviation candidates, or `None` with no candidates.
pub(crate) fn pick_pixel(candidates: &[[u8; 4]]) -> Option<[u8; 4]> {
    // First minimum wins; last maximum wins.
    let darkest = candidates.iter().min_by_key(|px| brightness(px))?;
    let saturated = candidates.iter().max_by_key(|px| deviation(px))?;

    let mut out = [0u8, 0, 0, 255];
    for c in 0..3 {
        out[c] = ((u16::from(darkest[c]) + u16::from(saturated[c])) / 2) as u8;
    }
    Some(out)
}

fn brightness(px: &[u8; 4]) -> u32 {
    let sum = px[..3].iter().map(|&v| u32::from(v)).sum::<u32>();
    if sum == 0 { NO_DATA_SUM } else { sum }
}

fn deviation(px: &[u8; 4]) -> u8 {
    let rgb = &px[..3];
    let max = rgb.iter().copied().max().unwrap_or(0);
    let min = rgb.iter().copied().min().unwrap_or(0);
    max - min
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::*;
    use crate::foundation::core::Canvas;

    #[test]
    fn no_candidates_yields_none() {
        assert_eq!(pick_pixel(&[]), None);
    }

    #[test]
    fn single_candidate_is_itself_opaque() {
        assert_eq!(pick_pixel(&[[10, 20, 30, 77]]), Some([10, 20, 30, 255]));
    }

    #[test]
    fn cloud_loses_to_ground() {
        let cloud = [240, 240, 245, 255];
        let ground = [40, 90, 30, 255];
        // Ground is both darkest and most saturated.
        assert_eq!(pick_pixel(&[cloud, ground]), Some(ground));
        assert_eq!(pick_pixel(&[ground, cloud]), Some(ground));
    }

    #[test]
    fn opaque_black_never_counts_as_darkest() {
        let black = [0, 0, 0, 255];
        let soil = [90, 60, 40, 255];
        assert_eq!(pick_pixel(&[black, soil]), Some([90, 60, 40, 255]));
        assert_eq!(pick_pixel(&[soil, black]), Some([90, 60, 40, 255]));
    }

    fn gray_frame(px: [u8; 4]) -> ImageFrame {
        ImageFrame {
            timestamp: "t".to_string(),
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, image::Rgba(px))),
        }
    }

    #[test]
    fn transparent_gaps_do_not_dim_neutral_pixels() {
        let haze = [200, 200, 200, 255];
        let gap = [0, 0, 0, 0];
        for frames in [
            [gray_frame(haze), gray_frame(gap)],
            [gray_frame(gap), gray_frame(haze)],
        ] {
            let mut target = CompositeCanvas::new(Canvas {
                width: 1,
                height: 1,
            });
            least_cloud_frames(&mut target, &frames);
            assert_eq!(target.pixel(0, 0), [200, 200, 200, 255]);
        }
    }

    #[test]
    fn only_transparent_coverage_stays_blank() {
        let mut target = CompositeCanvas::new(Canvas {
            width: 1,
            height: 1,
        });
        least_cloud_frames(&mut target, &[gray_frame([10, 20, 30, 0])]);
        assert_eq!(target.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn darkest_and_saturated_are_averaged() {
        let dark_gray = [30, 30, 30, 255];
        let vivid = [250, 20, 20, 255];
        assert_eq!(pick_pixel(&[dark_gray, vivid]), Some([140, 25, 25, 255]));
    }

    #[test]
    fn frames_only_contribute_where_they_cover() {
        let mut target = CompositeCanvas::new(Canvas {
            width: 2,
            height: 1,
        });
        let small = ImageFrame {
            timestamp: "t".to_string(),
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                1,
                1,
                image::Rgba([50, 60, 70, 255]),
            )),
        };
        least_cloud_frames(&mut target, &[small]);
        assert_eq!(target.pixel(0, 0), [50, 60, 70, 255]);
        assert_eq!(target.pixel(1, 0), [0, 0, 0, 255]);
    }
}
