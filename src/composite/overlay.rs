use crate::{
    composite::{
        CompositeCanvas,
        blend::{over, premultiply_in_place},
    },
    fetch::orchestrator::ImageFrame,
};

/// Paint `frames` (newest first) oldest-first, so later days cover earlier ones.
pub(crate) fn overlay_frames(target: &mut CompositeCanvas, frames: &[ImageFrame]) {
    for frame in frames.iter().rev() {
        paste_frame(target, frame);
    }
}

/// Alpha-composite one frame at the canvas origin, clipped to the overlap.
///
/// RGB frames carry no alpha and are treated as fully opaque.
fn paste_frame(target: &mut CompositeCanvas, frame: &ImageFrame) {
    let rgba = frame.image.to_rgba8();
    let (fw, fh) = rgba.dimensions();
    let canvas = target.canvas();
    if (fw, fh) != (canvas.width, canvas.height) {
        tracing::debug!(
            timestamp = %frame.timestamp,
            frame_w = fw,
            frame_h = fh,
            canvas_w = canvas.width,
            canvas_h = canvas.height,
            "frame size differs from canvas; clipping"
        );
    }

    let mut src = rgba.into_raw();
    premultiply_in_place(&mut src);

    let w = fw.min(canvas.width);
    let h = fh.min(canvas.height);
    for y in 0..h {
        for x in 0..w {
            let i = ((y as usize) * (fw as usize) + (x as usize)) * 4;
            let s = [src[i], src[i + 1], src[i + 2], src[i + 3]];
            let d = target.pixel(x, y);
            target.put_pixel(x, y, over(d, s));
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbaImage};

    use super::*;
    use crate::foundation::core::Canvas;

    #[test]
    fn smaller_frame_is_pasted_at_origin() {
        let mut target = CompositeCanvas::new(Canvas {
            width: 3,
            height: 2,
        });
        let frame = ImageFrame {
            timestamp: "t".to_string(),
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                1,
                1,
                image::Rgba([9, 8, 7, 255]),
            )),
        };
        overlay_frames(&mut target, &[frame]);
        assert_eq!(target.pixel(0, 0), [9, 8, 7, 255]);
        assert_eq!(target.pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(target.pixel(2, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn larger_frame_is_clipped() {
        let mut target = CompositeCanvas::new(Canvas {
            width: 1,
            height: 1,
        });
        let frame = ImageFrame {
            timestamp: "t".to_string(),
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                4,
                image::Rgba([1, 2, 3, 255]),
            )),
        };
        overlay_frames(&mut target, &[frame]);
        assert_eq!(target.data(), &[1, 2, 3, 255]);
    }

    #[test]
    fn semi_transparent_frame_blends_over_older() {
        let mut target = CompositeCanvas::new(Canvas {
            width: 1,
            height: 1,
        });
        let newest = ImageFrame {
            timestamp: "new".to_string(),
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                1,
                1,
                image::Rgba([255, 255, 255, 128]),
            )),
        };
        overlay_frames(&mut target, &[newest]);
        assert_eq!(target.pixel(0, 0), [128, 128, 128, 255]);
    }
}
