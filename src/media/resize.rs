//! Aspect-preserving frame scaling.

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Largest size with the source aspect ratio that fits inside
/// `max_width x max_height`. Both dimensions are at least 1.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    // Compare max_w/w against max_h/h without floating point
    let width_bound = max_width as u64 * height as u64 <= max_height as u64 * width as u64;
    if width_bound {
        let fitted_h = scale_round(height, max_width, width);
        (max_width, fitted_h.clamp(1, max_height))
    } else {
        let fitted_w = scale_round(width, max_height, height);
        (fitted_w.clamp(1, max_width), max_height)
    }
}

/// `round(value * num / den)` in integer arithmetic.
fn scale_round(value: u32, num: u32, den: u32) -> u32 {
    let den = den as u64;
    ((value as u64 * num as u64 + den / 2) / den) as u32
}

/// Scale `frame` to fit inside `max_width x max_height`.
///
/// Frames that already have the fitted size are returned untouched.
pub fn fit_frame(frame: RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (w, h) = fit_dimensions(frame.width(), frame.height(), max_width, max_height);
    if (w, h) == frame.dimensions() {
        return frame;
    }
    imageops::resize(&frame, w, h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn wide_source_is_width_bound() {
        // 16:9 into an 80x44 pixel box
        assert_eq!(fit_dimensions(1920, 1080, 80, 44), (78, 44));
        assert_eq!(fit_dimensions(1920, 1080, 80, 100), (80, 45));
    }

    #[test]
    fn tall_source_is_height_bound() {
        assert_eq!(fit_dimensions(100, 400, 80, 40), (10, 40));
    }

    #[test]
    fn small_source_is_upscaled() {
        assert_eq!(fit_dimensions(4, 2, 40, 40), (40, 20));
    }

    #[test]
    fn dimensions_never_reach_zero() {
        assert_eq!(fit_dimensions(1000, 1, 10, 10), (10, 1));
        assert_eq!(fit_dimensions(0, 0, 10, 10), (1, 1));
        assert_eq!(fit_dimensions(10, 10, 0, 0), (1, 1));
    }

    #[test]
    fn fit_frame_resizes_and_keeps_color() {
        let frame = RgbImage::from_pixel(64, 32, Rgb([200, 10, 10]));
        let fitted = fit_frame(frame, 16, 16);

        assert_eq!(fitted.dimensions(), (16, 8));
        assert_eq!(*fitted.get_pixel(8, 4), Rgb([200, 10, 10]));
    }

    #[test]
    fn fit_frame_passes_through_exact_size() {
        let frame = RgbImage::from_pixel(16, 8, Rgb([1, 2, 3]));
        let fitted = fit_frame(frame.clone(), 16, 8);
        assert_eq!(fitted, frame);
    }
}
