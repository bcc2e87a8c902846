//! Per-region color and brightness statistics.
//!
//! Brightness is the plain channel mean `(R+G+B)/3`, not luma. The scoring
//! thresholds were tuned against this definition.

use std::ops::Range;

use image::RgbaImage;
use serde::Serialize;

/// Brightness strictly below this counts as a dark pixel.
pub const DARK_PIXEL_BRIGHTNESS: f64 = 100.0;

/// Brightness strictly above this counts as a white pixel.
pub const WHITE_PIXEL_BRIGHTNESS: f64 = 200.0;

/// Aggregate statistics over a rectangular pixel region.
///
/// Values are kept unrounded; thresholds downstream compare against the raw
/// floating-point averages and ratios. Use [`RegionStats::summary`] when
/// reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionStats {
    pub avg_red: f64,
    pub avg_green: f64,
    pub avg_blue: f64,
    pub avg_brightness: f64,
    /// Fraction of pixels with brightness < 100. In `[0, 1]`.
    pub dark_pixel_ratio: f64,
    /// Fraction of pixels with brightness > 200. In `[0, 1]`.
    pub white_pixel_ratio: f64,
    pub pixel_count: u64,
}

/// Rounded view of [`RegionStats`] for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub avg_red: u8,
    pub avg_green: u8,
    pub avg_blue: u8,
    pub avg_brightness: u8,
    pub dark_pixel_ratio: f64,
    pub white_pixel_ratio: f64,
}

impl RegionStats {
    /// `|avgR - avgG| + |avgG - avgB|`, the color spread used by several rules.
    pub fn color_variation(&self) -> f64 {
        (self.avg_red - self.avg_green).abs() + (self.avg_green - self.avg_blue).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    pub fn summary(&self) -> StatsSummary {
        let round = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        StatsSummary {
            avg_red: round(self.avg_red),
            avg_green: round(self.avg_green),
            avg_blue: round(self.avg_blue),
            avg_brightness: round(self.avg_brightness),
            dark_pixel_ratio: self.dark_pixel_ratio,
            white_pixel_ratio: self.white_pixel_ratio,
        }
    }
}

/// Brightness of a single pixel: simple channel mean.
pub fn pixel_brightness(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 + g as f64 + b as f64) / 3.0
}

/// Statistics over the whole image.
pub fn compute_image_stats(image: &RgbaImage) -> RegionStats {
    compute_row_stats(image, 0..image.height())
}

/// Statistics over a band of full-width rows, `rows` clamped to the image.
///
/// An empty band yields zero-valued stats instead of dividing by zero.
pub fn compute_row_stats(image: &RgbaImage, rows: Range<u32>) -> RegionStats {
    let end = rows.end.min(image.height());
    let start = rows.start.min(end);
    let width = image.width() as usize;

    // Row-major, 4 bytes per pixel: a row band is one contiguous slice.
    let raw: &[u8] = image.as_raw();
    let band = &raw[start as usize * width * 4..end as usize * width * 4];
    accumulate(band)
}

/// One pass over a flat RGBA byte slice. Alpha is ignored.
pub fn accumulate(rgba: &[u8]) -> RegionStats {
    let mut sum_r = 0u64;
    let mut sum_g = 0u64;
    let mut sum_b = 0u64;
    let mut dark = 0u64;
    let mut white = 0u64;
    let mut count = 0u64;

    for px in rgba.chunks_exact(4) {
        let (r, g, b) = (px[0], px[1], px[2]);
        sum_r += r as u64;
        sum_g += g as u64;
        sum_b += b as u64;

        let brightness = pixel_brightness(r, g, b);
        if brightness < DARK_PIXEL_BRIGHTNESS {
            dark += 1;
        } else if brightness > WHITE_PIXEL_BRIGHTNESS {
            white += 1;
        }
        count += 1;
    }

    if count == 0 {
        return RegionStats::default();
    }

    let n = count as f64;
    let avg_red = sum_r as f64 / n;
    let avg_green = sum_g as f64 / n;
    let avg_blue = sum_b as f64 / n;

    RegionStats {
        avg_red,
        avg_green,
        avg_blue,
        // Mean of per-pixel (R+G+B)/3 equals the mean of the channel means.
        avg_brightness: (sum_r + sum_g + sum_b) as f64 / (3.0 * n),
        dark_pixel_ratio: dark as f64 / n,
        white_pixel_ratio: white as f64 / n,
        pixel_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn white_image_is_all_white_pixels() {
        let stats = compute_image_stats(&solid(8, 8, [255, 255, 255]));
        assert_eq!(stats.avg_brightness, 255.0);
        assert_eq!(stats.dark_pixel_ratio, 0.0);
        assert_eq!(stats.white_pixel_ratio, 1.0);
        assert_eq!(stats.pixel_count, 64);
    }

    #[test]
    fn black_image_is_all_dark_pixels() {
        let stats = compute_image_stats(&solid(8, 8, [0, 0, 0]));
        assert_eq!(stats.avg_brightness, 0.0);
        assert_eq!(stats.dark_pixel_ratio, 1.0);
        assert_eq!(stats.white_pixel_ratio, 0.0);
    }

    #[test]
    fn brightness_is_channel_mean_not_luma() {
        // Pure red: luma would be ~76, channel mean is 85.
        let stats = compute_image_stats(&solid(4, 4, [255, 0, 0]));
        assert_eq!(stats.avg_brightness, 85.0);
        assert_eq!(stats.dark_pixel_ratio, 1.0);
        assert_eq!(stats.color_variation(), 255.0);
    }

    #[test]
    fn threshold_boundaries_are_strict() {
        // Brightness exactly 100 is not dark, exactly 200 is not white.
        let at_dark = compute_image_stats(&solid(2, 2, [100, 100, 100]));
        assert_eq!(at_dark.dark_pixel_ratio, 0.0);
        let at_white = compute_image_stats(&solid(2, 2, [200, 200, 200]));
        assert_eq!(at_white.white_pixel_ratio, 0.0);
        let above_white = compute_image_stats(&solid(2, 2, [201, 200, 200]));
        assert_eq!(above_white.white_pixel_ratio, 1.0);
    }

    #[test]
    fn mixed_pixels_give_fractional_ratios() {
        // Left half black, right half white.
        let img = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }
        });
        let stats = compute_image_stats(&img);
        assert_eq!(stats.dark_pixel_ratio, 0.5);
        assert_eq!(stats.white_pixel_ratio, 0.5);
        assert!((stats.avg_brightness - 127.5).abs() < 1e-9);
        assert_eq!(stats.summary().avg_brightness, 128);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([50, 60, 70, 0]));
        let stats = compute_image_stats(&img);
        assert_eq!(stats.avg_red, 50.0);
        assert_eq!(stats.avg_blue, 70.0);
    }

    #[test]
    fn empty_region_is_zero_valued() {
        let img = solid(5, 5, [255, 255, 255]);
        let stats = compute_row_stats(&img, 3..3);
        assert!(stats.is_empty());
        assert_eq!(stats, RegionStats::default());

        let zero_height = RgbaImage::new(10, 0);
        assert_eq!(compute_image_stats(&zero_height), RegionStats::default());
    }

    #[test]
    fn row_band_is_clamped_to_image() {
        let img = RgbaImage::from_fn(2, 4, |_, y| {
            if y < 2 { Rgba([0, 0, 0, 255]) } else { Rgba([240, 240, 240, 255]) }
        });
        let bottom = compute_row_stats(&img, 2..100);
        assert_eq!(bottom.pixel_count, 4);
        assert_eq!(bottom.white_pixel_ratio, 1.0);
    }
}
