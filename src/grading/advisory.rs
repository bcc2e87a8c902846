//! Advisory photo checks: framing, exposure, contrast.
//!
//! These surface hints to the uploader and never change the grade.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::stats::{compute_image_stats, pixel_brightness};

/// Height/width below this does not look like a standing full-body shot.
const FULL_BODY_MIN_ASPECT: f64 = 1.2;

const TOO_DARK_BRIGHTNESS: f64 = 50.0;
const OVEREXPOSED_BRIGHTNESS: f64 = 230.0;

/// RMS contrast of per-pixel brightness below this = nearly flat image.
const LOW_CONTRAST_RMS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoAdvisory {
    NotFullBody,
    TooDark,
    Overexposed,
    LowContrast,
    /// Photo could not be decoded at all.
    Unreadable,
}

impl PhotoAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFullBody => "Photo does not look like a full-body shot. Stand back so head to shoes are visible.",
            Self::TooDark => "Photo is too dark. Retake it in better lighting.",
            Self::Overexposed => "Photo is overexposed. Avoid direct light or flash.",
            Self::LowContrast => "Photo has very low contrast. Use a plain background that differs from the uniform.",
            Self::Unreadable => "Photo could not be read. Upload a JPEG or PNG image.",
        }
    }
}

/// Run all advisory checks on a decoded photo.
pub fn assess_photo(image: &RgbaImage) -> Vec<PhotoAdvisory> {
    let mut advisories = Vec::new();
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        advisories.push(PhotoAdvisory::Unreadable);
        return advisories;
    }

    if (h as f64 / w as f64) < FULL_BODY_MIN_ASPECT {
        advisories.push(PhotoAdvisory::NotFullBody);
    }

    let stats = compute_image_stats(image);
    if stats.avg_brightness < TOO_DARK_BRIGHTNESS {
        advisories.push(PhotoAdvisory::TooDark);
    } else if stats.avg_brightness > OVEREXPOSED_BRIGHTNESS {
        advisories.push(PhotoAdvisory::Overexposed);
    }

    if brightness_contrast(image) < LOW_CONTRAST_RMS {
        advisories.push(PhotoAdvisory::LowContrast);
    }

    advisories
}

/// RMS contrast (standard deviation) of per-pixel brightness.
pub fn brightness_contrast(image: &RgbaImage) -> f64 {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for p in image.pixels() {
        let v = pixel_brightness(p.0[0], p.0[1], p.0[2]);
        sum += v;
        sum_sq += v * v;
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64) - (mean * mean);
    variance.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn striped(width: u32, height: u32, a: u8, b: u8) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, y| {
            let v = if y % 2 == 0 { a } else { b };
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn well_framed_photo_has_no_advisories() {
        assert!(assess_photo(&striped(40, 100, 60, 200)).is_empty());
    }

    #[test]
    fn landscape_photo_is_not_full_body() {
        let advisories = assess_photo(&striped(100, 60, 60, 200));
        assert_eq!(advisories, vec![PhotoAdvisory::NotFullBody]);
    }

    #[test]
    fn exposure_extremes() {
        let dark = assess_photo(&striped(40, 100, 0, 60));
        assert!(dark.contains(&PhotoAdvisory::TooDark));
        let bright = assess_photo(&RgbaImage::from_pixel(40, 100, Rgba([250, 250, 250, 255])));
        assert!(bright.contains(&PhotoAdvisory::Overexposed));
        assert!(bright.contains(&PhotoAdvisory::LowContrast));
    }

    #[test]
    fn contrast_of_two_levels_is_half_the_gap() {
        let img = striped(10, 10, 100, 200);
        assert!((brightness_contrast(&img) - 50.0).abs() < 1e-9);
        assert_eq!(brightness_contrast(&RgbaImage::new(0, 0)), 0.0);
    }

    #[test]
    fn empty_image_is_unreadable() {
        assert_eq!(assess_photo(&RgbaImage::new(0, 5)), vec![PhotoAdvisory::Unreadable]);
    }

    #[test]
    fn every_advisory_has_a_message() {
        for a in [
            PhotoAdvisory::NotFullBody,
            PhotoAdvisory::TooDark,
            PhotoAdvisory::Overexposed,
            PhotoAdvisory::LowContrast,
            PhotoAdvisory::Unreadable,
        ] {
            assert!(!a.message().is_empty());
        }
    }
}
