//! Raw photo bytes → upright, bounded RGBA buffer.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits, RgbaImage};
use tracing::debug;

use super::GradingError;
use crate::config::GraderConfig;

/// Turns uploaded bytes into a pixel buffer the engine can scan.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, GradingError>;
}

/// Production decoder for phone photos.
///
/// 1. Validate byte size bounds
/// 2. Decode with per-side dimension limits
/// 3. Apply EXIF orientation
/// 4. Convert to RGBA
/// 5. Optionally downscale so the longest side fits `max_scan_dimension`
#[derive(Debug, Clone, Default)]
pub struct PhotoDecoder {
    config: GraderConfig,
}

impl PhotoDecoder {
    pub fn new(config: GraderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }
}

impl ImageDecoder for PhotoDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, GradingError> {
        validate_image_bytes(bytes, &self.config)?;

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.config.max_decode_dimension);
        limits.max_image_height = Some(self.config.max_decode_dimension);
        reader.limits(limits);

        let img = reader
            .decode()
            .map_err(|e| GradingError::Decode(e.to_string()))?;
        let (orig_w, orig_h) = (img.width(), img.height());

        let orientation = read_exif_orientation(bytes);
        let rgba = apply_orientation(img, orientation).to_rgba8();
        let bounded = bound_dimensions(rgba, self.config.max_scan_dimension);

        debug!(
            original = format!("{orig_w}x{orig_h}"),
            scanned = format!("{}x{}", bounded.width(), bounded.height()),
            orientation,
            "Photo decoded"
        );

        Ok(bounded)
    }
}

/// Validate byte length against the configured bounds.
pub fn validate_image_bytes(bytes: &[u8], config: &GraderConfig) -> Result<(), GradingError> {
    if bytes.len() < config.min_image_bytes {
        return Err(GradingError::TooSmall(bytes.len()));
    }
    if bytes.len() > config.max_image_bytes {
        return Err(GradingError::TooLarge {
            size: bytes.len(),
            limit_mb: config.max_image_bytes / (1024 * 1024),
        });
    }
    Ok(())
}

/// Read EXIF orientation tag from raw image bytes.
/// Returns 1 (normal) if no EXIF data or tag not present.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return 1,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Rotate/flip so the photo is upright. Regions are defined top-to-bottom,
/// so a sideways portrait would sample the wrong body parts.
///
/// 1 = Normal, 2 = Mirrored, 3 = 180deg, 4 = Flipped V,
/// 5 = Mirrored + 90deg CW, 6 = 90deg CW, 7 = Mirrored + 270deg CW, 8 = 270deg CW
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Downscale so neither side exceeds `max_dim`, preserving aspect ratio.
/// Images already within bounds, or any image when `max_dim` is 0, are
/// returned untouched.
pub fn bound_dimensions(img: RgbaImage, max_dim: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let largest = w.max(h);
    if max_dim == 0 || largest <= max_dim {
        return img;
    }

    let scale = max_dim as f64 / largest as f64;
    let new_w = ((w as f64 * scale).round() as u32).clamp(1, max_dim);
    let new_h = ((h as f64 * scale).round() as u32).clamp(1, max_dim);

    debug!(
        from = format!("{w}x{h}"),
        to = format!("{new_w}x{new_h}"),
        "Downscaling oversized photo before scanning"
    );

    image::imageops::resize(&img, new_w, new_h, FilterType::Triangle)
}
