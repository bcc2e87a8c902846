use std::ops::Range;

use image::RgbaImage;

use super::stats::{compute_row_stats, RegionStats};

/// Fixed sampling regions. All span the full image width; they overlap freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Whole photo. Shirt, cleanliness, and the secondary checks of the others.
    Full,
    /// Rows `[H/2, H)`. Pants.
    LowerHalf,
    /// Bottom 15% of rows. Shoes.
    BottomStrip,
    /// Top 30% of rows. Grooming.
    TopStrip,
}

impl Region {
    /// Row range of this region for an image of `height` rows.
    /// Fractions of the height are floored.
    pub fn rows(self, height: u32) -> Range<u32> {
        match self {
            Region::Full => 0..height,
            Region::LowerHalf => height / 2..height,
            Region::BottomStrip => height - floor_percent(height, 15)..height,
            Region::TopStrip => 0..floor_percent(height, 30),
        }
    }
}

// Integer arithmetic keeps the floor exact (0.15 * 100 is not 15.0 in f64).
fn floor_percent(height: u32, percent: u64) -> u32 {
    (height as u64 * percent / 100) as u32
}

/// Statistics for every region a grading pass needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionSamples {
    pub full: RegionStats,
    pub lower_half: RegionStats,
    pub bottom_strip: RegionStats,
    pub top_strip: RegionStats,
}

impl RegionSamples {
    pub fn get(&self, region: Region) -> &RegionStats {
        match region {
            Region::Full => &self.full,
            Region::LowerHalf => &self.lower_half,
            Region::BottomStrip => &self.bottom_strip,
            Region::TopStrip => &self.top_strip,
        }
    }
}

pub fn region_stats(image: &RgbaImage, region: Region) -> RegionStats {
    compute_row_stats(image, region.rows(image.height()))
}

/// Sample all four regions of `image`.
pub fn extract_regions(image: &RgbaImage) -> RegionSamples {
    RegionSamples {
        full: region_stats(image, Region::Full),
        lower_half: region_stats(image, Region::LowerHalf),
        bottom_strip: region_stats(image, Region::BottomStrip),
        top_strip: region_stats(image, Region::TopStrip),
    }
}
