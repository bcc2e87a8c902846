use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use super::decode::{ImageDecoder, PhotoDecoder};
use super::feedback::{ComponentFeedback, UNREADABLE_PHOTO_FEEDBACK};
use super::regions::extract_regions;
use super::scoring::{score_components, ComponentScores};
use super::{GradingError, GradingResult};
use crate::config::GraderConfig;
use crate::models::enums::LetterGrade;

/// Score given to every component when the photo cannot be read.
pub const FALLBACK_COMPONENT_SCORE: u8 = 50;

/// Stages of one grading call, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingStage {
    Decoding,
    Scoring,
    Done,
    Failed,
}

/// Stateless grading orchestrator.
///
/// Holds only the decoder; every call decodes and scores from scratch, so
/// one engine can be shared across threads and concurrent calls.
#[derive(Clone)]
pub struct GradingEngine {
    decoder: Arc<dyn ImageDecoder>,
}

impl Default for GradingEngine {
    fn default() -> Self {
        Self::new(GraderConfig::default())
    }
}

impl GradingEngine {
    pub fn new(config: GraderConfig) -> Self {
        Self::with_decoder(Arc::new(PhotoDecoder::new(config)))
    }

    pub fn with_decoder(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Decode photo bytes without scoring them.
    pub fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, GradingError> {
        debug!(stage = ?GradingStage::Decoding, size = bytes.len(), "Grading photo");
        self.decoder.decode(bytes)
    }

    /// Grade photo bytes. Never fails: unreadable photos get [`fallback_result`].
    pub fn grade(&self, bytes: &[u8]) -> GradingResult {
        self.try_grade(bytes).unwrap_or_else(|e| {
            warn!(stage = ?GradingStage::Failed, error = %e, "Photo unreadable, using fallback grade");
            fallback_result()
        })
    }

    /// Grade photo bytes, surfacing decode failures to the caller.
    pub fn try_grade(&self, bytes: &[u8]) -> Result<GradingResult, GradingError> {
        let image = self.decode(bytes)?;
        Ok(grade_image(&image))
    }

    /// Grade an already-decoded row-major RGBA buffer.
    /// A length that does not match `width * height * 4` is treated as unreadable.
    pub fn grade_raw(&self, width: u32, height: u32, rgba: Vec<u8>) -> GradingResult {
        let len = rgba.len();
        let expected = width as usize * height as usize * 4;
        let image = if len == expected {
            RgbaImage::from_raw(width, height, rgba)
        } else {
            None
        };
        match image {
            Some(image) => grade_image(&image),
            None => {
                let e = GradingError::MalformedBuffer { width, height, len };
                warn!(stage = ?GradingStage::Failed, error = %e, "Raw buffer rejected, using fallback grade");
                fallback_result()
            }
        }
    }

    /// Grade on tokio's blocking pool so async callers are not stalled by
    /// decoding and pixel scanning.
    pub async fn grade_async(&self, bytes: Vec<u8>) -> GradingResult {
        let engine = self.clone();
        match tokio::task::spawn_blocking(move || engine.grade(&bytes)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Grading task did not complete, using fallback grade");
                fallback_result()
            }
        }
    }
}

/// Score a decoded buffer. Pure and deterministic.
pub fn grade_image(image: &RgbaImage) -> GradingResult {
    debug!(
        stage = ?GradingStage::Scoring,
        width = image.width(),
        height = image.height(),
        "Scoring photo"
    );

    let samples = extract_regions(image);
    debug!(
        full = ?samples.full.summary(),
        lower_half = ?samples.lower_half.summary(),
        bottom_strip = ?samples.bottom_strip.summary(),
        top_strip = ?samples.top_strip.summary(),
        "Region statistics"
    );

    let result = GradingResult::from_scores(score_components(&samples));
    debug!(
        stage = ?GradingStage::Done,
        final_score = result.final_score,
        final_grade = %result.final_grade,
        "Photo graded"
    );
    result
}

/// Fixed result for photos that cannot be analyzed: every component 50,
/// grade D, and the same "upload a clearer photo" text everywhere.
pub fn fallback_result() -> GradingResult {
    GradingResult {
        final_score: FALLBACK_COMPONENT_SCORE,
        final_grade: LetterGrade::D,
        breakdown: ComponentScores::uniform(FALLBACK_COMPONENT_SCORE),
        feedback: ComponentFeedback::repeated(UNREADABLE_PHOTO_FEEDBACK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{feedback_tier, final_score, letter_for_score};
    use crate::models::enums::{Component, FeedbackTier};
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    fn solid(rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(40, 100, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    /// Roughly uniform-shaped test photo: face band on top, white shirt,
    /// navy pants, dark shoes in the bottom 15%.
    fn uniform_photo() -> RgbaImage {
        RgbaImage::from_fn(60, 200, |_, y| match y {
            0..=59 => Rgba([205, 170, 150, 255]),
            60..=99 => Rgba([235, 235, 240, 255]),
            100..=169 => Rgba([60, 70, 110, 255]),
            _ => Rgba([55, 55, 60, 255]),
        })
    }

    #[test]
    fn all_white_image() {
        let result = grade_image(&solid([255, 255, 255]));
        assert_eq!(
            result.breakdown,
            ComponentScores { shirt: 90, pant: 75, shoes: 45, grooming: 90, cleanliness: 90 }
        );
        assert_eq!(feedback_tier(result.breakdown.shirt), FeedbackTier::Excellent);
        assert_eq!(result.final_score, 77);
        assert_eq!(result.final_grade, LetterGrade::B);
    }

    #[test]
    fn all_black_image() {
        let result = grade_image(&solid([0, 0, 0]));
        assert_eq!(
            result.breakdown,
            ComponentScores { shirt: 45, pant: 60, shoes: 60, grooming: 55, cleanliness: 25 }
        );
        assert_eq!(
            feedback_tier(result.breakdown.shirt),
            FeedbackTier::NeedsImprovement
        );
        assert_eq!(result.final_score, 50);
        assert_eq!(result.final_grade, LetterGrade::D);
    }

    #[test]
    fn mid_gray_image() {
        let result = grade_image(&solid([150, 150, 150]));
        assert_eq!(
            result.breakdown,
            ComponentScores { shirt: 85, pant: 100, shoes: 75, grooming: 100, cleanliness: 75 }
        );
        assert_eq!(result.final_score, 88);
        assert_eq!(result.final_grade, LetterGrade::A);
    }

    #[test]
    fn uniform_photo_scores_well() {
        // Half the frame is dark (pants + shoes): shirt -20, pants -15, cleanliness -25.
        let result = grade_image(&uniform_photo());
        assert_eq!(
            result.breakdown,
            ComponentScores { shirt: 80, pant: 85, shoes: 100, grooming: 100, cleanliness: 75 }
        );
        assert_eq!(result.final_score, 88);
        assert_eq!(result.final_grade, LetterGrade::A);
    }

    #[test]
    fn result_invariants_hold() {
        for img in [solid([255, 255, 255]), solid([0, 0, 0]), uniform_photo()] {
            let result = grade_image(&img);
            assert_eq!(result.final_score, final_score(&result.breakdown));
            assert_eq!(result.final_grade, letter_for_score(result.final_score));
            for component in Component::ALL {
                assert!(result.breakdown.get(*component) <= 100);
                assert!(!result.feedback.get(*component).is_empty());
            }
        }
    }

    #[test]
    fn grading_is_idempotent() {
        let engine = GradingEngine::default();
        let bytes = png_bytes(&uniform_photo());
        assert_eq!(engine.grade(&bytes), engine.grade(&bytes));
    }

    #[test]
    fn decoded_bytes_match_direct_buffer_grading() {
        let img = uniform_photo();
        let engine = GradingEngine::default();
        assert_eq!(engine.grade(&png_bytes(&img)), grade_image(&img));
    }

    #[test]
    fn undecodable_bytes_give_fallback() {
        let engine = GradingEngine::default();
        for bytes in [Vec::new(), vec![0xFF; 10], vec![0x42; 4096]] {
            let result = engine.grade(&bytes);
            assert_eq!(result, fallback_result());
        }
        assert!(engine.try_grade(&[]).is_err());
    }

    #[test]
    fn fallback_result_shape() {
        let result = fallback_result();
        assert_eq!(result.final_score, 50);
        assert_eq!(result.final_grade, LetterGrade::D);
        assert_eq!(result.breakdown, ComponentScores::uniform(50));
        for component in Component::ALL {
            assert_eq!(result.feedback.get(*component), UNREADABLE_PHOTO_FEEDBACK);
        }
    }

    #[test]
    fn raw_buffer_grading() {
        let engine = GradingEngine::default();
        let white = vec![255u8; 10 * 20 * 4];
        assert_eq!(engine.grade_raw(10, 20, white), grade_image(&solid([255, 255, 255])));

        let short = vec![255u8; 10];
        assert_eq!(engine.grade_raw(10, 20, short), fallback_result());

        let oversized = vec![255u8; 10 * 20 * 4 * 2];
        assert_eq!(engine.grade_raw(10, 20, oversized), fallback_result());
    }

    #[test]
    fn large_photo_graded_on_its_own_pixels() {
        // 1-px checkerboard: any resampling turns it mid-gray and flips the grade.
        let img = RgbaImage::from_fn(1100, 1300, |x, y| {
            let v = if (x + y) % 2 == 0 { 0 } else { 255 };
            Rgba([v, v, v, 255])
        });
        let direct = grade_image(&img);
        assert_eq!(GradingEngine::default().grade(&png_bytes(&img)), direct);
        assert_ne!(direct, grade_image(&solid([128, 128, 128])));
    }

    #[test]
    fn zero_height_buffer_still_scores() {
        let engine = GradingEngine::default();
        let result = engine.grade_raw(10, 0, Vec::new());
        assert_eq!(result.breakdown.cleanliness, 50);
        assert!(result.final_score <= 100);
    }

    struct FailingDecoder;

    impl ImageDecoder for FailingDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<RgbaImage, GradingError> {
            Err(GradingError::Decode("always fails".into()))
        }
    }

    #[test]
    fn custom_decoder_failure_falls_back() {
        let engine = GradingEngine::with_decoder(Arc::new(FailingDecoder));
        assert_eq!(engine.grade(&png_bytes(&solid([1, 2, 3]))), fallback_result());
    }

    #[tokio::test]
    async fn async_grading_matches_sync() {
        let engine = GradingEngine::default();
        let bytes = png_bytes(&uniform_photo());
        let expected = engine.grade(&bytes);
        assert_eq!(engine.grade_async(bytes).await, expected);
        assert_eq!(engine.grade_async(vec![1, 2, 3]).await, fallback_result());
    }

    #[tokio::test]
    async fn concurrent_gradings_are_independent() {
        let engine = GradingEngine::default();
        let white = png_bytes(&solid([255, 255, 255]));
        let black = png_bytes(&solid([0, 0, 0]));

        let (a, b) = tokio::join!(engine.grade_async(white), engine.grade_async(black));
        assert_eq!(a.final_score, 77);
        assert_eq!(b.final_score, 50);
    }
}
