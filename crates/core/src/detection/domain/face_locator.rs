use image::GrayImage;

use crate::shared::constants::{DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_STEP, MIN_FACE_SIZE};
use crate::shared::region::FaceRegion;

/// Domain interface for face localization on a grayscale frame.
///
/// May return zero, one or many regions; an empty result is a normal
/// outcome, not an error. Implementations hold a loaded model, hence
/// `&mut self`.
pub trait FaceLocator {
    fn locate(&mut self, gray: &GrayImage) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}

/// Detection-quality knobs shared by every locator backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Ratio between consecutive pyramid scales (> 1.0).
    pub scale_step: f32,
    /// Minimum supporting hits before a candidate is reported.
    pub min_neighbors: u32,
    /// Smallest face edge length in pixels.
    pub min_face_size: u32,
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale_step > 1.0 && self.scale_step < 100.0) {
            return Err(format!(
                "Scale step must be greater than 1.0 and below 100, got {}",
                self.scale_step
            ));
        }
        if self.min_neighbors == 0 {
            return Err("Minimum neighbors must be at least 1".to_string());
        }
        if self.min_face_size < MIN_FACE_SIZE {
            return Err(format!(
                "Minimum face size must be at least {MIN_FACE_SIZE}, got {}",
                self.min_face_size
            ));
        }
        Ok(())
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_step: DEFAULT_SCALE_STEP,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_face_size: MIN_FACE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let params = DetectionParams::default();
        assert_eq!(params.min_neighbors, 4);
        assert!((params.scale_step - 1.1).abs() < f32::EPSILON);
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::unit_scale(DetectionParams { scale_step: 1.0, ..DetectionParams::default() })]
    #[case::shrinking_scale(DetectionParams { scale_step: 0.9, ..DetectionParams::default() })]
    #[case::nan_scale(DetectionParams { scale_step: f32::NAN, ..DetectionParams::default() })]
    #[case::no_neighbors(DetectionParams { min_neighbors: 0, ..DetectionParams::default() })]
    #[case::tiny_faces(DetectionParams { min_face_size: 8, ..DetectionParams::default() })]
    fn test_invalid_params_rejected(#[case] params: DetectionParams) {
        assert!(params.validate().is_err());
    }
}
