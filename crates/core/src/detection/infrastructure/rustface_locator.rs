use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::GrayImage;

use crate::detection::domain::face_locator::{DetectionParams, FaceLocator};
use crate::shared::region::FaceRegion;

/// Score contributed per required neighbor.
///
/// SeetaFace merges overlapping windows itself and reports the merged
/// confidence instead of a hit count, so the neighbor requirement is
/// expressed as a minimum score. Four neighbors map to 2.0.
const SCORE_PER_NEIGHBOR: f64 = 0.5;

const SLIDE_WINDOW_STEP: u32 = 4;

/// Frontal-face locator backed by the SeetaFace cascade in `rustface`.
pub struct RustfaceLocator {
    detector: Box<dyn rustface::Detector>,
}

impl RustfaceLocator {
    pub fn new(model_path: &Path, params: DetectionParams) -> Result<Self, Box<dyn std::error::Error>> {
        params.validate()?;
        let file = File::open(model_path)
            .map_err(|e| format!("Failed to open face model {}: {e}", model_path.display()))?;
        let model = rustface::read_model(BufReader::new(file))?;

        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(params.min_face_size);
        detector.set_pyramid_scale_factor(pyramid_scale_factor(params.scale_step));
        detector.set_score_thresh(score_threshold(params.min_neighbors));
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        log::debug!("Loaded face model {} with {params:?}", model_path.display());
        Ok(Self { detector })
    }
}

impl FaceLocator for RustfaceLocator {
    fn locate(&mut self, gray: &GrayImage) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let image = rustface::ImageData::new(gray.as_raw(), width, height);
        let faces = self.detector.detect(&image);

        Ok(faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                to_frame_region(bbox.x(), bbox.y(), bbox.width(), bbox.height(), width, height)
            })
            .collect())
    }
}

/// rustface shrinks the image by this factor between pyramid levels.
fn pyramid_scale_factor(scale_step: f32) -> f32 {
    1.0 / scale_step
}

fn score_threshold(min_neighbors: u32) -> f64 {
    min_neighbors as f64 * SCORE_PER_NEIGHBOR
}

/// Clips a detector box to the frame, dropping boxes with no visible area.
fn to_frame_region(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    frame_width: u32,
    frame_height: u32,
) -> Option<FaceRegion> {
    let raw = FaceRegion::new(x, y, width.min(i32::MAX as u32) as i32, height.min(i32::MAX as u32) as i32);
    let (x0, y0, x1, y1) = raw.clamp_to(frame_width, frame_height);
    if x1 == x0 || y1 == y0 {
        return None;
    }
    Some(FaceRegion::new(
        x0 as i32,
        y0 as i32,
        (x1 - x0) as i32,
        (y1 - y0) as i32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pyramid_factor_inverts_scale_step() {
        assert_relative_eq!(pyramid_scale_factor(1.1), 0.909_090_9, epsilon = 1e-6);
        assert_relative_eq!(pyramid_scale_factor(1.25), 0.8);
    }

    #[test]
    fn test_default_neighbors_give_standard_threshold() {
        assert_relative_eq!(score_threshold(4), 2.0);
        assert_relative_eq!(score_threshold(1), 0.5);
    }

    #[test]
    fn test_region_inside_frame_is_kept() {
        let r = to_frame_region(10, 20, 30, 40, 640, 480).unwrap();
        assert_eq!(r, FaceRegion::new(10, 20, 30, 40));
    }

    #[test]
    fn test_region_overhanging_is_clipped() {
        let r = to_frame_region(-10, 460, 50, 50, 640, 480).unwrap();
        assert_eq!(r, FaceRegion::new(0, 460, 40, 20));
    }

    #[test]
    fn test_region_outside_frame_is_dropped() {
        assert!(to_frame_region(700, 10, 50, 50, 640, 480).is_none());
    }

    #[test]
    fn test_missing_model_fails() {
        let result = RustfaceLocator::new(
            Path::new("/nonexistent/seeta_fd_frontal_v1.0.bin"),
            DetectionParams::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_params_fail_before_loading() {
        let params = DetectionParams {
            scale_step: 0.5,
            ..DetectionParams::default()
        };
        let err = RustfaceLocator::new(Path::new("/nonexistent/model.bin"), params)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Scale step"));
    }
}
