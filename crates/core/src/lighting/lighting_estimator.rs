use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

use super::domain::classification::{FACE_TABLE, SCENE_TABLE};
use super::domain::lighting_reading::{LightingReading, MeasurementScope};
use super::domain::luminance::LuminancePlane;

/// Face-aware lighting estimation: locate → measure lightness → classify.
///
/// Holds the face locator for the lifetime of the run; nothing else is
/// carried between frames.
pub struct LightingEstimator {
    locator: Box<dyn FaceLocator>,
}

impl LightingEstimator {
    pub fn new(locator: Box<dyn FaceLocator>) -> Self {
        Self { locator }
    }

    /// Estimates lighting for one frame.
    ///
    /// Never fails: a locator error is logged and the frame is measured as
    /// if no face had been found.
    pub fn estimate(&mut self, frame: &Frame) -> LightingReading {
        let faces = if frame.is_empty() {
            Vec::new()
        } else {
            match self.locator.locate(&frame.to_gray_image()) {
                Ok(faces) => faces,
                Err(e) => {
                    log::warn!("Face location failed on frame {}: {e}", frame.index());
                    Vec::new()
                }
            }
        };
        estimate_with_faces(frame, &faces)
    }
}

/// Measures `frame` given already-located faces.
///
/// With no faces the whole frame is measured against the scene buckets;
/// otherwise only the largest face is measured against the face buckets.
pub fn estimate_with_faces(frame: &Frame, faces: &[FaceRegion]) -> LightingReading {
    let plane = LuminancePlane::from_frame(frame);

    let (stats, table, scope) = match FaceRegion::largest(faces) {
        None => (plane.stats(), &SCENE_TABLE, MeasurementScope::Scene),
        Some(face) => (
            plane.region_stats(face),
            &FACE_TABLE,
            MeasurementScope::Face(*face),
        ),
    };

    let brightness = stats.mean.clamp(0.0, 255.0);
    LightingReading {
        label: table.classify(brightness),
        brightness,
        std_dev: stats.std_dev,
        scope,
    }
}
