use crate::shared::region::FaceRegion;

use super::lighting_label::LightingLabel;

/// Where the brightness statistics were measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasurementScope {
    /// Whole frame; no face was found.
    Scene,
    /// The largest detected face.
    Face(FaceRegion),
}

/// Result of estimating one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingReading {
    pub label: LightingLabel,
    /// Mean lightness on the 0..=255 scale.
    pub brightness: f64,
    /// Spread of lightness over the measured area. Diagnostic only; it does
    /// not take part in classification.
    pub std_dev: f64,
    pub scope: MeasurementScope,
}

impl LightingReading {
    pub fn is_face_reading(&self) -> bool {
        matches!(self.scope, MeasurementScope::Face(_))
    }
}
