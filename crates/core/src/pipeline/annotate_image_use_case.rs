use std::path::Path;

use crate::capture::domain::frame_source::FrameSource;
use crate::lighting::domain::lighting_reading::LightingReading;
use crate::lighting::lighting_estimator::LightingEstimator;
use crate::overlay::overlay_renderer::OverlayRenderer;

/// Single-image pipeline: read → estimate → render → write.
pub struct AnnotateImageUseCase {
    source: Box<dyn FrameSource>,
    estimator: LightingEstimator,
    renderer: OverlayRenderer,
}

impl AnnotateImageUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        estimator: LightingEstimator,
        renderer: OverlayRenderer,
    ) -> Self {
        Self {
            source,
            estimator,
            renderer,
        }
    }

    /// Estimates the first frame of the source and, when `output_path` is
    /// given, writes it with the overlay drawn on.
    pub fn execute(
        &mut self,
        output_path: Option<&Path>,
    ) -> Result<LightingReading, Box<dyn std::error::Error>> {
        let frame = self.source.read();
        self.source.release();
        let mut frame = frame?.ok_or("No frames in image")?;

        let reading = self.estimator.estimate(&frame);

        if let Some(path) = output_path {
            self.renderer.render_reading(&mut frame, &reading);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            frame.into_rgb_image().save(path)?;
        }

        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_locator::FaceLocator;
    use crate::lighting::domain::lighting_label::LightingLabel;
    use crate::lighting::domain::lighting_reading::MeasurementScope;
    use crate::shared::frame::Frame;
    use crate::shared::region::FaceRegion;
    use image::GrayImage;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // --- Stubs ---

    struct StubSource {
        frame: Option<Frame>,
        releases: Arc<Mutex<usize>>,
    }

    impl StubSource {
        fn new(frame: Option<Frame>) -> Self {
            Self {
                frame,
                releases: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl FrameSource for StubSource {
        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            Ok(self.frame.take())
        }

        fn release(&mut self) {
            *self.releases.lock().unwrap() += 1;
        }
    }

    struct FixedFaces(Vec<FaceRegion>);

    impl FaceLocator for FixedFaces {
        fn locate(&mut self, _gray: &GrayImage) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
            Ok(self.0.clone())
        }
    }

    fn build(frame: Option<Frame>, faces: Vec<FaceRegion>) -> (AnnotateImageUseCase, Arc<Mutex<usize>>) {
        let source = StubSource::new(frame);
        let releases = source.releases.clone();
        let use_case = AnnotateImageUseCase::new(
            Box::new(source),
            LightingEstimator::new(Box::new(FixedFaces(faces))),
            OverlayRenderer::default(),
        );
        (use_case, releases)
    }

    // --- Tests ---

    #[test]
    fn test_estimates_without_writing() {
        let (mut use_case, releases) = build(Some(Frame::filled(300, 200, [255, 255, 255])), vec![]);

        let reading = use_case.execute(None).unwrap();

        assert_eq!(reading.label, LightingLabel::Bright);
        assert_eq!(reading.scope, MeasurementScope::Scene);
        assert_eq!(*releases.lock().unwrap(), 1);
    }

    #[test]
    fn test_writes_annotated_image() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("nested").join("out.png");
        let face = FaceRegion::new(10, 10, 60, 60);
        let (mut use_case, _) = build(Some(Frame::filled(300, 200, [128, 128, 128])), vec![face]);

        let reading = use_case.execute(Some(&output)).unwrap();
        assert_eq!(reading.label, LightingLabel::WellLit);

        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (300, 200));
        // Inside the bar: top at h - 100, left at 50.
        assert_eq!(written.get_pixel(55, 110).0, LightingLabel::WellLit.bar_color().0);
        // Far from the overlay the pixels are untouched.
        assert_eq!(written.get_pixel(290, 5).0, [128, 128, 128]);
    }

    #[test]
    fn test_empty_source_is_an_error_and_releases() {
        let (mut use_case, releases) = build(None, vec![]);

        let err = use_case.execute(None).unwrap_err();

        assert!(err.to_string().contains("No frames"));
        assert_eq!(*releases.lock().unwrap(), 1);
    }
}
