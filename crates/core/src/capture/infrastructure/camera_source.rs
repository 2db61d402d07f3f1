use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Live frames from a local camera via `nokhwa`.
///
/// The stream is opened in [`CameraSource::open`], so a missing or busy
/// device is reported before any frame is requested.
pub struct CameraSource {
    camera: Option<Camera>,
    index: u32,
    frame_index: usize,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self, CaptureError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
            CaptureError::CameraOpen {
                index,
                reason: e.to_string(),
            }
        })?;
        camera
            .open_stream()
            .map_err(|e| CaptureError::StreamStart {
                index,
                reason: e.to_string(),
            })?;

        let resolution = camera.resolution();
        log::info!(
            "Opened camera {index} ({}) at {}x{}",
            camera.info().human_name(),
            resolution.width(),
            resolution.height()
        );

        Ok(Self {
            camera: Some(camera),
            index,
            frame_index: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };

        let buffer = match camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Camera {} stopped delivering frames: {e}", self.index);
                return Ok(None);
            }
        };
        let decoded = match buffer.decode_image::<RgbFormat>() {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Camera {} delivered an undecodable frame: {e}", self.index);
                return Ok(None);
            }
        };

        let (width, height) = (decoded.width(), decoded.height());
        let frame = Frame::new(decoded.into_raw(), width, height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera {}: {e}", self.index);
            }
            log::debug!("Released camera {}", self.index);
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}
