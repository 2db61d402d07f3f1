use std::path::{Path, PathBuf};

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Presents a still image as a one-frame stream.
pub struct ImageFileSource {
    frame: Option<Frame>,
    path: PathBuf,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let image = image::open(path).map_err(|source| CaptureError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            frame: Some(Frame::from_rgb_image(image.to_rgb8(), 0)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        Ok(self.frame.take())
    }

    fn release(&mut self) {
        self.frame = None;
    }
}
