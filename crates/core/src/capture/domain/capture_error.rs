use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open camera {index}: {reason}")]
    CameraOpen { index: u32, reason: String },
    #[error("failed to start camera {index} stream: {reason}")]
    StreamStart { index: u32, reason: String },
    #[error("no video stream found in {0}")]
    NoVideoStream(PathBuf),
    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
