pub const FACE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const FACE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Pyramid step between detection scales.
pub const DEFAULT_SCALE_STEP: f32 = 1.1;
/// Overlapping hits a candidate needs before it counts as a face.
pub const DEFAULT_MIN_NEIGHBORS: u32 = 4;
/// Smallest face the SeetaFace cascade supports.
pub const MIN_FACE_SIZE: u32 = 20;

pub const WINDOW_TITLE: &str = "Lighting Estimation";
pub const EXIT_KEY: char = 'q';
pub const DEFAULT_POLL_MS: u64 = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
