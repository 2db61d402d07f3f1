pub mod camera_source;
pub mod image_file_source;
pub mod video_file_source;
