use crate::shared::frame::Frame;

/// Supplies successive frames from a camera, file or other device.
///
/// `Ok(None)` means the stream is exhausted. The run loop treats an `Err`
/// the same way, as a clean end of stream.
pub trait FrameSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device. Safe to call more than once.
    fn release(&mut self);
}
