use std::time::Duration;

use crate::shared::frame::Frame;

/// User input observed while polling a display surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    Key(char),
    /// The window was closed by the user.
    Closed,
}

/// A window (or stand-in) that shows annotated frames and reports input.
pub trait DisplaySurface {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits at most `timeout` for input.
    fn poll_event(&mut self, timeout: Duration) -> Option<DisplayEvent>;

    /// Tears down any window. Safe to call more than once.
    fn close(&mut self);
}
