use std::time::Duration;

use crate::display::domain::display_surface::{DisplayEvent, DisplaySurface};
use crate::shared::frame::Frame;

/// Display stand-in for machines without a screen.
///
/// Frames are counted and dropped; no input ever arrives, so a run only
/// stops at end of stream or a frame limit.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    shown: usize,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> usize {
        self.shown
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        self.shown += 1;
        Ok(())
    }

    fn poll_event(&mut self, _timeout: Duration) -> Option<DisplayEvent> {
        None
    }

    fn close(&mut self) {}
}
