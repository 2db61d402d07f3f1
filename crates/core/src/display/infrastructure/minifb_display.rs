use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::display::domain::display_surface::{DisplayEvent, DisplaySurface};
use crate::shared::frame::{Frame, RGB_CHANNELS};

/// Native window backed by `minifb`.
///
/// The window is created on the first [`show`](DisplaySurface::show) so it
/// can take the frame's size, and recreated if the frame size changes.
pub struct MinifbDisplay {
    title: String,
    window: Option<Window>,
    buffer: Vec<u32>,
    size: (usize, usize),
}

impl MinifbDisplay {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            window: None,
            buffer: Vec::new(),
            size: (0, 0),
        }
    }

    fn window_for(&mut self, width: usize, height: usize) -> Result<&mut Window, minifb::Error> {
        let window = match self.window.take() {
            Some(window) if self.size == (width, height) => window,
            _ => {
                let window = Window::new(&self.title, width, height, WindowOptions::default())?;
                log::debug!("Created {width}x{height} window \"{}\"", self.title);
                self.size = (width, height);
                window
            }
        };
        Ok(self.window.insert(window))
    }

    fn pressed_key(window: &Window) -> Option<DisplayEvent> {
        if !window.is_open() {
            return Some(DisplayEvent::Closed);
        }
        window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .find_map(key_char)
            .map(DisplayEvent::Key)
    }
}

impl DisplaySurface for MinifbDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(());
        }
        let (width, height) = (frame.width() as usize, frame.height() as usize);

        let mut buffer = std::mem::take(&mut self.buffer);
        pack_0rgb(frame.data(), &mut buffer);
        let result = self
            .window_for(width, height)
            .and_then(|window| window.update_with_buffer(&buffer, width, height));
        self.buffer = buffer;
        Ok(result?)
    }

    fn poll_event(&mut self, timeout: Duration) -> Option<DisplayEvent> {
        let window = self.window.as_mut()?;
        // Keys pressed while the frame was being processed are picked up by
        // the last buffer update; only wait if there are none.
        if let Some(event) = Self::pressed_key(window) {
            return Some(event);
        }
        std::thread::sleep(timeout);
        window.update();
        Self::pressed_key(window)
    }

    fn close(&mut self) {
        if self.window.take().is_some() {
            log::debug!("Closed window \"{}\"", self.title);
        }
    }
}

fn key_char(key: Key) -> Option<char> {
    match key {
        Key::Q => Some('q'),
        Key::Escape => Some('\u{1b}'),
        Key::Space => Some(' '),
        _ => None,
    }
}

/// Converts packed RGB24 into minifb's `0x00RRGGBB` words.
fn pack_0rgb(rgb: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        rgb.chunks_exact(RGB_CHANNELS)
            .map(|px| (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32),
    );
}
