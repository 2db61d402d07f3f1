use image::Rgb;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::lighting::domain::lighting_label::LightingLabel;
use crate::lighting::domain::lighting_reading::LightingReading;
use crate::shared::frame::Frame;

use super::text;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Placement of the brightness bar and caption, measured from the
/// bottom-left corner of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    pub left: i32,
    pub bar_max_width: u32,
    pub bar_height: u32,
    /// Distance from the bottom edge to the top of the bar.
    pub bar_bottom_offset: i32,
    /// Distance from the bottom edge to the caption baseline.
    pub text_bottom_offset: i32,
    pub text_scale: u32,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            left: 50,
            bar_max_width: 200,
            bar_height: 20,
            bar_bottom_offset: 100,
            text_bottom_offset: 110,
            text_scale: 2,
        }
    }
}

/// Draws the lighting bar and caption onto a frame in place.
///
/// Only the bar rectangle and the caption glyphs are written; all other
/// pixels are left untouched.
#[derive(Clone, Debug, Default)]
pub struct OverlayRenderer {
    layout: OverlayLayout,
}

impl OverlayRenderer {
    pub fn render_reading(&self, frame: &mut Frame, reading: &LightingReading) {
        self.render(frame, reading.label, reading.brightness);
    }

    pub fn render(&self, frame: &mut Frame, label: LightingLabel, brightness: f64) {
        self.draw(frame, label.as_str(), label.bar_color(), brightness);
    }

    /// Pixel length of the bar for `brightness`, capped at the layout width.
    pub fn bar_width(&self, brightness: f64) -> u32 {
        let fraction = (brightness / 255.0).clamp(0.0, 1.0);
        if fraction.is_nan() {
            return 0;
        }
        (fraction * self.layout.bar_max_width as f64) as u32
    }

    fn draw(&self, frame: &mut Frame, label: &str, bar_color: Rgb<u8>, brightness: f64) {
        if frame.is_empty() {
            return;
        }
        let height = frame.height() as i32;
        let layout = &self.layout;
        let width = self.bar_width(brightness);
        let mut canvas = frame.as_rgb_image_mut();

        if width > 0 && layout.bar_height > 0 {
            let bar = Rect::at(layout.left, height - layout.bar_bottom_offset)
                .of_size(width, layout.bar_height);
            draw_filled_rect_mut(&mut canvas, bar, bar_color);
        }

        let caption = caption(label, brightness);
        text::draw_text(
            &mut canvas,
            layout.left,
            height - layout.text_bottom_offset,
            layout.text_scale,
            TEXT_COLOR,
            &caption,
        );
    }
}

pub fn caption(label: &str, brightness: f64) -> String {
    format!("Lighting: {label} ({brightness:.2})")
}
