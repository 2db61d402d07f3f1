use ndarray::{s, Array2, ArrayView2};
use palette::{FromColor, Lab, Srgb};

use crate::shared::frame::{Frame, RGB_CHANNELS};
use crate::shared::region::FaceRegion;

/// Per-pixel CIE L* of a frame, stored on the 8-bit scale (L* * 255 / 100).
///
/// Lightness tracks perceived brightness better than a plain channel
/// average, so every brightness statistic is taken from this plane.
pub struct LuminancePlane {
    values: Array2<u8>,
}

/// Mean and population standard deviation over a set of L samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LuminanceStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl LuminancePlane {
    pub fn from_frame(frame: &Frame) -> Self {
        let shape = (frame.height() as usize, frame.width() as usize);
        let lightness: Vec<u8> = frame
            .data()
            .chunks_exact(RGB_CHANNELS)
            .map(|px| lightness_8bit(px[0], px[1], px[2]))
            .collect();
        let values = Array2::from_shape_vec(shape, lightness)
            .expect("Frame data length must match dimensions");
        Self { values }
    }

    pub fn stats(&self) -> LuminanceStats {
        LuminanceStats::from_view(self.values.view())
    }

    /// Statistics over `region`, clipped to the plane. A region with no
    /// visible pixels yields zeroed statistics.
    pub fn region_stats(&self, region: &FaceRegion) -> LuminanceStats {
        let (rows, cols) = self.values.dim();
        let (x0, y0, x1, y1) = region.clamp_to(cols as u32, rows as u32);
        LuminanceStats::from_view(self.values.slice(s![y0..y1, x0..x1]))
    }
}

impl LuminanceStats {
    pub fn from_view(view: ArrayView2<'_, u8>) -> Self {
        let samples = view.mapv(f64::from);
        let Some(mean) = samples.mean() else {
            return Self::default();
        };
        Self {
            mean,
            std_dev: samples.std(0.0),
        }
    }
}

/// sRGB pixel to L* rescaled to 0..=255 and rounded.
pub fn lightness_8bit(r: u8, g: u8, b: u8) -> u8 {
    let lab: Lab = Lab::from_color(Srgb::new(r, g, b).into_format::<f32>());
    (lab.l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
}
