use std::fmt;

use image::Rgb;

/// Bar color for labels missing from the color map.
pub const DEFAULT_BAR_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Every classification the estimator can produce.
///
/// The first four come from whole-frame measurement, the last four from
/// measurement over a detected face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightingLabel {
    Dark,
    LowLight,
    Moderate,
    Bright,
    PoorlyLitFace,
    SoftLighting,
    WellLit,
    BrightDirectLight,
}

impl LightingLabel {
    pub const ALL: [LightingLabel; 8] = [
        LightingLabel::Dark,
        LightingLabel::LowLight,
        LightingLabel::Moderate,
        LightingLabel::Bright,
        LightingLabel::PoorlyLitFace,
        LightingLabel::SoftLighting,
        LightingLabel::WellLit,
        LightingLabel::BrightDirectLight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LightingLabel::Dark => "Dark",
            LightingLabel::LowLight => "Low Light",
            LightingLabel::Moderate => "Moderate",
            LightingLabel::Bright => "Bright",
            LightingLabel::PoorlyLitFace => "Poorly Lit Face",
            LightingLabel::SoftLighting => "Soft Lighting",
            LightingLabel::WellLit => "Well Lit",
            LightingLabel::BrightDirectLight => "Bright Direct Light",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == name)
    }

    /// Overlay bar color (RGB).
    pub fn bar_color(&self) -> Rgb<u8> {
        match self {
            LightingLabel::Dark => Rgb([100, 0, 0]),
            LightingLabel::LowLight => Rgb([200, 100, 0]),
            LightingLabel::Moderate => Rgb([200, 200, 0]),
            LightingLabel::Bright => Rgb([0, 0, 255]),
            LightingLabel::PoorlyLitFace => Rgb([255, 0, 0]),
            LightingLabel::SoftLighting => Rgb([0, 200, 100]),
            LightingLabel::WellLit => Rgb([0, 255, 0]),
            LightingLabel::BrightDirectLight => Rgb([0, 255, 255]),
        }
    }
}

impl fmt::Display for LightingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color lookup by label text; unknown names get [`DEFAULT_BAR_COLOR`].
pub fn bar_color_for_name(name: &str) -> Rgb<u8> {
    LightingLabel::from_name(name)
        .map(|label| label.bar_color())
        .unwrap_or(DEFAULT_BAR_COLOR)
}
