use super::lighting_label::LightingLabel;

/// Ordered brightness buckets.
///
/// `bounded` is scanned left to right; the first entry whose upper bound is
/// strictly greater than the mean wins, otherwise `catch_all` applies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationTable {
    pub bounded: [(f64, LightingLabel); 3],
    pub catch_all: LightingLabel,
}

/// Whole-frame buckets, used when no face is found.
pub const SCENE_TABLE: ClassificationTable = ClassificationTable {
    bounded: [
        (50.0, LightingLabel::Dark),
        (100.0, LightingLabel::LowLight),
        (150.0, LightingLabel::Moderate),
    ],
    catch_all: LightingLabel::Bright,
};

/// Face buckets. Same bounds as [`SCENE_TABLE`], face vocabulary.
pub const FACE_TABLE: ClassificationTable = ClassificationTable {
    bounded: [
        (50.0, LightingLabel::PoorlyLitFace),
        (100.0, LightingLabel::SoftLighting),
        (150.0, LightingLabel::WellLit),
    ],
    catch_all: LightingLabel::BrightDirectLight,
};

impl ClassificationTable {
    pub fn classify(&self, mean: f64) -> LightingLabel {
        self.bounded
            .iter()
            .find(|(upper, _)| mean < *upper)
            .map(|(_, label)| *label)
            .unwrap_or(self.catch_all)
    }
}
