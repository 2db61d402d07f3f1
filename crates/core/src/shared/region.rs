/// A detected face rectangle in frame pixel coordinates.
///
/// Produced fresh for every frame by the face locator and never carried
/// across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels. Negative extents count as zero.
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Picks the region with the largest area.
    ///
    /// Equal areas resolve to the region that appears first in `regions`,
    /// i.e. detector output order.
    pub fn largest(regions: &[FaceRegion]) -> Option<&FaceRegion> {
        regions
            .iter()
            .fold(None, |best: Option<&FaceRegion>, r| match best {
                Some(b) if b.area() >= r.area() => Some(b),
                _ => Some(r),
            })
    }

    /// Intersects the rectangle with a `frame_width` x `frame_height` frame.
    ///
    /// Returns `(x0, y0, x1, y1)` as half-open pixel bounds; an empty
    /// intersection yields `x0 == x1` or `y0 == y1`.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> (usize, usize, usize, usize) {
        let fw = frame_width as i64;
        let fh = frame_height as i64;
        let x0 = (self.x as i64).clamp(0, fw);
        let y0 = (self.y as i64).clamp(0, fh);
        let x1 = (self.x as i64 + self.width.max(0) as i64).clamp(x0, fw);
        let y1 = (self.y as i64 + self.height.max(0) as i64).clamp(y0, fh);
        (x0 as usize, y0 as usize, x1 as usize, y1 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn region(x: i32, y: i32, w: i32, h: i32) -> FaceRegion {
        FaceRegion::new(x, y, w, h)
    }

    // ── Area ─────────────────────────────────────────────────────────

    #[test]
    fn test_area() {
        assert_eq!(region(0, 0, 40, 30).area(), 1200);
    }

    #[rstest]
    #[case::zero_width(region(0, 0, 0, 100))]
    #[case::zero_height(region(0, 0, 100, 0))]
    #[case::negative_width(region(0, 0, -5, 100))]
    fn test_area_degenerate(#[case] r: FaceRegion) {
        assert_eq!(r.area(), 0);
    }

    // ── Largest selection ────────────────────────────────────────────

    #[test]
    fn test_largest_empty() {
        assert!(FaceRegion::largest(&[]).is_none());
    }

    #[rstest]
    #[case::middle(vec![region(0, 0, 40, 40), region(5, 5, 100, 100), region(9, 9, 10, 10)])]
    #[case::first(vec![region(5, 5, 100, 100), region(0, 0, 40, 40), region(9, 9, 10, 10)])]
    #[case::last(vec![region(9, 9, 10, 10), region(0, 0, 40, 40), region(5, 5, 100, 100)])]
    fn test_largest_independent_of_order(#[case] regions: Vec<FaceRegion>) {
        let best = FaceRegion::largest(&regions).unwrap();
        assert_eq!(*best, region(5, 5, 100, 100));
    }

    #[test]
    fn test_largest_tie_keeps_first() {
        let regions = vec![region(0, 0, 20, 50), region(100, 100, 50, 20), region(7, 7, 10, 10)];
        let best = FaceRegion::largest(&regions).unwrap();
        assert_eq!(*best, regions[0]);
    }

    // ── Clamping ─────────────────────────────────────────────────────

    #[test]
    fn test_clamp_inside_frame_unchanged() {
        assert_eq!(region(10, 20, 30, 40).clamp_to(100, 100), (10, 20, 40, 60));
    }

    #[test]
    fn test_clamp_overhanging_edges() {
        assert_eq!(region(-10, 90, 30, 40).clamp_to(100, 100), (0, 90, 20, 100));
    }

    #[test]
    fn test_clamp_fully_outside_is_empty() {
        let (x0, y0, x1, y1) = region(150, 150, 10, 10).clamp_to(100, 100);
        assert_eq!(x0, x1);
        assert_eq!(y0, y1);
    }
}
