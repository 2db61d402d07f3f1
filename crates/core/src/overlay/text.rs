use font8x8::legacy::BASIC_LEGACY;
use image::{GenericImage, GenericImageView, Rgb};

/// Glyph cell edge in font pixels.
pub const GLYPH_SIZE: u32 = 8;

/// Draws ASCII `text` with the 8x8 bitmap font, each font pixel blown up
/// to a `scale` x `scale` block.
///
/// `(x, baseline)` is the bottom-left corner of the first glyph cell.
/// Pixels that fall outside the canvas are skipped; non-ASCII characters
/// render as blanks.
pub fn draw_text<I>(canvas: &mut I, x: i32, baseline: i32, scale: u32, color: Rgb<u8>, text: &str)
where
    I: GenericImage<Pixel = Rgb<u8>>,
{
    let scale = scale.max(1) as i32;
    let cell = GLYPH_SIZE as i32 * scale;
    let top = baseline - cell;

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = BASIC_LEGACY.get(ch as usize) else {
            continue;
        };
        let left = x + i as i32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                fill_block(
                    canvas,
                    left + col as i32 * scale,
                    top + row as i32 * scale,
                    scale,
                    color,
                );
            }
        }
    }
}

fn fill_block<I>(canvas: &mut I, x: i32, y: i32, size: i32, color: Rgb<u8>)
where
    I: GenericImage<Pixel = Rgb<u8>>,
{
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    for py in y.max(0)..(y + size).min(h) {
        for px in x.max(0)..(x + size).min(w) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn lit_pixels(img: &RgbImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| **p == WHITE)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_text_stays_inside_glyph_cells() {
        let mut img = RgbImage::new(100, 40);
        draw_text(&mut img, 10, 30, 2, WHITE, "Hi");
        let lit = lit_pixels(&img);
        assert!(!lit.is_empty());
        for (x, y) in lit {
            assert!((10..10 + 32).contains(&x), "x={x}");
            assert!((14..30).contains(&y), "y={y}");
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut img = RgbImage::new(40, 40);
        draw_text(&mut img, 0, 20, 1, WHITE, "   ");
        assert!(lit_pixels(&img).is_empty());
    }

    #[test]
    fn test_text_clipped_at_canvas_edge() {
        let mut img = RgbImage::new(20, 10);
        draw_text(&mut img, 12, 12, 3, WHITE, "Lighting");
        draw_text(&mut img, -30, 5, 3, WHITE, "Lighting");
        // No panic, and nothing outside the canvas to check.
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_non_ascii_is_blank() {
        let mut img = RgbImage::new(40, 20);
        draw_text(&mut img, 0, 16, 1, WHITE, "é");
        assert!(lit_pixels(&img).is_empty());
    }
}
