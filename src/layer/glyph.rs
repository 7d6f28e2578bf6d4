//! Glyph rasterization and compositing.
//!
//! Text is drawn from the 8x8 `font8x8` ASCII bitmaps. The set bits of every
//! glyph are merged into a single SVG path of unit squares, which resvg
//! renders antialiased at any scale. The result is composited onto a
//! rendition with source-over blending.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::color::ColorSpec;
use crate::error::RenderError;

/// Width and height of one glyph cell, in font units.
pub const CELL_SIZE: u32 = 8;

// ============================================================================
// Outlines
// ============================================================================

/// Bounding box of the set bits of a text run, in font units.
///
/// `x1` and `y1` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl InkBox {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    fn include(&mut self, x0: u32, x1: u32, y: u32) {
        self.x0 = self.x0.min(x0);
        self.x1 = self.x1.max(x1);
        self.y0 = self.y0.min(y);
        self.y1 = self.y1.max(y + 1);
    }
}

/// The outline of a text run laid out on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOutline {
    /// SVG path data in font units.
    pub path: String,
    /// Total advance of the run, in font units.
    pub advance: u32,
    /// Ink bounds, or `None` if the text has no visible pixels.
    pub ink: Option<InkBox>,
}

/// Returns the 8x8 bitmap of a character. Row `i` is byte `i`; bit `j` of a
/// row is column `j` from the left.
pub fn glyph_rows(c: char) -> Result<[u8; 8], RenderError> {
    BASIC_FONTS
        .get(c)
        .ok_or(RenderError::UnsupportedCharacter(c))
}

/// Lays out `text` on one line and builds its outline.
///
/// Horizontal runs of set bits become one rectangle each, so the path stays
/// small even for large glyph counts.
pub fn outline_text(text: &str) -> Result<TextOutline, RenderError> {
    let mut path = String::new();
    let mut ink: Option<InkBox> = None;
    let mut advance = 0;

    for c in text.chars() {
        let rows = glyph_rows(c)?;
        for (y, row) in (0u32..).zip(rows) {
            let mut x = 0;
            while x < CELL_SIZE {
                if row & (1 << x) == 0 {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < CELL_SIZE && row & (1 << x) != 0 {
                    x += 1;
                }
                let (x0, x1) = (advance + start, advance + x);
                path.push_str(&format!("M{x0} {y}H{x1}V{}H{x0}Z", y + 1));
                match ink.as_mut() {
                    Some(bounds) => bounds.include(x0, x1, y),
                    None => {
                        ink = Some(InkBox {
                            x0,
                            y0: y,
                            x1,
                            y1: y + 1,
                        })
                    }
                }
            }
        }
        advance += CELL_SIZE;
    }

    Ok(TextOutline { path, advance, ink })
}

// ============================================================================
// Rasterization
// ============================================================================

/// Renders an outline onto a transparent `width x height` layer.
///
/// Font units are scaled by `unit` and then moved by `(dx, dy)` pixels.
/// Partial coverage from antialiasing lowers the alpha of `color`; the color
/// channels stay exact.
pub fn rasterize(
    outline: &TextOutline,
    width: u32,
    height: u32,
    unit: f32,
    dx: f32,
    dy: f32,
    color: ColorSpec,
) -> Result<RgbaImage, RenderError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;

    if outline.ink.is_some() {
        let advance = outline.advance.max(1);
        let cell = CELL_SIZE;
        let svg_data = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{advance}" height="{cell}" viewBox="0 0 {advance} {cell}"><path fill="#000000" d="{}"/></svg>"##,
            outline.path
        );

        let opts = Options::default();
        let tree =
            Tree::from_str(&svg_data, &opts).map_err(|e| RenderError::Outline(e.to_string()))?;
        let transform = Transform::from_row(unit, 0.0, 0.0, unit, dx, dy);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
    }

    Ok(coverage_to_rgba_image(&pixmap, color))
}

/// Converts the coverage of a pixmap to an image filled with `color`.
fn coverage_to_rgba_image(pixmap: &Pixmap, color: ColorSpec) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, coverage) in img.pixels_mut().zip(pixmap.pixels()) {
        let coverage = coverage.alpha();
        if coverage == 0 {
            continue;
        }
        let alpha = (coverage as f32 * color.a as f32 / 255.0).round() as u8;
        *pixel = Rgba([color.r, color.g, color.b, alpha]);
    }
    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Destination
/// pixels under fully transparent source pixels are left bit-exact.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        if src_pixel[3] == 0 {
            continue;
        }
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
        let blended = alpha_blend(*src_pixel, *dst_pixel);
        dest.put_pixel(dx as u32, dy as u32, blended);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        // Never below the destination alpha.
        ((out_a * 255.0).round() as u8).max(dst[3]),
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup() {
        assert_eq!(glyph_rows(' ').unwrap(), [0; 8]);
        assert_ne!(glyph_rows('2').unwrap(), [0; 8]);
        assert_eq!(
            glyph_rows('é'),
            Err(RenderError::UnsupportedCharacter('é'))
        );
    }

    #[test]
    fn outline_merges_runs() {
        let outline = outline_text("-").unwrap();
        // font8x8 draws '-' as a single row of six pixels.
        assert_eq!(outline.path.matches('M').count(), 1);
        let ink = outline.ink.unwrap();
        assert_eq!(ink.height(), 1);
        assert_eq!(ink.width(), 6);
        assert_eq!(outline.advance, 8);
    }

    #[test]
    fn outline_spans_all_characters() {
        let one = outline_text("2").unwrap().ink.unwrap();
        let two = outline_text("22").unwrap().ink.unwrap();
        assert_eq!(two.x0, one.x0);
        assert_eq!(two.x1, one.x1 + CELL_SIZE);
        assert_eq!(two.height(), one.height());
    }

    #[test]
    fn blank_text_has_no_ink() {
        let outline = outline_text("  ").unwrap();
        assert!(outline.ink.is_none());
        assert!(outline.path.is_empty());
        let layer = rasterize(&outline, 16, 16, 1.0, 0.0, 0.0, ColorSpec::rgb(0, 0, 0)).unwrap();
        assert!(layer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn rasterize_fills_set_bits() {
        // '-' at unit 4: row 3 of the cell, columns 0..6 -> pixels y 12..16.
        let outline = outline_text("-").unwrap();
        let ink = outline.ink.unwrap();
        let color = ColorSpec::rgb(38, 44, 42);
        let layer = rasterize(&outline, 64, 64, 4.0, 0.0, 0.0, color).unwrap();

        let inside = layer.get_pixel(ink.x0 * 4 + 2, ink.y0 * 4 + 2);
        assert_eq!(inside.0, [38, 44, 42, 255]);
        assert_eq!(layer.get_pixel(60, 60)[3], 0);
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn composite_onto_transparent_keeps_source() {
        let mut dest = RgbaImage::new(4, 4);
        let src = RgbaImage::from_pixel(2, 2, Rgba([38, 44, 42, 200]));
        composite_over(&mut dest, &src, 2, 2);
        assert_eq!(dest.get_pixel(3, 3).0, [38, 44, 42, 200]);
        assert_eq!(dest.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn composite_clips_to_destination() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        composite_over(&mut dest, &src, -2, 3);
        assert_eq!(dest.get_pixel(0, 3).0, [9, 9, 9, 255]);
        assert_eq!(dest.get_pixel(2, 3).0, [1, 2, 3, 4]);
    }
}
