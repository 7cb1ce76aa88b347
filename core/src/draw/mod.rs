//! Primitive drawing library
//!
//! Stateless operations against the frame buffer. Every primitive clips
//! silently; none of them can fail.

pub mod font;


pub use font::{FontAtlas, FontMode};

use crate::framebuffer::{Color, Rect, Surface};

/// Edge length of a sprite cell and of an unscaled square
pub const SPRITE_SIZE: i32 = 16;
/// Sprite sheet cells per row and per column
pub const SHEET_CELLS: i32 = 8;
/// Sprite sheet edge length in pixels
pub const SHEET_SIZE: u32 = (SPRITE_SIZE * SHEET_CELLS) as u32;

/// Rectangle of a scaled 16x16 object centered on (x, y)
fn centered(x: i32, y: i32, scale: f64) -> Rect {
    let side = (SPRITE_SIZE as f64 * scale) as i32;
    Rect::new(
        x.saturating_sub(side / 2),
        y.saturating_sub(side / 2),
        side,
        side,
    )
}

/// Fill the whole frame buffer
pub fn clear(target: &mut Surface, color: Color) {
    target.fill(color);
}

/// Top-left anchored filled rectangle
pub fn rectangle(target: &mut Surface, x: i32, y: i32, w: i32, h: i32, color: Color) {
    target.fill_rect(Rect::new(x, y, w, h), color);
}

/// Filled 16x16 square, scaled and centered on (x, y)
pub fn square(target: &mut Surface, x: i32, y: i32, scale: f64, color: Color) {
    target.fill_rect(centered(x, y, scale), color);
}

/// Sprite sheet cell, scaled and centered on (x, y).
///
/// Cells outside the 8x8 sheet grid draw nothing.
pub fn sprite(
    target: &mut Surface,
    sheet: &Surface,
    x: i32,
    y: i32,
    scale: f64,
    sheet_x: i32,
    sheet_y: i32,
) {
    if !(0..SHEET_CELLS).contains(&sheet_x) || !(0..SHEET_CELLS).contains(&sheet_y) {
        return;
    }
    let src = Rect::new(
        sheet_x * SPRITE_SIZE,
        sheet_y * SPRITE_SIZE,
        SPRITE_SIZE,
        SPRITE_SIZE,
    );
    target.blit_scaled(sheet, src, centered(x, y, scale));
}

/// Draw raw text bytes starting at (x, y).
///
/// Each byte selects one glyph row of the atlas; `\n` returns to the
/// starting column on the next line and a NUL byte ends the text.
pub fn text(
    target: &mut Surface,
    font: &FontAtlas,
    bytes: &[u8],
    x: i32,
    y: i32,
    scale: f64,
    mode: i32,
) {
    let Some(mode) = FontMode::from_raw(mode) else {
        return;
    };
    let atlas = font.atlas(mode);
    let glyph = font::GLYPH_SIZE as f64;
    let size = (glyph * scale) as i32;

    let mut col = 0u32;
    let mut row = 0u32;
    for &byte in bytes {
        match byte {
            0 => break,
            b'\n' => {
                col = 0;
                row += 1;
            }
            _ => {
                let src = Rect::new(0, byte as i32 * font::GLYPH_SIZE as i32, 8, 8);
                let dst = Rect::new(
                    x.saturating_add((col as f64 * glyph * scale) as i32),
                    y.saturating_add((row as f64 * glyph * scale) as i32),
                    size,
                    size,
                );
                target.blit_scaled(atlas, src, dst);
                col += 1;
            }
        }
    }
}

/// Overlap test for two scaled 16x16 squares given by their centers.
///
/// Edges that merely touch do not collide.
pub fn collide_squares(x1: f64, y1: f64, s1: f64, x2: f64, y2: f64, s2: f64) -> bool {
    let half = SPRITE_SIZE as f64 / 2.0;
    let (h1, h2) = (half * s1, half * s2);
    x1 - h1 < x2 + h2 && x1 + h1 > x2 - h2 && y1 - h1 < y2 + h2 && y1 + h1 > y2 - h2
}
