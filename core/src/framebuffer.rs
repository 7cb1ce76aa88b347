//! Software RGBA surfaces
//!
//! The frame buffer, the sprite sheet, the glyph atlases and every capture
//! slot are all [`Surface`]s. Drawing is plain nearest-neighbour blitting
//! with clipping; nothing here talks to the GPU.

use std::collections::TryReserveError;

use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel, laid out as it is in memory
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Sprite sheet transparency key
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build an opaque color from script integers, clamping each channel to 0..=255
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        let c = |v: i32| v.clamp(0, 255) as u8;
        Self::rgb(c(r), c(g), c(b))
    }

    fn same_rgb(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Intersection with `0..width` × `0..height`, as half-open ranges
    fn clip(&self, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.x.saturating_add(self.w).min(width as i32);
        let y1 = self.y.saturating_add(self.h).min(height as i32);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Dense RGBA pixel grid
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    /// Pixels matching this color (RGB only) are skipped when this surface
    /// is the source of a blit
    color_key: Option<Color>,
}

impl Surface {
    /// Create a surface filled with opaque black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
            color_key: None,
        }
    }

    /// Fallible variant of [`Surface::new`] for bulk allocations
    pub fn try_new(width: u32, height: u32) -> Result<Self, TryReserveError> {
        let len = (width * height) as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, Color::BLACK);
        Ok(Self {
            width,
            height,
            pixels,
            color_key: None,
        })
    }

    /// Wrap tightly packed RGBA8 bytes; returns `None` on a size mismatch
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: bytemuck::cast_slice(bytes).to_vec(),
            color_key: None,
        })
    }

    pub fn with_color_key(mut self, key: Color) -> Self {
        self.color_key = Some(key);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[(y as u32 * self.width + x as u32) as usize])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = rect.clip(self.width, self.height) else {
            return;
        };
        for y in y0..y1 {
            let row = (y as u32 * self.width) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Nearest-neighbour scaled copy of `src_rect` from `src` into `dst_rect`.
    ///
    /// Clipped against both surfaces. Source pixels that match the source's
    /// color key or have zero alpha are skipped.
    pub fn blit_scaled(&mut self, src: &Surface, src_rect: Rect, dst_rect: Rect) {
        if src_rect.is_empty() || dst_rect.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = dst_rect.clip(self.width, self.height) else {
            return;
        };

        for dy in y0..y1 {
            let sy = src_rect.y as i64
                + (dy as i64 - dst_rect.y as i64) * src_rect.h as i64 / dst_rect.h as i64;
            if sy < 0 || sy >= src.height as i64 {
                continue;
            }
            let src_row = sy as usize * src.width as usize;
            let dst_row = (dy as u32 * self.width) as usize;

            for dx in x0..x1 {
                let sx = src_rect.x as i64
                    + (dx as i64 - dst_rect.x as i64) * src_rect.w as i64 / dst_rect.w as i64;
                if sx < 0 || sx >= src.width as i64 {
                    continue;
                }
                let color = src.pixels[src_row + sx as usize];
                if color.a == 0 || src.color_key.is_some_and(|key| color.same_rgb(key)) {
                    continue;
                }
                self.pixels[dst_row + dx as usize] = color;
            }
        }
    }

    /// Copy every pixel of a same-sized surface
    pub fn copy_from(&mut self, other: &Surface) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        }
    }

    /// Blend a same-sized surface over this one with constant opacity
    pub fn blend_over(&mut self, top: &Surface, alpha: u8) {
        if self.width != top.width || self.height != top.height {
            return;
        }
        let a = alpha as u32;
        let mix = |d: u8, s: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
        for (dst, src) in self.pixels.iter_mut().zip(&top.pixels) {
            dst.r = mix(dst.r, src.r);
            dst.g = mix(dst.g, src.g);
            dst.b = mix(dst.b, src.b);
            dst.a = 255;
        }
    }

    /// Nearest-neighbour integer upscale into tightly packed RGBA8 rows.
    ///
    /// `out` must hold `width * factor` by `height * factor` pixels; returns
    /// false and leaves `out` untouched otherwise.
    pub fn scale_into(&self, factor: u32, out: &mut [u8]) -> bool {
        let factor = factor as usize;
        let row_bytes = self.width as usize * factor * 4;
        if row_bytes == 0 || out.len() != row_bytes * self.height as usize * factor {
            return false;
        }
        for (src_row, block) in self
            .pixels
            .chunks_exact(self.width as usize)
            .zip(out.chunks_exact_mut(row_bytes * factor))
        {
            let (first, rest) = block.split_at_mut(row_bytes);
            for (color, dst) in src_row.iter().zip(first.chunks_exact_mut(4 * factor)) {
                for px in dst.chunks_exact_mut(4) {
                    px.copy_from_slice(bytemuck::bytes_of(color));
                }
            }
            for copy in rest.chunks_exact_mut(row_bytes) {
                copy.copy_from_slice(first);
            }
        }
        true
    }
}
