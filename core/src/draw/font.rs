//! 8x8 bitmap font atlases
//!
//! Each atlas is a single column of 256 glyphs, 8 pixels wide. Rows 0-127
//! hold basic Latin, rows 128-223 hold hiragana, the rest are blank.

use font8x8::legacy::{BASIC_LEGACY, HIRAGANA_LEGACY};

use crate::framebuffer::{Color, Surface};

/// Glyph edge length in atlas pixels
pub const GLYPH_SIZE: u32 = 8;
/// Number of glyph rows per atlas
pub const GLYPH_COUNT: u32 = 256;

const HIRAGANA_START: usize = 128;

/// Text rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontMode {
    BlackOnWhite = 0,
    WhiteOnBlack = 1,
    Black = 2,
    White = 3,
}

impl FontMode {
    pub fn from_raw(mode: i32) -> Option<Self> {
        match mode {
            0 => Some(FontMode::BlackOnWhite),
            1 => Some(FontMode::WhiteOnBlack),
            2 => Some(FontMode::Black),
            3 => Some(FontMode::White),
            _ => None,
        }
    }

    /// (ink, background) colors for this mode
    fn colors(self) -> (Color, Color) {
        match self {
            FontMode::BlackOnWhite => (Color::BLACK, Color::WHITE),
            FontMode::WhiteOnBlack => (Color::WHITE, Color::BLACK),
            FontMode::Black => (Color::BLACK, Color::TRANSPARENT),
            FontMode::White => (Color::WHITE, Color::TRANSPARENT),
        }
    }
}

/// The four prebuilt glyph atlases, one per [`FontMode`]
#[derive(Debug, Clone)]
pub struct FontAtlas {
    atlases: [Surface; 4],
}

impl FontAtlas {
    pub fn new() -> Self {
        Self {
            atlases: [
                build_atlas(FontMode::BlackOnWhite),
                build_atlas(FontMode::WhiteOnBlack),
                build_atlas(FontMode::Black),
                build_atlas(FontMode::White),
            ],
        }
    }

    pub fn atlas(&self, mode: FontMode) -> &Surface {
        &self.atlases[mode as usize]
    }
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

fn glyph_bits(index: usize) -> [u8; 8] {
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else if let Some(glyph) = index
        .checked_sub(HIRAGANA_START)
        .and_then(|i| HIRAGANA_LEGACY.get(i))
    {
        *glyph
    } else {
        [0; 8]
    }
}

fn build_atlas(mode: FontMode) -> Surface {
    let (ink, background) = mode.colors();
    let mut surface = Surface::new(GLYPH_SIZE, GLYPH_SIZE * GLYPH_COUNT);
    surface.fill(background);

    for index in 0..GLYPH_COUNT as usize {
        let bits = glyph_bits(index);
        for (row, line) in bits.iter().enumerate() {
            for col in 0..GLYPH_SIZE as usize {
                // Bit 0 is the leftmost column
                if line & (1 << col) != 0 {
                    surface.set_pixel(col as i32, (index * 8 + row) as i32, ink);
                }
            }
        }
    }
    surface
}
