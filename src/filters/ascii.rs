//! Glyph density rendering: every 8x8 block is replaced by the glyph whose ink
//! coverage best matches the block's average brightness.

use serde::{Deserialize, Serialize};

use crate::{
    config::invalid_value,
    error::Result,
    filters::blocks::par_for_each_block,
    filters::luminance::luminance,
    video::types::Frame,
};

/// Glyph cell side in pixels
pub const GLYPH_SIZE: usize = 8;

/// 8x8 glyph bitmaps ordered from emptiest to densest.
/// One byte per row, most significant bit is the leftmost pixel.
pub const GLYPHS: [[u8; GLYPH_SIZE]; 10] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // '.'
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00], // ':'
    [0x00, 0x00, 0x00, 0x7E, 0x7E, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x7E, 0x7E, 0x00, 0x00, 0x7E, 0x7E, 0x00], // '='
    [0x18, 0x18, 0x18, 0xFF, 0xFF, 0x18, 0x18, 0x18], // '+'
    [0x99, 0x5A, 0x3C, 0xFF, 0xFF, 0x3C, 0x5A, 0x99], // '*'
    [0x6C, 0xFE, 0xFE, 0x6C, 0x6C, 0xFE, 0xFE, 0x6C], // '#'
    [0xFB, 0xF7, 0x7E, 0x7E, 0x7E, 0x7E, 0xEF, 0xDF], // '%'
    [0x7E, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7E], // '@'
];

/// Glyph foreground
pub const INK: [u8; 3] = [24, 22, 20];

/// Glyph background
pub const PAPER: [u8; 3] = [236, 230, 214];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiParams {
    /// Subtracted from block luminance before the gain
    pub contrast_offset: f32,

    /// Multiplier applied after the offset
    pub contrast_gain: f32,
}

impl Default for AsciiParams {
    fn default() -> Self {
        Self {
            contrast_offset: 0.2,
            contrast_gain: 1.5,
        }
    }
}

impl AsciiParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.contrast_offset) {
            return Err(invalid_value("filters.ascii.contrast_offset", self.contrast_offset));
        }
        if !(0.1..=10.0).contains(&self.contrast_gain) {
            return Err(invalid_value("filters.ascii.contrast_gain", self.contrast_gain));
        }
        Ok(())
    }
}

/// Contrast stretch of a normalized luminance
#[inline]
pub fn stretch_contrast(luma: f32, params: &AsciiParams) -> f32 {
    ((luma - params.contrast_offset) * params.contrast_gain).clamp(0.0, 1.0)
}

/// Glyph for a normalized brightness: 0 picks the densest, 1 the emptiest
#[inline]
pub fn glyph_index(brightness: f32) -> usize {
    let steps = (GLYPHS.len() - 1) as f32;
    (((1.0 - brightness.clamp(0.0, 1.0)) * steps).floor() as usize).min(GLYPHS.len() - 1)
}

pub fn apply(frame: &mut Frame, params: &AsciiParams) {
    par_for_each_block(frame, GLYPH_SIZE, |block| {
        let mut total = 0.0f32;
        block.for_each_pixel(|_, _, pixel| total += luminance(pixel[0], pixel[1], pixel[2]));
        let average = (total / block.area() as f32 / 255.0).clamp(0.0, 1.0);

        let glyph = &GLYPHS[glyph_index(stretch_contrast(average, params))];

        block.for_each_pixel_mut(|x, y, pixel| {
            let ink = (glyph[y] >> (7 - x)) & 1 == 1;
            pixel[..3].copy_from_slice(if ink { &INK } else { &PAPER });
        });
    });
}
