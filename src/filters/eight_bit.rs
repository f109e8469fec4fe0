//! 8-bit block quantization: each block takes the palette color nearest to its
//! center pixel, with a darkened top/left seam to mimic an LCD grid.

use serde::{Deserialize, Serialize};

use crate::{
    config::invalid_value,
    error::Result,
    filters::blocks::par_for_each_block,
    filters::luminance::scale_rgb,
    video::types::Frame,
};

/// Fixed retro palette, searched in order
pub const PALETTE: [[u8; 3]; 8] = [
    [0, 0, 0],
    [29, 43, 83],
    [126, 37, 83],
    [0, 135, 81],
    [171, 82, 54],
    [95, 87, 79],
    [194, 195, 199],
    [255, 241, 232],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EightBitParams {
    /// Side of each square block in pixels
    pub block_size: u32,

    /// Channel multiplier for the block seam
    pub seam_factor: f32,
}

impl Default for EightBitParams {
    fn default() -> Self {
        Self {
            block_size: 8,
            seam_factor: 0.15,
        }
    }
}

impl EightBitParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > 256 {
            return Err(invalid_value("filters.eight_bit.block_size", self.block_size));
        }
        if !(0.0..=1.0).contains(&self.seam_factor) {
            return Err(invalid_value("filters.eight_bit.seam_factor", self.seam_factor));
        }
        Ok(())
    }
}

/// Nearest palette entry by Euclidean RGB distance; ties go to the earlier entry
pub fn nearest_palette_color(rgb: [u8; 3]) -> [u8; 3] {
    let mut best = PALETTE[0];
    let mut best_distance = u32::MAX;

    for candidate in PALETTE {
        let distance: u32 = rgb
            .iter()
            .zip(candidate.iter())
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }

    best
}

pub fn apply(frame: &mut Frame, params: &EightBitParams) {
    par_for_each_block(frame, params.block_size as usize, |block| {
        let center = block.pixel(block.width / 2, block.height / 2);
        let color = nearest_palette_color([center[0], center[1], center[2]]);
        let seam = scale_rgb(color, params.seam_factor);

        block.for_each_pixel_mut(|x, y, pixel| {
            let fill = if x == 0 || y == 0 { seam } else { color };
            pixel[..3].copy_from_slice(&fill);
        });
    });
}
