//! Averaging block quantization: each block becomes the rounded mean of its
//! in-bounds pixels, channel by channel.

use serde::{Deserialize, Serialize};

use crate::{config::invalid_value, error::Result, filters::blocks::par_for_each_block, video::types::Frame};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelateParams {
    /// Side of each square block in pixels
    pub block_size: u32,
}

impl Default for PixelateParams {
    fn default() -> Self {
        Self { block_size: 8 }
    }
}

impl PixelateParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > 256 {
            return Err(invalid_value("filters.pixelate.block_size", self.block_size));
        }
        Ok(())
    }
}

pub fn apply(frame: &mut Frame, params: &PixelateParams) {
    par_for_each_block(frame, params.block_size as usize, |block| {
        let mut sums = [0u32; 3];
        block.for_each_pixel(|_, _, pixel| {
            for (sum, &channel) in sums.iter_mut().zip(pixel) {
                *sum += channel as u32;
            }
        });

        let count = block.area() as u32;
        let mean = sums.map(|sum| ((sum + count / 2) / count).min(255) as u8);

        block.for_each_pixel_mut(|_, _, pixel| pixel[..3].copy_from_slice(&mean));
    });
}
