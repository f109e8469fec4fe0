//! Block partitioning shared by the block-based transforms.
//!
//! The frame is split into horizontal bands one block tall; bands are processed
//! in parallel and blocks within a band left to right. The last row and column
//! of blocks are clipped to the frame bounds.

use rayon::prelude::*;

use crate::video::types::{Frame, CHANNELS};

/// One block of a frame, clipped to the frame bounds
///
/// Coordinates passed to the accessors are relative to the block's top-left corner.
pub struct Block<'a> {
    band: &'a mut [u8],
    row_bytes: usize,
    x0: usize,
    pub width: usize,
    pub height: usize,
}

impl<'a> Block<'a> {
    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.row_bytes + (self.x0 + x) * CHANNELS
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = self.offset(x, y);
        &self.band[offset..offset + CHANNELS]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let offset = self.offset(x, y);
        &mut self.band[offset..offset + CHANNELS]
    }

    /// Number of in-bounds pixels
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Visit every in-bounds pixel, row by row
    pub fn for_each_pixel(&self, mut f: impl FnMut(usize, usize, &[u8])) {
        for y in 0..self.height {
            for x in 0..self.width {
                f(x, y, self.pixel(x, y));
            }
        }
    }

    /// Mutably visit every in-bounds pixel, row by row
    pub fn for_each_pixel_mut(&mut self, mut f: impl FnMut(usize, usize, &mut [u8])) {
        for y in 0..self.height {
            for x in 0..self.width {
                f(x, y, self.pixel_mut(x, y));
            }
        }
    }
}

/// Run `f` on every `block_size` square block of the frame
pub fn par_for_each_block<F>(frame: &mut Frame, block_size: usize, f: F)
where
    F: Fn(&mut Block<'_>) + Send + Sync,
{
    let block_size = block_size.max(1);
    let width = frame.width() as usize;
    let row_bytes = frame.row_bytes();

    frame
        .pixels_mut()
        .par_chunks_mut(row_bytes * block_size)
        .for_each(|band| {
            let height = band.len() / row_bytes;
            for x0 in (0..width).step_by(block_size) {
                let mut block = Block {
                    band: &mut *band,
                    row_bytes,
                    x0,
                    width: block_size.min(width - x0),
                    height,
                };
                f(&mut block);
            }
        });
}
