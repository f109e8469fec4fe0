use rayon::prelude::*;

use crate::video::types::{Frame, CHANNELS};

/// Final post-step before presentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compositor {
    pub mirror: bool,
}

impl Compositor {
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }

    pub fn apply(&self, frame: &mut Frame) {
        if self.mirror {
            mirror_horizontal(frame);
        }
    }
}

/// Reflect every row in place: column `x` becomes column `width - 1 - x`
///
/// Each pixel pair is swapped exactly once; an odd middle column stays put.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width() as usize;
    let row_bytes = frame.row_bytes();

    frame.pixels_mut().par_chunks_mut(row_bytes).for_each(|row| {
        for x in 0..width / 2 {
            let left = x * CHANNELS;
            let right = (width - 1 - x) * CHANNELS;
            for channel in 0..CHANNELS {
                row.swap(left + channel, right + channel);
            }
        }
    });
}
