//! Luminance grayscale.

use rayon::prelude::*;

use crate::{
    filters::luminance::{luminance, to_channel},
    video::types::{Frame, CHANNELS},
};

pub fn apply(frame: &mut Frame) {
    let row_bytes = frame.row_bytes();
    frame.pixels_mut().par_chunks_mut(row_bytes).for_each(|row| {
        for pixel in row.chunks_exact_mut(CHANNELS) {
            let gray = to_channel(luminance(pixel[0], pixel[1], pixel[2]));
            pixel[0] = gray;
            pixel[1] = gray;
            pixel[2] = gray;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_of(rgba: [u8; 4]) -> [u8; 4] {
        let mut frame = Frame::new_filled(1, 1, rgba).unwrap();
        apply(&mut frame);
        frame.get_pixel(0, 0)
    }

    #[test]
    fn test_primaries() {
        assert_eq!(gray_of([255, 0, 0, 255]), [76, 76, 76, 255]);
        assert_eq!(gray_of([0, 255, 0, 255]), [150, 150, 150, 255]);
        assert_eq!(gray_of([0, 0, 255, 255]), [29, 29, 29, 255]);
        assert_eq!(gray_of([255, 255, 255, 255]), [255, 255, 255, 255]);
        assert_eq!(gray_of([0, 0, 0, 255]), [0, 0, 0, 255]);
    }

    #[test]
    fn test_zero_alpha_still_converted() {
        assert_eq!(gray_of([255, 0, 0, 0]), [76, 76, 76, 0]);
    }
}
