//! Orange & Teal grade: luminance pushed through a logistic contrast curve and
//! mapped onto a five-stop teal-to-orange ramp, with film grain and sparse
//! sensor noise.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::invalid_value,
    error::Result,
    filters::luminance::{normalized_luminance, to_channel},
    video::types::{Frame, CHANNELS},
};

/// Color ramp stops at 0.00 / 0.25 / 0.50 / 0.75 / 1.00
pub const GRADE_STOPS: [[f32; 3]; 5] = [
    [0.0, 46.0, 56.0],    // deep teal
    [0.0, 178.0, 190.0],  // electric teal
    [204.0, 85.0, 0.0],   // burnt orange
    [255.0, 150.0, 40.0], // neon orange
    [255.0, 244.0, 230.0], // near white
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrangeTealParams {
    /// Logistic curve steepness `k`
    pub steepness: f32,

    /// Maximum luminance jitter (±grain)
    pub grain: f32,

    /// Fraction of pixels that receive red/blue sensor noise (0.0-1.0)
    pub noise_fraction: f32,

    /// Largest red/blue perturbation in channel steps
    pub noise_amplitude: u8,
}

impl Default for OrangeTealParams {
    fn default() -> Self {
        Self {
            steepness: 13.0,
            grain: 0.04,
            noise_fraction: 0.02,
            noise_amplitude: 12,
        }
    }
}

impl OrangeTealParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(1.0..=50.0).contains(&self.steepness) {
            return Err(invalid_value("filters.orange_teal.steepness", self.steepness));
        }
        if !(0.0..=0.5).contains(&self.grain) {
            return Err(invalid_value("filters.orange_teal.grain", self.grain));
        }
        if !(0.0..=1.0).contains(&self.noise_fraction) {
            return Err(invalid_value("filters.orange_teal.noise_fraction", self.noise_fraction));
        }
        Ok(())
    }
}

/// Logistic contrast curve centred on mid-gray
#[inline]
pub fn contrast_curve(luma: f32, steepness: f32) -> f32 {
    1.0 / (1.0 + (-steepness * (luma - 0.5)).exp())
}

/// Map a [0, 1] tone onto the grade ramp
pub fn grade(tone: f32) -> [f32; 3] {
    let scaled = tone.clamp(0.0, 1.0) * 4.0;
    let segment = (scaled.floor() as usize).min(3);
    let t = scaled - segment as f32;
    let (from, to) = (GRADE_STOPS[segment], GRADE_STOPS[segment + 1]);
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

pub fn apply(frame: &mut Frame, params: &OrangeTealParams) {
    let row_bytes = frame.row_bytes();
    let amplitude = params.noise_amplitude as i16;

    frame
        .pixels_mut()
        .par_chunks_mut(row_bytes)
        .for_each_init(rand::thread_rng, |rng, row| {
            for pixel in row.chunks_exact_mut(CHANNELS) {
                let mut luma = normalized_luminance(pixel);
                if params.grain > 0.0 {
                    luma = (luma + rng.gen_range(-params.grain..=params.grain)).clamp(0.0, 1.0);
                }

                let [r, g, b] = grade(contrast_curve(luma, params.steepness));
                pixel[0] = to_channel(r);
                pixel[1] = to_channel(g);
                pixel[2] = to_channel(b);

                if amplitude > 0 && rng.gen::<f32>() < params.noise_fraction {
                    pixel[0] = (pixel[0] as i16 + rng.gen_range(-amplitude..=amplitude)).clamp(0, 255) as u8;
                    pixel[2] = (pixel[2] as i16 + rng.gen_range(-amplitude..=amplitude)).clamp(0, 255) as u8;
                }
            }
        });
}
