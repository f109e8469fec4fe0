//! Distressed monochrome ("white noise").
//!
//! Gamma-lifted luminance is smeared horizontally through a per-row ghost value,
//! dithered with coordinate hash jitter plus uniform noise, and quantized into
//! four gray tiers.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::invalid_value,
    error::Result,
    filters::luminance::normalized_luminance,
    video::types::{Frame, CHANNELS},
};

/// Output gray levels, darkest first. The darkest tier is lifted off pure black.
pub const TIERS: [u8; 4] = [18, 85, 170, 240];

/// Tier thresholds, lowest first
pub const THRESHOLDS: [f32; 3] = [0.2, 0.5, 0.85];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteNoiseParams {
    /// Exponent applied to normalized luminance
    pub gamma: f32,

    /// Weight of the previous pixel's ghost in the smear
    pub ghost_mix: f32,

    /// Amplitude of the coordinate hash jitter
    pub jitter: f32,

    /// Amplitude of the uniform random noise (±noise)
    pub noise: f32,
}

impl Default for WhiteNoiseParams {
    fn default() -> Self {
        Self {
            gamma: 0.7,
            ghost_mix: 0.2,
            jitter: 0.08,
            noise: 0.06,
        }
    }
}

impl WhiteNoiseParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.1..=3.0).contains(&self.gamma) {
            return Err(invalid_value("filters.white_noise.gamma", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.ghost_mix) {
            return Err(invalid_value("filters.white_noise.ghost_mix", self.ghost_mix));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(invalid_value("filters.white_noise.jitter", self.jitter));
        }
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(invalid_value("filters.white_noise.noise", self.noise));
        }
        Ok(())
    }
}

/// Quantize a dithered value into one of the four tiers
#[inline]
pub fn quantize(value: f32) -> u8 {
    if value > THRESHOLDS[2] {
        TIERS[3]
    } else if value > THRESHOLDS[1] {
        TIERS[2]
    } else if value > THRESHOLDS[0] {
        TIERS[1]
    } else {
        TIERS[0]
    }
}

/// Stateless pseudo-random value in [0, 1) derived from pixel coordinates
#[inline]
pub fn coordinate_hash(x: usize, y: usize) -> f32 {
    (((x as f32) * 12.9898 + (y as f32) * 78.233).sin() * 43_758.547)
        .fract()
        .abs()
}

pub fn apply(frame: &mut Frame, params: &WhiteNoiseParams) {
    let row_bytes = frame.row_bytes();

    frame
        .pixels_mut()
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each_init(rand::thread_rng, |rng, (y, row)| {
            // Ghost is row-local
            let mut ghost = 0.0f32;

            for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let lifted = normalized_luminance(pixel).powf(params.gamma);
                let blended = lifted * (1.0 - params.ghost_mix) + ghost * params.ghost_mix;
                ghost = blended;

                let mut value = blended + (coordinate_hash(x, y) - 0.5) * params.jitter;
                if params.noise > 0.0 {
                    value += rng.gen_range(-params.noise..=params.noise);
                }

                let tier = quantize(value);
                pixel[0] = tier;
                pixel[1] = tier;
                pixel[2] = tier;
            }
        });
}
