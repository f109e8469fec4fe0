use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{FilterError, Result, RetroLensError},
    filters::{ascii, eight_bit, grayscale, orange_teal, pixelate, white_noise},
    filters::{
        ascii::AsciiParams, eight_bit::EightBitParams, orange_teal::OrangeTealParams,
        pixelate::PixelateParams, white_noise::WhiteNoiseParams,
    },
    video::types::Frame,
};

/// The closed set of frame transforms
///
/// Every variant runs in place, keeps the frame dimensions, leaves alpha
/// untouched and clamps every color channel to [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Identity,
    OrangeTeal,
    WhiteNoise,
    EightBit,
    Ascii,
    Grayscale,
    Pixelate,
}

impl FilterKind {
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Identity,
        FilterKind::OrangeTeal,
        FilterKind::WhiteNoise,
        FilterKind::EightBit,
        FilterKind::Ascii,
        FilterKind::Grayscale,
        FilterKind::Pixelate,
    ];

    /// Apply this transform to `frame` in place
    pub fn apply(self, frame: &mut Frame, config: &FilterConfig) -> Result<()> {
        frame.validate().map_err(|e| FilterError::TransformFailed {
            filter: self.slug().to_string(),
            reason: e.to_string(),
        })?;

        match self {
            FilterKind::Identity => {}
            FilterKind::OrangeTeal => orange_teal::apply(frame, &config.orange_teal),
            FilterKind::WhiteNoise => white_noise::apply(frame, &config.white_noise),
            FilterKind::EightBit => eight_bit::apply(frame, &config.eight_bit),
            FilterKind::Ascii => ascii::apply(frame, &config.ascii),
            FilterKind::Grayscale => grayscale::apply(frame),
            FilterKind::Pixelate => pixelate::apply(frame, &config.pixelate),
        }
        Ok(())
    }

    /// Stable identifier used in configuration files and on the command line
    pub fn slug(self) -> &'static str {
        match self {
            FilterKind::Identity => "identity",
            FilterKind::OrangeTeal => "orange_teal",
            FilterKind::WhiteNoise => "white_noise",
            FilterKind::EightBit => "eight_bit",
            FilterKind::Ascii => "ascii",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Pixelate => "pixelate",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FilterKind::Identity => "Unmodified camera image",
            FilterKind::OrangeTeal => "Cinematic teal shadows and orange highlights with film grain",
            FilterKind::WhiteNoise => "Distressed four-tone monochrome with horizontal smear and dither",
            FilterKind::EightBit => "Chunky palette blocks with an LCD grid",
            FilterKind::Ascii => "Brightness rendered as 8x8 text glyphs",
            FilterKind::Grayscale => "Luminance grayscale",
            FilterKind::Pixelate => "Averaged square blocks",
        }
    }

    pub fn metadata(self) -> FilterMetadata {
        match self {
            FilterKind::Identity => FilterMetadata {
                stochastic: false,
                performance_impact: 0.0,
            },
            FilterKind::OrangeTeal => FilterMetadata {
                stochastic: true,
                performance_impact: 0.6,
            },
            FilterKind::WhiteNoise => FilterMetadata {
                stochastic: true,
                performance_impact: 0.5,
            },
            FilterKind::EightBit => FilterMetadata {
                stochastic: false,
                performance_impact: 0.2,
            },
            FilterKind::Ascii => FilterMetadata {
                stochastic: false,
                performance_impact: 0.3,
            },
            FilterKind::Grayscale => FilterMetadata {
                stochastic: false,
                performance_impact: 0.1,
            },
            FilterKind::Pixelate => FilterMetadata {
                stochastic: false,
                performance_impact: 0.2,
            },
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FilterKind {
    type Err = RetroLensError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| FilterError::Unknown { name: s.to_string() }.into())
    }
}

/// Metadata about a transform's characteristics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterMetadata {
    /// Output depends on an unseeded random source
    pub stochastic: bool,

    /// Estimated per-frame cost (0.0 = free, 1.0 = heavy)
    pub performance_impact: f32,
}

/// Tunable constants for every transform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub orange_teal: OrangeTealParams,
    pub white_noise: WhiteNoiseParams,
    pub eight_bit: EightBitParams,
    pub ascii: AsciiParams,
    pub pixelate: PixelateParams,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        self.orange_teal.validate()?;
        self.white_noise.validate()?;
        self.eight_bit.validate()?;
        self.ascii.validate()?;
        self.pixelate.validate()?;
        Ok(())
    }
}
