//! # Frame Filters
//!
//! The pixel transforms applied to every live frame, and the catalog the UI
//! picks from.
//!
//! ## Built-in Filters
//!
//! - **Normal**: the frame as captured
//! - **Orange & Teal**: logistic contrast curve onto a teal/orange ramp, with grain
//! - **White Noise**: smeared, dithered four-tone monochrome
//! - **8-Bit**: nearest-palette blocks with a dark grid seam
//! - **ASCII**: block brightness drawn as 8x8 glyphs
//! - **Grayscale** and **Pixelate**: plain luminance and block averaging
//!
//! ## Usage
//!
//! ```rust
//! use retro_lens::filters::{FilterConfig, FilterRegistry};
//! use retro_lens::video::Frame;
//!
//! let registry = FilterRegistry::new();
//! registry.select("ASCII");
//!
//! let mut frame = Frame::new_black(64, 48)?;
//! registry.active_filter().kind.apply(&mut frame, &FilterConfig::default())?;
//! # Ok::<(), retro_lens::RetroLensError>(())
//! ```

pub mod kind;
pub mod luminance;
pub mod registry;

mod blocks;

// Filter implementations
pub mod ascii;
pub mod eight_bit;
pub mod grayscale;
pub mod orange_teal;
pub mod pixelate;
pub mod white_noise;

// Re-exports for convenience
pub use kind::{FilterConfig, FilterKind, FilterMetadata};
pub use registry::{FilterDefinition, FilterRegistry};
