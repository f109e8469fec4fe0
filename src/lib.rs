//! # Retro-Lens
//!
//! Real-time retro filters for live video.
//!
//! Frames from a video source are pulled into a reusable buffer, run through
//! the selected pixel transform, optionally mirrored, and written to a
//! presentation surface once per display tick.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use retro_lens::{
//!     composition::{FrameSurface, RenderLoop, Session},
//!     config::Config,
//!     video::TestPatternSource,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let session = Arc::new(Session::from_config(&config.pipeline));
//! session.registry().select("Orange & Teal");
//!
//! let mut render_loop = RenderLoop::new(&config, session.clone(), FrameSurface::new());
//! render_loop.attach(TestPatternSource::new(640, 480));
//! let stats = render_loop.run(Some(90)).await?;
//! println!("presented {} frames", stats.presented);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Frame buffers, video sources and frame acquisition
//! - [`filters`] - Pixel transforms and the filter catalog
//! - [`composition`] - Render loop, mirror compositor and presentation surface
//! - [`config`] - Configuration management

pub mod composition;
pub mod config;
pub mod error;
pub mod filters;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{RenderLoop, Session},
    config::Config,
    error::{RetroLensError, Result},
    filters::{FilterKind, FilterRegistry},
    video::Frame,
};
