//! # Video Input Module
//!
//! Frame buffers, the video source collaborator contract, and acquisition of
//! source frames into the reusable working buffer.

pub mod acquisition;
pub mod source;
pub mod types;

mod image_source;
mod test_pattern;

pub use acquisition::{DimensionSync, FrameAcquisition};
pub use image_source::ImageSource;
pub use source::{SourceReadiness, VideoSource};
pub use test_pattern::TestPatternSource;
pub use types::Frame;
