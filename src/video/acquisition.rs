use tracing::{debug, info};

use crate::{
    error::Result,
    video::source::{SourceReadiness, VideoSource},
    video::types::Frame,
};

/// Outcome of matching the working buffer to the source resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionSync {
    /// The source has not reported a usable resolution
    Unknown,
    /// The working buffer already matches
    Unchanged,
    /// The working buffer was (re)allocated at a new resolution
    Resized { width: u32, height: u32 },
}

/// Pulls frames from an attached source into a reusable working buffer
///
/// The buffer is allocated once per resolution epoch and drawn into in place
/// on every ready tick.
pub struct FrameAcquisition<S> {
    source: S,
    working: Option<Frame>,
    epoch: u64,
}

impl<S: VideoSource> FrameAcquisition<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            working: None,
            epoch: 0,
        }
    }

    pub fn readiness(&mut self) -> SourceReadiness {
        self.source.readiness()
    }

    /// Reallocate the working buffer if the source resolution changed
    pub fn sync_dimensions(&mut self) -> Result<DimensionSync> {
        let (width, height) = match self.source.native_dimensions() {
            Some((w, h)) if w > 0 && h > 0 => (w, h),
            _ => return Ok(DimensionSync::Unknown),
        };

        if let Some(working) = &self.working {
            if working.dimensions() == (width, height) {
                return Ok(DimensionSync::Unchanged);
            }
            info!(
                "Source resolution changed: {}x{} -> {}x{}",
                working.width(),
                working.height(),
                width,
                height
            );
        }

        self.working = Some(Frame::new_black(width, height)?);
        self.epoch += 1;
        debug!("Working buffer allocated at {}x{} (epoch {})", width, height, self.epoch);

        Ok(DimensionSync::Resized { width, height })
    }

    /// Draw the source's current frame into the working buffer
    ///
    /// Returns `None` when no buffer has been sized yet.
    pub fn draw(&mut self) -> Result<Option<&mut Frame>> {
        match self.working.as_mut() {
            Some(working) => {
                self.source.draw_into(working)?;
                Ok(Some(working))
            }
            None => Ok(None),
        }
    }

    pub fn working_dimensions(&self) -> Option<(u32, u32)> {
        self.working.as_ref().map(Frame::dimensions)
    }

    /// Number of buffer allocations so far
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release the working buffer and hand the source back
    pub fn into_source(self) -> S {
        self.source
    }
}
