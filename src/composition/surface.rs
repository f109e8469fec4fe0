use std::path::Path;

use crate::{
    error::{Result, SurfaceError},
    video::types::Frame,
};

/// Where processed frames are shown
///
/// The render loop keeps the surface dimensions in lock-step with its working
/// buffer: `resize` is called right before the first present at a new
/// resolution, `present` once per processed tick.
pub trait PresentationSurface: Send {
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// In-memory presentation buffer
///
/// Holds the last presented frame so a recorder or snapshot can read it
/// independently of the render loop.
#[derive(Debug, Default)]
pub struct FrameSurface {
    frame: Option<Frame>,
    presents: u64,
    allocations: u64,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently presented frame
    pub fn latest(&self) -> Option<&Frame> {
        if self.presents == 0 {
            return None;
        }
        self.frame.as_ref()
    }

    /// Total frames presented
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Number of buffer allocations so far
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(Frame::dimensions)
    }

    /// Write the latest frame to a PNG file; returns false if nothing was presented yet
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        match self.latest() {
            Some(frame) => {
                frame.save_png(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl PresentationSurface for FrameSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.dimensions() == Some((width, height)) {
            return Ok(());
        }
        self.frame = Some(Frame::new_black(width, height)?);
        self.allocations += 1;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let target = self.frame.as_mut().ok_or_else(|| SurfaceError::PresentFailed {
            reason: "surface has not been sized".to_string(),
        })?;

        if target.dimensions() != frame.dimensions() {
            return Err(SurfaceError::DimensionMismatch {
                width: target.width(),
                height: target.height(),
                actual_width: frame.width(),
                actual_height: frame.height(),
            }
            .into());
        }

        target.copy_from(frame)?;
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_requires_size() {
        let mut surface = FrameSurface::new();
        let frame = Frame::new_black(2, 2).unwrap();
        assert!(surface.present(&frame).is_err());
        assert!(surface.latest().is_none());
    }

    #[test]
    fn test_resize_allocates_once_per_resolution() {
        let mut surface = FrameSurface::new();
        surface.resize(4, 4).unwrap();
        surface.resize(4, 4).unwrap();
        assert_eq!(surface.allocations(), 1);
        surface.resize(2, 2).unwrap();
        assert_eq!(surface.allocations(), 2);
    }

    #[test]
    fn test_present_copies_frame() {
        let mut surface = FrameSurface::new();
        surface.resize(2, 1).unwrap();
        let frame = Frame::new_filled(2, 1, [9, 8, 7, 6]).unwrap();
        surface.present(&frame).unwrap();

        assert_eq!(surface.presents(), 1);
        assert_eq!(surface.latest(), Some(&frame));

        let wrong = Frame::new_black(1, 1).unwrap();
        assert!(surface.present(&wrong).is_err());
        assert_eq!(surface.presents(), 1);
    }

    #[test]
    fn test_snapshot_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.png");
        let mut surface = FrameSurface::new();
        assert!(!surface.save_snapshot(&path).unwrap());

        surface.resize(3, 3).unwrap();
        surface.present(&Frame::new_filled(3, 3, [10, 20, 30, 255]).unwrap()).unwrap();
        assert!(surface.save_snapshot(&path).unwrap());
        assert!(path.exists());
    }
}
