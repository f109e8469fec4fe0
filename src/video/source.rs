use crate::{error::Result, video::types::Frame};

/// What a video source can offer on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceReadiness {
    /// No fully decodable frame yet; the tick is skipped
    NotReady,
    /// A complete frame can be drawn
    Ready,
    /// The source is gone for good
    Lost,
}

/// An external producer of live frames (camera, decoder, still image)
///
/// The render loop never starts or stops a source; it only polls readiness
/// and dimensions and asks for the current frame to be drawn into a buffer it
/// owns. None of these calls may block on I/O.
pub trait VideoSource: Send {
    /// Current decodability of the source
    fn readiness(&mut self) -> SourceReadiness;

    /// Native resolution, if known yet
    fn native_dimensions(&self) -> Option<(u32, u32)>;

    /// Draw the current frame into `frame` at the frame's own dimensions
    fn draw_into(&mut self, frame: &mut Frame) -> Result<()>;
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn readiness(&mut self) -> SourceReadiness {
        (**self).readiness()
    }

    fn native_dimensions(&self) -> Option<(u32, u32)> {
        (**self).native_dimensions()
    }

    fn draw_into(&mut self, frame: &mut Frame) -> Result<()> {
        (**self).draw_into(frame)
    }
}
