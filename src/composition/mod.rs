//! # Composition
//!
//! The render loop that turns source frames into presented frames, plus the
//! pieces it composes: the mirror compositor, the presentation surface and
//! the session controls shared with the UI.

pub mod compositor;
pub mod engine;
pub mod session;
pub mod surface;

// Re-exports for convenience
pub use compositor::Compositor;
pub use engine::{LoopState, LoopStats, RenderLoop, TickOutcome};
pub use session::{Session, TickSettings};
pub use surface::{FrameSurface, PresentationSurface};
