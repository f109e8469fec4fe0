use thiserror::Error;

/// Main error type for the Retro-Lens library
#[derive(Error, Debug)]
pub enum RetroLensError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Video source error: {0}")]
    Source(#[from] SourceError),

    #[error("Presentation error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Frame buffer errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to write frame to {path}: {reason}")]
    SaveFailed { path: String, reason: String },
}

/// Filter catalog and transform errors
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown filter: {name}")]
    Unknown { name: String },

    #[error("Filter catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate filter name in catalog: {name}")]
    DuplicateName { name: String },

    #[error("Transform failed: {filter} - {reason}")]
    TransformFailed { filter: String, reason: String },
}

/// Video source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Video source lost: {reason}")]
    Lost { reason: String },

    #[error("Failed to draw source frame: {reason}")]
    DrawFailed { reason: String },

    #[error("Failed to load source image: {path}")]
    LoadFailed { path: String },
}

/// Presentation surface errors
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Presented frame is {actual_width}x{actual_height}, surface is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Presentation failed: {reason}")]
    PresentFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using RetroLensError
pub type Result<T> = std::result::Result<T, RetroLensError>;

impl RetroLensError {
    /// Check if the render loop can carry on after this error
    ///
    /// Recoverable errors cost one dropped tick; the next tick starts over
    /// from a fresh source frame.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Filter(FilterError::TransformFailed { .. }) => true,
            Self::Source(SourceError::DrawFailed { .. }) => true,
            Self::Surface(SurfaceError::PresentFailed { .. }) => true,
            Self::Frame(FrameError::BufferSizeMismatch { .. }) => true,
            Self::Io(_) => true,
            _ => false,
        }
    }

    /// Whether the video source is gone for good
    pub fn is_source_loss(&self) -> bool {
        matches!(self, Self::Source(SourceError::Lost { .. }))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Source(SourceError::Lost { .. }) => {
                "The camera stopped responding. Restart the preview to continue.".to_string()
            }
            Self::Source(SourceError::LoadFailed { path }) => {
                format!("Could not load image '{}'. Please check the file exists and is a PNG or JPEG.", path)
            }
            Self::Filter(FilterError::Unknown { name }) => {
                format!("Filter '{}' not found. Use --list to see the available filters.", name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
