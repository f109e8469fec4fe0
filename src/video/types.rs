use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{FrameError, Result};

/// Bytes per interleaved RGBA pixel
pub const CHANNELS: usize = 4;

/// Represents a single video frame
///
/// A thin wrapper around an RGBA image buffer: four interleaved 8-bit samples
/// per pixel in (R, G, B, A) order, row-major, no row padding. The shape is
/// fixed at construction; only the pixel content is mutable.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbaImage,
}

impl Frame {
    /// Create a new opaque black frame with the given dimensions
    pub fn new_black(width: u32, height: u32) -> Result<Self> {
        Self::new_filled(width, height, [0, 0, 0, 255])
    }

    /// Create a new frame with every pixel set to `color`
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self> {
        check_dimensions(width, height)?;
        let buffer = ImageBuffer::from_pixel(width, height, Rgba(color));
        Ok(Self { buffer })
    }

    /// Create a frame from raw RGBA bytes
    pub fn from_rgba_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = byte_len(width, height);
        let actual = data.len();
        let buffer = ImageBuffer::from_raw(width, height, data).filter(|_| actual == expected);

        match buffer {
            Some(buffer) => Ok(Self { buffer }),
            None => Err(FrameError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual,
            }
            .into()),
        }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Number of bytes in one row of pixels
    pub fn row_bytes(&self) -> usize {
        self.width() as usize * CHANNELS
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// The raw interleaved pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable access to the raw interleaved pixel bytes
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Copy the contents of a same-sized frame into this one without reallocating
    pub fn copy_from(&mut self, other: &Frame) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(FrameError::BufferSizeMismatch {
                width: self.width(),
                height: self.height(),
                expected: byte_len(self.width(), self.height()),
                actual: other.pixels().len(),
            }
            .into());
        }
        self.pixels_mut().copy_from_slice(other.pixels());
        Ok(())
    }

    /// Check the length invariant `pixels.len() == width * height * 4`
    pub fn validate(&self) -> Result<()> {
        let expected = byte_len(self.width(), self.height());
        let actual = self.pixels().len();
        if expected != actual {
            return Err(FrameError::BufferSizeMismatch {
                width: self.width(),
                height: self.height(),
                expected,
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.buffer.save(path).map_err(|e| FrameError::SaveFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimensions { width, height }.into());
    }
    Ok(())
}
