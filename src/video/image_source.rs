use std::path::Path;

use image::{imageops::FilterType, RgbaImage};
use tracing::debug;

use crate::{
    error::{Result, SourceError},
    video::source::{SourceReadiness, VideoSource},
    video::types::Frame,
};

/// A still image served as an endless, always-ready video source
pub struct ImageSource {
    image: RgbaImage,
}

impl ImageSource {
    /// Load a PNG or JPEG from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| {
                debug!("Failed to decode {:?}: {}", path, e);
                SourceError::LoadFailed {
                    path: path.display().to_string(),
                }
            })?
            .to_rgba8();
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl VideoSource for ImageSource {
    fn readiness(&mut self) -> SourceReadiness {
        SourceReadiness::Ready
    }

    fn native_dimensions(&self) -> Option<(u32, u32)> {
        Some(self.image.dimensions())
    }

    fn draw_into(&mut self, frame: &mut Frame) -> Result<()> {
        if frame.dimensions() == self.image.dimensions() {
            frame.pixels_mut().copy_from_slice(&self.image);
            return Ok(());
        }

        // Only hit when the caller sized its buffer differently from the native resolution
        let scaled = image::imageops::resize(&self.image, frame.width(), frame.height(), FilterType::Triangle);
        frame.pixels_mut().copy_from_slice(&scaled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_copy_at_native_size() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let mut source = ImageSource::from_image(image);
        let mut frame = Frame::new_black(3, 2).unwrap();

        assert_eq!(source.native_dimensions(), Some((3, 2)));
        source.draw_into(&mut frame).unwrap();
        assert_eq!(frame.get_pixel(2, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_scales_into_other_size() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([50, 60, 70, 255]));
        let mut source = ImageSource::from_image(image);
        let mut frame = Frame::new_black(4, 4).unwrap();
        source.draw_into(&mut frame).unwrap();
        assert_eq!(frame.get_pixel(3, 3), [50, 60, 70, 255]);
    }

    #[test]
    fn test_missing_file() {
        assert!(ImageSource::open("/no/such/image.png").is_err());
    }
}
