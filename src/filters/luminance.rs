//! Luminance and channel helpers shared by the transforms.
//!
//! All math runs directly on gamma-encoded 8-bit values (Rec. 601 weights).

pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Luminance on the 0-255 scale
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Luminance of an RGBA pixel normalized to [0, 1]
#[inline]
pub fn normalized_luminance(pixel: &[u8]) -> f32 {
    (luminance(pixel[0], pixel[1], pixel[2]) / 255.0).clamp(0.0, 1.0)
}

/// Round and clamp a 0-255 scale value into a channel
#[inline]
pub fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Round and clamp a [0, 1] value into a channel
#[inline]
pub fn unit_to_channel(value: f32) -> u8 {
    to_channel(value * 255.0)
}

/// Scale an RGB triple by `factor`, clamped
#[inline]
pub fn scale_rgb(rgb: [u8; 3], factor: f32) -> [u8; 3] {
    rgb.map(|c| to_channel(c as f32 * factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_luminance() {
        assert_eq!(to_channel(luminance(255, 0, 0)), 76);
        assert_eq!(to_channel(luminance(0, 255, 0)), 150);
        assert_eq!(to_channel(luminance(0, 0, 255)), 29);
        assert_eq!(to_channel(luminance(255, 255, 255)), 255);
        assert_eq!(to_channel(luminance(0, 0, 0)), 0);
    }

    #[test]
    fn test_channel_clamps_instead_of_wrapping() {
        assert_eq!(to_channel(-3.2), 0);
        assert_eq!(to_channel(255.4), 255);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(unit_to_channel(1.5), 255);
        assert_eq!(unit_to_channel(-0.1), 0);
    }

    #[test]
    fn test_normalized_luminance_range() {
        assert_eq!(normalized_luminance(&[0, 0, 0, 255]), 0.0);
        assert!((normalized_luminance(&[255, 255, 255, 0]) - 1.0).abs() < 1e-6);
    }
}
