use serde::{Deserialize, Serialize};

/// RGB triple, 8 bits per channel.
pub type Rgb = (u8, u8, u8);

/// Channel weights for the luma computation.
///
/// The weights need not sum to 1. Custom weights can push luma outside
/// [0, 1]; every consumer clamps on use.
///
/// # Example
/// ```
/// use i2a_core::color::LumaWeights;
/// let w = LumaWeights::default();
/// assert!((w.red + w.green + w.blue - 1.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LumaWeights {
    /// Red channel weight.
    pub red: f32,
    /// Green channel weight.
    pub green: f32,
    /// Blue channel weight.
    pub blue: f32,
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self {
            red: 0.2989,
            green: 0.5866,
            blue: 0.1145,
        }
    }
}

/// Luminance pondérée d'un pixel RGB.
///
/// `Wr·R/255 + Wg·G/255 + Wb·B/255`, not clamped.
///
/// # Example
/// ```
/// use i2a_core::color::{luma, LumaWeights};
/// let w = LumaWeights::default();
/// assert!(luma((0, 0, 0), &w).abs() < f32::EPSILON);
/// assert!((luma((255, 255, 255), &w) - 1.0).abs() < 1e-4);
/// ```
#[inline]
#[must_use]
pub fn luma(rgb: Rgb, weights: &LumaWeights) -> f32 {
    (weights.red * f32::from(rgb.0)) / 255.0
        + (weights.green * f32::from(rgb.1)) / 255.0
        + (weights.blue * f32::from(rgb.2)) / 255.0
}

/// Clamp a raw luma value into [0, 1]. NaN maps to 0.
#[inline]
#[must_use]
pub fn clamp_luma(luma: f32) -> f32 {
    if luma.is_nan() { 0.0 } else { luma.clamp(0.0, 1.0) }
}

/// Collapse a pixel to gray using its luma.
///
/// # Example
/// ```
/// use i2a_core::color::grayscale;
/// assert_eq!(grayscale(0.5), (128, 128, 128));
/// assert_eq!(grayscale(1.7), (255, 255, 255));
/// ```
#[inline]
#[must_use]
pub fn grayscale(luma: f32) -> Rgb {
    let grey = (clamp_luma(luma) * 255.0).round() as u8;
    (grey, grey, grey)
}

/// Foreground color for color-fill mode.
///
/// The glyph sits on a background of its own color, so its color is scaled
/// by the luma (0.5 in grayscale mode) to stay legible.
///
/// # Example
/// ```
/// use i2a_core::color::dim_for_fill;
/// assert_eq!(dim_for_fill((200, 100, 50), 0.4, false), (80, 40, 20));
/// assert_eq!(dim_for_fill((200, 100, 50), 0.4, true), (100, 50, 25));
/// ```
#[must_use]
pub fn dim_for_fill(rgb: Rgb, luma: f32, grayscale: bool) -> Rgb {
    let factor = if grayscale { 0.5 } else { clamp_luma(luma) };
    let scale = |c: u8| (f32::from(c) * factor).round() as u8;
    (scale(rgb.0), scale(rgb.1), scale(rgb.2))
}

/// Format a color as a lowercase `#rrggbb` hex string.
///
/// # Example
/// ```
/// use i2a_core::color::to_hex;
/// assert_eq!(to_hex((255, 16, 0)), "#ff1000");
/// ```
#[must_use]
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_is_unclamped_with_heavy_weights() {
        let w = LumaWeights {
            red: 1.0,
            green: 1.0,
            blue: 1.0,
        };
        assert!((luma((255, 255, 255), &w) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn luma_uses_each_channel_weight() {
        let w = LumaWeights {
            red: 1.0,
            green: 0.0,
            blue: 0.0,
        };
        assert!((luma((255, 200, 100), &w) - 1.0).abs() < 1e-6);
        assert!(luma((0, 200, 100), &w).abs() < 1e-6);
    }

    #[test]
    fn clamp_luma_handles_nan_and_negatives() {
        assert!(clamp_luma(f32::NAN).abs() < f32::EPSILON);
        assert!(clamp_luma(-0.3).abs() < f32::EPSILON);
        assert!((clamp_luma(0.42) - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn fill_dimming_rounds_each_channel() {
        assert_eq!(dim_for_fill((200, 100, 50), 0.4, false), (80, 40, 20));
        assert_eq!(dim_for_fill((255, 255, 255), 1.0, false), (255, 255, 255));
        assert_eq!(dim_for_fill((255, 255, 255), 2.5, false), (255, 255, 255));
        assert_eq!(dim_for_fill((9, 9, 9), 0.0, false), (0, 0, 0));
    }
}
