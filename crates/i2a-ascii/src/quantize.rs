//! Réduction d'une couleur RGB vers les huit couleurs ANSI de base.

use i2a_core::color::{clamp_luma, Rgb};

/// Eight-color terminal palette, plus "no color".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermColor {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Result of [`quantize`]. `bold` only matters when `color` is `Default`
/// or in grayscale mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantized {
    pub color: TermColor,
    pub bold: bool,
}

/// Pick the terminal color closest in spirit to `rgb`.
///
/// Ordered decision tree on the channel bytes, tolerance `t = 25.5`,
/// first match wins. Luma is clamped to `[0, 1]` first.
///
/// # Example
/// ```
/// use i2a_ascii::quantize::{quantize, TermColor};
/// assert_eq!(quantize((255, 0, 0), 0.3, false).color, TermColor::Red);
/// assert_eq!(quantize((40, 60, 40), 0.2, false).color, TermColor::Default);
/// ```
#[must_use]
pub fn quantize(rgb: Rgb, luma: f32, grayscale: bool) -> Quantized {
    const T: f32 = 25.5;
    const I: f32 = 255.0 - T;

    let y = clamp_luma(luma);
    let (r, g, b) = (f32::from(rgb.0), f32::from(rgb.1), f32::from(rgb.2));

    let bold = y >= 0.95 && r < 1.0 && g < 1.0 && b < 1.0;

    if grayscale {
        return if y > 0.7 {
            Quantized {
                color: TermColor::White,
                bold: true,
            }
        } else {
            Quantized {
                color: TermColor::Default,
                bold,
            }
        };
    }

    let color = if r - T > g && r - T > b {
        TermColor::Red
    } else if g - T > r && g - T > b {
        TermColor::Green
    } else if r - T > b && g - T > b && r + g > I {
        TermColor::Yellow
    } else if b - T > r && b - T > g && y < 0.95 {
        TermColor::Blue
    } else if r - T > g && b - T > g && r + b > I {
        TermColor::Magenta
    } else if g - T > r && b - T > r && b + g > I {
        TermColor::Cyan
    } else if r + g + b >= 3.0 * y * 255.0 {
        TermColor::White
    } else {
        TermColor::Default
    };

    Quantized { color, bold }
}
