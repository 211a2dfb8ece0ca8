use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 23 caractères, palette par défaut, sombre → clair.
pub const PALETTE_DEFAULT: &str = "   ...',;:clodxkO0KXNWM";

/// 10 caractères, compact, bon contraste.
pub const PALETTE_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères, Paul Bourke extended.
pub const PALETTE_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode, pseudo-pixels.
pub const PALETTE_BLOCKS: &str = " ░▒▓█";

/// Minimal, haut contraste.
pub const PALETTE_MINIMAL: &str = " .:░▒▓█";

/// Names accepted by [`Palette::preset`].
pub const PRESET_NAMES: &[&str] = &["default", "compact", "standard", "blocks", "minimal"];

/// Ordered glyph palette, dark → light. Always holds at least two glyphs.
///
/// # Example
/// ```
/// use i2a_core::palette::Palette;
/// let p = Palette::new(" .:#@").unwrap();
/// assert_eq!(p.map_char(0.0, false), ' ');
/// assert_eq!(p.map_char(1.0, false), '@');
/// assert_eq!(p.map_char(1.0, true), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    /// Build a palette from a string of glyphs ordered dark → light.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the string has fewer than two
    /// characters.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(CoreError::InvalidConfiguration(format!(
                "la palette doit contenir au moins deux caractères, reçu {}",
                glyphs.len()
            )));
        }
        Ok(Self { glyphs })
    }

    /// Look up a built-in palette by name.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for an unknown preset name.
    ///
    /// # Example
    /// ```
    /// use i2a_core::palette::Palette;
    /// assert_eq!(Palette::preset("compact").unwrap().len(), 10);
    /// assert!(Palette::preset("nope").is_err());
    /// ```
    pub fn preset(name: &str) -> Result<Self, CoreError> {
        let glyphs = match name.to_ascii_lowercase().as_str() {
            "default" => PALETTE_DEFAULT,
            "compact" => PALETTE_COMPACT,
            "standard" => PALETTE_STANDARD,
            "blocks" => PALETTE_BLOCKS,
            "minimal" => PALETTE_MINIMAL,
            _ => {
                return Err(CoreError::InvalidConfiguration(format!(
                    "palette inconnue : {name} (attendu : {})",
                    PRESET_NAMES.join(", ")
                )));
            }
        };
        Self::new(glyphs)
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in palette order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Map a luma value to a glyph.
    ///
    /// `index = round((invert ? 1 - luma : luma) · (len - 1))`, clamped into
    /// the palette so out-of-range luma from custom weights stays safe.
    #[inline]
    #[must_use]
    pub fn map_char(&self, luma: f32, invert: bool) -> char {
        let value = if invert { 1.0 - luma } else { luma };
        let last = self.glyphs.len() - 1;
        let index = (value * last as f32).round();
        // `as usize` saturates: negatives and NaN land on 0.
        let index = (index as usize).min(last);
        self.glyphs[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            glyphs: PALETTE_DEFAULT.chars().collect(),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.glyphs {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

impl FromStr for Palette {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Palette {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Palette> for String {
    fn from(value: Palette) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_rejects_short_strings() {
        assert!(matches!(
            Palette::new(""),
            Err(CoreError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Palette::new("@"),
            Err(CoreError::InvalidConfiguration(_))
        ));
        assert!(Palette::new("ab").is_ok());
    }

    #[test]
    fn palette_length_counts_chars_not_bytes() {
        let p = Palette::new("░▒").unwrap();
        assert_eq!(p.len(), 2);
        assert!(Palette::new("█").is_err());
    }

    #[test]
    fn map_char_endpoints_and_inversion() {
        let p = Palette::new(" .:#@").unwrap();
        assert_eq!(p.map_char(0.0, false), ' ');
        assert_eq!(p.map_char(1.0, false), '@');
        assert_eq!(p.map_char(0.0, true), '@');
        assert_eq!(p.map_char(1.0, true), ' ');
        assert_eq!(p.map_char(0.5, false), ':');
    }

    #[test]
    fn map_char_clamps_out_of_range_luma() {
        let p = Palette::new(" .:#@").unwrap();
        assert_eq!(p.map_char(3.0, false), '@');
        assert_eq!(p.map_char(-1.0, false), ' ');
        assert_eq!(p.map_char(3.0, true), ' ');
        assert_eq!(p.map_char(f32::NAN, false), ' ');
    }

    #[test]
    fn map_char_monotonic() {
        let p = Palette::default();
        let mut prev = 0usize;
        for i in 0..=255u16 {
            let ch = p.map_char(f32::from(i) / 255.0, false);
            let idx = p.glyphs().iter().rposition(|&c| c == ch).unwrap();
            assert!(idx >= prev, "palette non monotone à {i}");
            prev = idx;
        }
    }

    #[test]
    fn presets_are_valid() {
        for name in PRESET_NAMES {
            assert!(Palette::preset(name).is_ok(), "{name}");
        }
        assert_eq!(Palette::preset("DEFAULT").unwrap(), Palette::default());
    }

    #[test]
    fn display_round_trips_glyphs() {
        let p = Palette::new(" ░▒▓█").unwrap();
        assert_eq!(p.to_string(), " ░▒▓█");
    }
}
