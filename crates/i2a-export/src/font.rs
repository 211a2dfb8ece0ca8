use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use i2a_core::traits::{CellFont, GlyphBitmap};

/// Monospace fonts tried, in order, when no font is given.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consolab.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\courbd.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// First existing entry of [`SYSTEM_FONT_CANDIDATES`].
#[must_use]
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Police TrueType/OpenType rasterisée par `ab_glyph` à une taille fixe.
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
}

impl TrueTypeFont {
    /// Parse font bytes.
    ///
    /// # Errors
    /// Retourne une erreur si les données ne sont pas une police valide.
    pub fn from_bytes(data: Vec<u8>, size_px: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        Ok(Self {
            font,
            scale: PxScale::from(size_px),
        })
    }

    /// Load a font file.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier est illisible ou invalide.
    pub fn load(path: &Path, size_px: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let font = Self::from_bytes(data, size_px)
            .with_context(|| format!("Police invalide : {}", path.display()))?;
        log::debug!("Police chargée : {} ({size_px}px)", path.display());
        Ok(font)
    }

    /// Pixel size the font renders at.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.scale.y
    }
}

impl CellFont for TrueTypeFont {
    fn advance(&self, ch: char) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.h_advance(scaled.glyph_id(ch)).ceil().max(0.0) as u32
    }

    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent() + scaled.line_gap())
            .ceil()
            .max(1.0) as u32
    }

    fn ascent(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.ascent().ceil().max(0.0) as u32
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        let glyph = self
            .font
            .glyph_id(ch)
            .with_scale_and_position(self.scale, point(0.0, 0.0));
        let outline = self.font.outline_glyph(glyph)?;
        let bounds = outline.px_bounds();
        let width = bounds.width() as u32;
        let height = bounds.height() as u32;
        let mut coverage = vec![0u8; (width * height) as usize];
        outline.draw(|x, y, v| {
            let idx = (y * width + x) as usize;
            if let Some(c) = coverage.get_mut(idx) {
                *c = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });
        Some(GlyphBitmap {
            left: bounds.min.x as i32,
            top: bounds.min.y as i32,
            width,
            height,
            coverage,
        })
    }
}
