use anyhow::Result;

use crate::config::ResampleFilter;
use crate::frame::FrameBuffer;

/// Produit un bitmap de travail aux dimensions exactes de la grille.
///
/// Implemented by `i2a_source::resize::Resizer`.
///
/// # Example
/// ```
/// use i2a_core::traits::Resample;
/// use i2a_core::config::ResampleFilter;
/// use i2a_core::frame::FrameBuffer;
///
/// struct Blank;
/// impl Resample for Blank {
///     fn resample(&mut self, _src: &FrameBuffer, cols: u32, rows: u32,
///                 _filter: ResampleFilter) -> anyhow::Result<FrameBuffer> {
///         Ok(FrameBuffer::new(cols, rows))
///     }
/// }
/// let out = Blank.resample(&FrameBuffer::new(8, 8), 2, 3, ResampleFilter::Smooth).unwrap();
/// assert_eq!(out.dimensions(), (2, 3));
/// ```
pub trait Resample {
    /// Resize `source` to exactly `cols × rows` pixels.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the dimensions.
    fn resample(
        &mut self,
        source: &FrameBuffer,
        cols: u32,
        rows: u32,
        filter: ResampleFilter,
    ) -> Result<FrameBuffer>;
}

/// Coverage mask of one rasterized glyph.
///
/// `left`/`top` position the mask relative to the pen origin on the
/// baseline; `top` is negative for ink above the baseline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Horizontal offset from the pen position.
    pub left: i32,
    /// Vertical offset from the baseline.
    pub top: i32,
    /// Mask width.
    pub width: u32,
    /// Mask height.
    pub height: u32,
    /// Row-major coverage, 0 = transparent, 255 = full ink.
    pub coverage: Vec<u8>,
}

/// Mesure et rasterise les glyphes pour le rendu image.
///
/// Implemented by `i2a_export::font::TrueTypeFont`.
pub trait CellFont {
    /// Horizontal advance of `ch` in pixels.
    fn advance(&self, ch: char) -> u32;

    /// Distance between consecutive baselines in pixels.
    fn line_height(&self) -> u32;

    /// Distance from the top of a line box to the baseline in pixels.
    fn ascent(&self) -> u32;

    /// Coverage mask for `ch`, or `None` for glyphs without ink (space).
    fn rasterize(&self, ch: char) -> Option<GlyphBitmap>;
}
