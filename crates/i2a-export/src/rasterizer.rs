use std::collections::HashMap;

use anyhow::Result;
use i2a_ascii::reader::AsciiReader;
use i2a_core::color::{Rgb, dim_for_fill};
use i2a_core::config::RasterOptions;
use i2a_core::error::CoreError;
use i2a_core::frame::FrameBuffer;
use i2a_core::palette::Palette;
use i2a_core::traits::{CellFont, GlyphBitmap, Resample};

/// Taille d'une cellule de caractère en pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMetrics {
    /// Widest advance among the palette glyphs.
    pub width: u32,
    /// Line height of the font.
    pub height: u32,
    /// Top of the cell to baseline.
    pub ascent: u32,
}

impl CellMetrics {
    /// Measure the cell box for `palette` drawn with `font`.
    #[must_use]
    pub fn measure<F: CellFont + ?Sized>(font: &F, palette: &Palette) -> Self {
        let width = palette
            .glyphs()
            .iter()
            .map(|&ch| font.advance(ch))
            .max()
            .unwrap_or(0)
            .max(1);
        let height = font.line_height().max(1);
        Self {
            width,
            height,
            ascent: font.ascent().min(height),
        }
    }

    /// Grid that covers `width × height` pixels, rounding up.
    ///
    /// # Example
    /// ```
    /// use i2a_export::rasterizer::CellMetrics;
    /// let m = CellMetrics { width: 7, height: 14, ascent: 11 };
    /// assert_eq!(m.grid_for(100, 100), (15, 8));
    /// ```
    #[must_use]
    pub fn grid_for(&self, width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(self.width), height.div_ceil(self.height))
    }
}

/// Shift that centers `cells · cell` pixels over `total`. Never positive.
///
/// Halves round toward positive infinity.
fn overflow_offset(total: u32, cells: u32, cell: u32) -> i32 {
    let diff = i64::from(total) - i64::from(cells) * i64::from(cell);
    (diff + 1).div_euclid(2) as i32
}

/// Masques des glyphes de la palette, rasterisés une seule fois.
pub struct GlyphAtlas {
    glyphs: HashMap<char, GlyphBitmap>,
}

impl GlyphAtlas {
    /// Rasterize every glyph of `palette`. Inkless glyphs are left out.
    #[must_use]
    pub fn build<F: CellFont + ?Sized>(font: &F, palette: &Palette) -> Self {
        let mut glyphs = HashMap::with_capacity(palette.len());
        for &ch in palette.glyphs() {
            if glyphs.contains_key(&ch) {
                continue;
            }
            if let Some(bitmap) = font.rasterize(ch) {
                glyphs.insert(ch, bitmap);
            }
        }
        Self { glyphs }
    }

    #[must_use]
    pub fn get(&self, ch: char) -> Option<&GlyphBitmap> {
        self.glyphs.get(&ch)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Blend a coverage mask with its pen at `(x, baseline)`, clipped.
fn draw_glyph(fb: &mut FrameBuffer, glyph: &GlyphBitmap, x: i32, baseline: i32, ink: Rgb) {
    let x0 = x + glyph.left;
    let y0 = baseline + glyph.top;
    for gy in 0..glyph.height {
        let row = (gy * glyph.width) as usize;
        for gx in 0..glyph.width {
            // Masque trop court : pixels manquants ignorés.
            let cov = glyph.coverage.get(row + gx as usize).copied().unwrap_or(0);
            if cov == 0 {
                continue;
            }
            fb.blend_rgb(
                x0 + gx as i32,
                y0 + gy as i32,
                ink,
                f32::from(cov) / 255.0,
            );
        }
    }
}

/// Dessine la grille ASCII dans une image RGB.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use i2a_ascii::reader::AsciiReader;
/// use i2a_core::config::{RasterOptions, ReaderConfig};
/// use i2a_export::font::TrueTypeFont;
/// use i2a_export::rasterizer::RasterRenderer;
/// use i2a_source::image::load_image;
///
/// let source = load_image(Path::new("photo.png")).unwrap();
/// let (w, h) = source.dimensions();
/// let font = TrueTypeFont::load(Path::new("DejaVuSansMono.ttf"), 12.0).unwrap();
/// let mut reader = AsciiReader::new(source, ReaderConfig::default()).unwrap();
/// let image = RasterRenderer::new(RasterOptions::default())
///     .render(&mut reader, &font, w, h)
///     .unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct RasterRenderer {
    options: RasterOptions,
}

impl RasterRenderer {
    #[must_use]
    pub fn new(options: RasterOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Render a `width × height` pixel image.
    ///
    /// The grid is sized so the cells cover the whole image; the overflow is
    /// split evenly between both edges.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for a zero-sized image, or the reader's
    /// error.
    pub fn render<R, F>(
        &self,
        reader: &mut AsciiReader<R>,
        font: &F,
        width: u32,
        height: u32,
    ) -> Result<FrameBuffer>
    where
        R: Resample,
        F: CellFont + ?Sized,
    {
        CoreError::check_dimensions(width, height)?;

        let metrics = CellMetrics::measure(font, &reader.config().palette);
        let atlas = GlyphAtlas::build(font, &reader.config().palette);
        let (cols, rows) = metrics.grid_for(width, height);
        let off_x = overflow_offset(width, cols, metrics.width);
        let off_y = overflow_offset(height, rows, metrics.height);
        log::debug!(
            "Rendu image {width}x{height} : cellule {}x{}, grille {cols}x{rows}, décalage ({off_x}, {off_y})",
            metrics.width,
            metrics.height
        );

        let opts = &self.options;
        let cell_w = metrics.width as i32;
        let cell_h = metrics.height as i32;
        let mut fb = FrameBuffer::new(width, height);
        fb.clear(opts.background);

        let grid = reader.read(cols, rows)?;
        let grayscale = grid.config().grayscale;
        for row in grid {
            let top = off_y + row.index() as i32 * cell_h;
            let baseline = top + metrics.ascent as i32;
            for cell in row {
                let left = off_x + cell.x as i32 * cell_w;
                let ink = if !opts.colors {
                    opts.foreground
                } else if opts.fill {
                    fb.fill_rect(left, top, metrics.width, metrics.height, cell.color);
                    dim_for_fill(cell.color, cell.luma, grayscale)
                } else {
                    cell.color
                };
                if let Some(glyph) = atlas.get(cell.ch) {
                    draw_glyph(&mut fb, glyph, left, baseline, ink);
                }
            }
        }
        Ok(fb)
    }
}
