use std::iter::FusedIterator;

use anyhow::Result;
use i2a_core::color::{grayscale, luma};
use i2a_core::config::{ReaderConfig, ResampleFilter};
use i2a_core::error::CoreError;
use i2a_core::frame::{Cell, FrameBuffer};
use i2a_core::size;
use i2a_core::traits::Resample;
use i2a_source::resize::Resizer;

/// Source resampled to the exact grid size, tagged with that size.
#[derive(Clone, Debug)]
pub struct WorkingBitmap {
    cols: u32,
    rows: u32,
    frame: FrameBuffer,
}

impl WorkingBitmap {
    /// Grid dimensions this bitmap was built for.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// The resampled pixels.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

/// Cache à une entrée, indexé par `(cols, rows)`.
///
/// Returns `slot` untouched when it already holds a bitmap of the requested
/// size, otherwise a freshly resampled one. The previous bitmap is dropped,
/// never modified.
///
/// # Errors
/// Returns an error if the resampler fails.
pub fn ensure_resampled<R: Resample + ?Sized>(
    slot: Option<WorkingBitmap>,
    source: &FrameBuffer,
    cols: u32,
    rows: u32,
    filter: ResampleFilter,
    resampler: &mut R,
) -> Result<WorkingBitmap> {
    if let Some(working) = slot {
        if working.dimensions() == (cols, rows) {
            return Ok(working);
        }
    }
    let frame = resampler.resample(source, cols, rows, filter)?;
    Ok(WorkingBitmap { cols, rows, frame })
}

/// Lit une image source comme une grille de cellules ASCII.
///
/// # Example
/// ```
/// use i2a_ascii::reader::AsciiReader;
/// use i2a_core::config::ReaderConfig;
/// use i2a_core::frame::FrameBuffer;
///
/// let source = FrameBuffer::from_fn(16, 16, |x, _| ((x * 16) as u8, 0, 0));
/// let mut reader = AsciiReader::new(source, ReaderConfig::default()).unwrap();
/// let text: Vec<String> = reader
///     .read(8, 4)
///     .unwrap()
///     .map(|row| row.cells().map(|c| c.ch).collect())
///     .collect();
/// assert_eq!(text.len(), 4);
/// assert!(text.iter().all(|line| line.chars().count() == 8));
/// ```
pub struct AsciiReader<R: Resample = Resizer> {
    source: FrameBuffer,
    config: ReaderConfig,
    resampler: R,
    working: Option<WorkingBitmap>,
}

impl AsciiReader<Resizer> {
    /// Create a reader backed by the default resizer.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for an empty source or
    /// `InvalidConfiguration` for an invalid configuration.
    pub fn new(source: FrameBuffer, config: ReaderConfig) -> Result<Self, CoreError> {
        Self::with_resampler(source, config, Resizer::new())
    }
}

impl<R: Resample> AsciiReader<R> {
    /// Create a reader with a custom resampler.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for an empty source or
    /// `InvalidConfiguration` for an invalid configuration.
    pub fn with_resampler(
        source: FrameBuffer,
        config: ReaderConfig,
        resampler: R,
    ) -> Result<Self, CoreError> {
        CoreError::check_dimensions(source.width, source.height)?;
        config.validate()?;
        Ok(Self {
            source,
            config,
            resampler,
            working: None,
        })
    }

    /// Sampling configuration.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Source image.
    #[must_use]
    pub fn source(&self) -> &FrameBuffer {
        &self.source
    }

    /// The resampler, e.g. to inspect instrumentation in tests.
    #[must_use]
    pub fn resampler(&self) -> &R {
        &self.resampler
    }

    /// Source width in pixels.
    #[must_use]
    pub fn image_width(&self) -> u32 {
        self.source.width
    }

    /// Source height in pixels.
    #[must_use]
    pub fn image_height(&self) -> u32 {
        self.source.height
    }

    /// [`size::fit_aspect`] for this source.
    #[must_use]
    pub fn fit_aspect(&self, box_w: u32, box_h: u32, height_scale: f32) -> (u32, u32) {
        size::fit_aspect(self.source.width, self.source.height, box_w, box_h, height_scale)
    }

    /// [`size::aspect_height`] for this source.
    #[must_use]
    pub fn aspect_height(&self, width: u32, height_scale: f32) -> u32 {
        size::aspect_height(self.source.width, self.source.height, width, height_scale)
    }

    /// [`size::aspect_width`] for this source.
    #[must_use]
    pub fn aspect_width(&self, height: u32) -> u32 {
        size::aspect_width(self.source.width, self.source.height, height)
    }

    /// Rows of a `cols × rows` grid.
    ///
    /// The working bitmap is rebuilt only when `(cols, rows)` differs from the
    /// previous call. Rows borrow the reader, so they must be consumed before
    /// another size is requested.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` for a zero-sized grid, or the resampler's
    /// error.
    pub fn read(&mut self, cols: u32, rows: u32) -> Result<Rows<'_>> {
        CoreError::check_dimensions(cols, rows)?;
        // Une grille d'une autre taille reste en place si le rééchantillonnage échoue.
        let reusable = self
            .working
            .as_ref()
            .is_some_and(|w| w.dimensions() == (cols, rows));
        let slot = if reusable { self.working.take() } else { None };
        let working = ensure_resampled(
            slot,
            &self.source,
            cols,
            rows,
            self.config.resample_filter,
            &mut self.resampler,
        )?;
        let working = self.working.insert(working);
        log::trace!("Lecture d'une grille {cols}x{rows}");
        Ok(Rows {
            sampler: CellSampler {
                config: &self.config,
                working: &working.frame,
            },
            next: 0,
            rows,
        })
    }

    /// Every cell of a `cols × rows` grid, row-major.
    ///
    /// # Errors
    /// Same as [`AsciiReader::read`].
    pub fn read_grid(&mut self, cols: u32, rows: u32) -> Result<Vec<Vec<Cell>>> {
        Ok(self.read(cols, rows)?.map(|row| row.cells().collect()).collect())
    }
}

/// Computes cells from the working bitmap. Cheap to copy.
#[derive(Clone, Copy)]
pub struct CellSampler<'a> {
    config: &'a ReaderConfig,
    working: &'a FrameBuffer,
}

impl CellSampler<'_> {
    /// Grid width.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.working.width
    }

    /// Grid height.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.working.height
    }

    /// Sample logical position `(x, y)`, applying the flips.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> Cell {
        let cfg = self.config;
        let sx = if cfg.flip_x { self.working.width - 1 - x } else { x };
        let sy = if cfg.flip_y { self.working.height - 1 - y } else { y };

        let mut color = self.working.rgb(sx, sy);
        let l = luma(color, &cfg.weights);
        if cfg.grayscale {
            color = grayscale(l);
        }
        let ch = cfg.palette.map_char(l, cfg.invert);

        Cell {
            x,
            y,
            color,
            luma: l,
            ch,
        }
    }
}

/// Rows of one read. Yields exactly `rows` items.
#[derive(Clone)]
pub struct Rows<'a> {
    sampler: CellSampler<'a>,
    next: u32,
    rows: u32,
}

impl<'a> Rows<'a> {
    /// Grid width of every row.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.sampler.cols()
    }

    /// Configuration the cells are sampled with.
    #[must_use]
    pub fn config(&self) -> &'a ReaderConfig {
        self.sampler.config
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.rows {
            return None;
        }
        let row = Row {
            sampler: self.sampler,
            y: self.next,
        };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.rows - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rows<'_> {}
impl FusedIterator for Rows<'_> {}

/// One scanline. Holds no cursor, so it can be iterated any number of times.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    sampler: CellSampler<'a>,
    y: u32,
}

impl<'a> Row<'a> {
    /// Row index, `0 ≤ y < rows`.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.y
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.sampler.cols()
    }

    /// Always false: grids are at least one cell wide.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh iterator over the row's cells.
    #[must_use]
    pub fn cells(&self) -> RowCells<'a> {
        RowCells {
            sampler: self.sampler,
            y: self.y,
            x: 0,
            cols: self.sampler.cols(),
        }
    }
}

impl<'a> IntoIterator for Row<'a> {
    type Item = Cell;
    type IntoIter = RowCells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

impl<'a> IntoIterator for &Row<'a> {
    type Item = Cell;
    type IntoIter = RowCells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

/// Lazy cells of one row.
#[derive(Clone)]
pub struct RowCells<'a> {
    sampler: CellSampler<'a>,
    y: u32,
    x: u32,
    cols: u32,
}

impl Iterator for RowCells<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.cols {
            return None;
        }
        let cell = self.sampler.sample(self.x, self.y);
        self.x += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.cols - self.x) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RowCells<'_> {}
impl FusedIterator for RowCells<'_> {}
