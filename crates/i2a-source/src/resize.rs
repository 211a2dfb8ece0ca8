use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use i2a_core::config::ResampleFilter;
use i2a_core::error::CoreError;
use i2a_core::frame::FrameBuffer;
use i2a_core::traits::Resample;

/// Options `fast_image_resize` correspondant à un filtre.
///
/// `Default` keeps the library's own default algorithm.
#[must_use]
pub fn resize_options(filter: ResampleFilter) -> ResizeOptions {
    let options = ResizeOptions::new();
    match filter {
        ResampleFilter::Default => options,
        ResampleFilter::Fast => options.resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        ResampleFilter::Smooth => options.resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        ResampleFilter::Replicate => options.resize_alg(ResizeAlg::Nearest),
        ResampleFilter::AreaAveraging => options.resize_alg(ResizeAlg::Convolution(FilterType::Box)),
    }
}

/// Resizer réutilisable wrappant fast_image_resize.
///
/// # Example
/// ```
/// use i2a_source::resize::Resizer;
/// use i2a_core::config::ResampleFilter;
/// use i2a_core::frame::FrameBuffer;
/// use i2a_core::traits::Resample;
/// let mut r = Resizer::new();
/// let src = FrameBuffer::new(100, 100);
/// let dst = r.resample(&src, 40, 20, ResampleFilter::Smooth).unwrap();
/// assert_eq!(dst.dimensions(), (40, 20));
/// ```
pub struct Resizer {
    inner: FirResizer,
    /// Scratch copy of the source (the resize API wants `&mut` on it).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    pub fn resize_into(
        &mut self,
        src: &FrameBuffer,
        dst: &mut FrameBuffer,
        filter: ResampleFilter,
    ) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Invalid destination dimensions")?;

        let options = resize_options(filter);
        self.inner
            .resize(&src_image, &mut dst_image, Some(&options))
            .context("Resize failed")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Resample for Resizer {
    fn resample(
        &mut self,
        source: &FrameBuffer,
        cols: u32,
        rows: u32,
        filter: ResampleFilter,
    ) -> Result<FrameBuffer> {
        CoreError::check_dimensions(cols, rows)?;
        CoreError::check_dimensions(source.width, source.height)?;
        log::debug!(
            "Rééchantillonnage {}x{} → {cols}x{rows} ({filter})",
            source.width,
            source.height
        );
        let mut dst = FrameBuffer::new(cols, rows);
        self.resize_into(source, &mut dst, filter)?;
        Ok(dst)
    }
}

/// Convenience for one-shot usage.
///
/// # Errors
/// Returns an error if the dimensions are zero or the resize fails.
///
/// # Example
/// ```
/// use i2a_source::resize::resize_frame;
/// use i2a_core::config::ResampleFilter;
/// use i2a_core::frame::FrameBuffer;
/// let src = FrameBuffer::new(100, 100);
/// let dst = resize_frame(&src, 50, 50, ResampleFilter::Replicate).unwrap();
/// assert_eq!(dst.width, 50);
/// ```
pub fn resize_frame(
    src: &FrameBuffer,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<FrameBuffer> {
    Resizer::new().resample(src, width, height, filter)
}
