use crate::color::Rgb;
use crate::error::CoreError;

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// Used for the decoded source image, the resampled working bitmap and the
/// raster renderer's output.
///
/// # Example
/// ```
/// use i2a_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either axis is zero or the buffer length
    /// does not match `width × height × 4`.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_rgba(2, 1, vec![255; 8]).unwrap();
    /// assert_eq!(fb.rgb(1, 0), (255, 255, 255));
    /// assert!(FrameBuffer::from_rgba(2, 2, vec![0; 8]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        CoreError::check_dimensions(width, height)?;
        if data.len() != width as usize * height as usize * 4 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a buffer from a per-pixel RGB function. Alpha is opaque.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_fn(3, 2, |x, y| ((x * 10) as u8, (y * 10) as u8, 0));
    /// assert_eq!(fb.rgb(2, 1), (20, 10, 0));
    /// ```
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut fb = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                fb.put_rgb(x, y, f(x, y));
            }
        }
        fb
    }

    /// Dimensions `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = self.index(x, y);
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// RGB channels of pixel (x, y); alpha is ignored.
    #[inline]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        let (r, g, b, _) = self.pixel(x, y);
        (r, g, b)
    }

    /// Write an opaque pixel. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put_rgb(&mut self, x: u32, y: u32, rgb: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx] = rgb.0;
        self.data[idx + 1] = rgb.1;
        self.data[idx + 2] = rgb.2;
        self.data[idx + 3] = 255;
    }

    /// Blend `rgb` over pixel (x, y) with coverage `alpha` in [0, 1].
    /// Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn blend_rgb(&mut self, x: i32, y: i32, rgb: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let (dr, dg, db) = self.rgb(x as u32, y as u32);
        let mix = |src: u8, dst: u8| (f32::from(src) * a + f32::from(dst) * (1.0 - a)).round() as u8;
        self.put_rgb(
            x as u32,
            y as u32,
            (mix(rgb.0, dr), mix(rgb.1, dg), mix(rgb.2, db)),
        );
    }

    /// Fill a rectangle, clipped to the buffer. Origin may be negative.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(4, 4);
    /// fb.fill_rect(-1, -1, 2, 2, (9, 9, 9));
    /// assert_eq!(fb.rgb(0, 0), (9, 9, 9));
    /// assert_eq!(fb.rgb(1, 1), (0, 0, 0));
    /// ```
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, rgb: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (i64::from(x) + i64::from(width)).min(i64::from(self.width)) as i32;
        let y1 = (i64::from(y) + i64::from(height)).min(i64::from(self.height)) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.put_rgb(px as u32, py as u32, rgb);
            }
        }
    }

    /// Fill the whole buffer with an opaque color.
    pub fn clear(&mut self, rgb: Rgb) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = rgb.0;
            px[1] = rgb.1;
            px[2] = rgb.2;
            px[3] = 255;
        }
    }
}

/// One sampled character-grid position.
///
/// `x`/`y` are logical (pre-flip) coordinates in working-bitmap space.
/// `luma` is the raw weighted value and may leave [0, 1] with custom weights.
///
/// # Example
/// ```
/// use i2a_core::frame::Cell;
/// let cell = Cell { x: 0, y: 0, color: (255, 0, 0), luma: 0.3, ch: '#' };
/// assert_eq!(cell.ch, '#');
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Couleur du pixel (grise si le mode grayscale est actif).
    pub color: Rgb,
    /// Luminance pondérée.
    pub luma: f32,
    /// Glyphe choisi dans la palette.
    pub ch: char,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_mixes_with_destination() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.clear((0, 0, 0));
        fb.blend_rgb(0, 0, (200, 100, 0), 0.5);
        assert_eq!(fb.rgb(0, 0), (100, 50, 0));
        fb.blend_rgb(-1, 0, (255, 255, 255), 1.0);
        fb.blend_rgb(0, 5, (255, 255, 255), 1.0);
        assert_eq!(fb.rgb(0, 0), (100, 50, 0));
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.fill_rect(2, 2, 10, 10, (1, 2, 3));
        assert_eq!(fb.rgb(2, 2), (1, 2, 3));
        assert_eq!(fb.rgb(1, 1), (0, 0, 0));
        fb.fill_rect(5, 5, 2, 2, (7, 7, 7));
        assert_eq!(fb.rgb(2, 2), (1, 2, 3));
    }

    #[test]
    fn put_rgb_sets_opaque_alpha() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_rgb(1, 1, (10, 20, 30));
        assert_eq!(fb.pixel(1, 1), (10, 20, 30, 255));
        fb.put_rgb(2, 0, (1, 1, 1));
        assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    }
}
