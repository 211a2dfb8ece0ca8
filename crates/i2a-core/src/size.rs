//! Aspect-ratio size derivation.
//!
//! All results are clamped to at least 1 on each axis.

/// Largest size within `box_w × box_h` that keeps the source aspect ratio,
/// with the final height multiplied by `height_scale`.
///
/// The width bound is applied first; the height bound is then checked
/// against the already shrunk height. An image limited on both axes is
/// therefore not scaled by `min(box_w/w, box_h/h)` in one step. Sources
/// smaller than the box are never enlarged.
///
/// # Example
/// ```
/// use i2a_core::size::fit_aspect;
/// assert_eq!(fit_aspect(200, 100, 80, 80, 0.5), (80, 20));
/// assert_eq!(fit_aspect(64, 32, 64, 32, 1.0), (64, 32));
/// ```
#[must_use]
pub fn fit_aspect(
    source_w: u32,
    source_h: u32,
    box_w: u32,
    box_h: u32,
    height_scale: f32,
) -> (u32, u32) {
    let box_w = box_w as f32;
    let box_h = box_h as f32;
    let mut x = source_w as f32;
    let mut y = source_h as f32;

    if x > box_w {
        y = (y * (box_w / x)).max(1.0);
        x = box_w;
    }
    if y > box_h {
        x = (x * (box_h / y)).max(1.0);
        y = box_h;
    }

    (round_dim(x), round_dim(y * height_scale))
}

/// Height matching `width` under the source aspect ratio, times `height_scale`.
///
/// # Example
/// ```
/// use i2a_core::size::aspect_height;
/// assert_eq!(aspect_height(200, 100, 80, 0.5), 20);
/// ```
#[must_use]
pub fn aspect_height(source_w: u32, source_h: u32, width: u32, height_scale: f32) -> u32 {
    let ratio = source_h as f32 / source_w.max(1) as f32;
    round_dim(width as f32 * ratio * height_scale)
}

/// Width matching `height` under the source aspect ratio.
///
/// # Example
/// ```
/// use i2a_core::size::aspect_width;
/// assert_eq!(aspect_width(200, 100, 40), 80);
/// ```
#[must_use]
pub fn aspect_width(source_w: u32, source_h: u32, height: u32) -> u32 {
    let ratio = source_w as f32 / source_h.max(1) as f32;
    round_dim(height as f32 * ratio)
}

/// Grid size that fills a terminal of `term_cols × term_rows` on the limiting
/// axis. One row is reserved for the shell prompt.
///
/// The source height is first multiplied by `height_scale` to account for
/// glyphs being taller than wide. Returns `None` when the terminal size is
/// unusable (zero columns or fewer than two rows).
///
/// # Example
/// ```
/// use i2a_core::size::fit_terminal;
/// assert_eq!(fit_terminal(100, 100, 200, 51, 0.5), Some((100, 50)));
/// assert_eq!(fit_terminal(100, 100, 0, 51, 0.5), None);
/// ```
#[must_use]
pub fn fit_terminal(
    source_w: u32,
    source_h: u32,
    term_cols: u16,
    term_rows: u16,
    height_scale: f32,
) -> Option<(u32, u32)> {
    if term_cols == 0 || term_rows < 2 {
        return None;
    }
    let screen_cols = f32::from(term_cols);
    let screen_rows = f32::from(term_rows) - 1.0;

    let img_x = source_w as f32;
    let img_y = (source_h as f32 * height_scale).max(f32::MIN_POSITIVE);

    let scale = if screen_cols / screen_rows > img_x / img_y {
        screen_rows / img_y
    } else {
        screen_cols / img_x
    };

    Some((round_dim(img_x * scale), round_dim(img_y * scale)))
}

#[inline]
fn round_dim(v: f32) -> u32 {
    (v.round() as u32).max(1)
}
