use i2a_core::size::{aspect_height, aspect_width, fit_aspect, fit_terminal};

/// Box used when the terminal size is unknown.
pub const TERMINAL_FALLBACK_BOX: (u32, u32) = (80, 80);

/// Box used for HTML output without size flags.
pub const HTML_DEFAULT_BOX: (u32, u32) = (128, 128);

/// Output size as asked on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeRequest {
    /// No size flag: backend default.
    Auto,
    /// `--size` alone, used verbatim.
    Exact(u32, u32),
    /// `--size` with `--preserve-aspect`.
    Fit(u32, u32),
    /// `--width`.
    Width(u32),
    /// `--height`.
    Height(u32),
}

impl SizeRequest {
    /// Concrete size for a `source_w × source_h` image, `None` for `Auto`.
    #[must_use]
    pub fn resolve(self, source_w: u32, source_h: u32, height_scale: f32) -> Option<(u32, u32)> {
        match self {
            Self::Auto => None,
            Self::Exact(w, h) => Some((w, h)),
            Self::Fit(w, h) => Some(fit_aspect(source_w, source_h, w, h, height_scale)),
            Self::Width(w) => Some((w, aspect_height(source_w, source_h, w, height_scale))),
            Self::Height(h) => Some((
                aspect_width(source_w, source_h, h),
                ((h as f32 * height_scale).round() as u32).max(1),
            )),
        }
    }
}

/// Terminal auto-fit, or the 80×80 fallback box.
#[must_use]
pub fn terminal_default(
    source_w: u32,
    source_h: u32,
    height_scale: f32,
    terminal: Option<(u16, u16)>,
) -> (u32, u32) {
    terminal
        .and_then(|(cols, rows)| fit_terminal(source_w, source_h, cols, rows, height_scale))
        .unwrap_or_else(|| {
            log::warn!("Taille du terminal inconnue, repli sur 80x80");
            let (bw, bh) = TERMINAL_FALLBACK_BOX;
            fit_aspect(source_w, source_h, bw, bh, height_scale)
        })
}

/// HTML default: the source fitted into 128×128.
#[must_use]
pub fn html_default(source_w: u32, source_h: u32, height_scale: f32) -> (u32, u32) {
    let (bw, bh) = HTML_DEFAULT_BOX;
    fit_aspect(source_w, source_h, bw, bh, height_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_resolve_against_the_source() {
        assert_eq!(SizeRequest::Auto.resolve(200, 100, 0.5), None);
        assert_eq!(SizeRequest::Exact(7, 9).resolve(200, 100, 0.5), Some((7, 9)));
        assert_eq!(SizeRequest::Fit(80, 80).resolve(200, 100, 0.5), Some((80, 20)));
        assert_eq!(SizeRequest::Width(80).resolve(200, 100, 0.5), Some((80, 20)));
        assert_eq!(SizeRequest::Height(40).resolve(200, 100, 0.5), Some((80, 20)));
    }

    #[test]
    fn image_output_uses_unit_height_scale() {
        assert_eq!(SizeRequest::Width(100).resolve(200, 100, 1.0), Some((100, 50)));
        assert_eq!(SizeRequest::Height(50).resolve(200, 100, 1.0), Some((100, 50)));
    }

    #[test]
    fn terminal_falls_back_to_80_box() {
        assert_eq!(terminal_default(100, 100, 0.5, None), (80, 40));
        assert_eq!(terminal_default(100, 100, 0.5, Some((0, 24))), (80, 40));
        assert_eq!(terminal_default(100, 100, 0.5, Some((80, 1))), (80, 40));
    }

    #[test]
    fn terminal_fit_keeps_a_prompt_row() {
        let (w, h) = terminal_default(100, 100, 0.5, Some((200, 41)));
        assert_eq!((w, h), (80, 40));
    }

    #[test]
    fn html_box() {
        assert_eq!(html_default(100, 100, 0.5), (100, 50));
        assert_eq!(html_default(256, 128, 0.5), (128, 32));
        assert_eq!(html_default(50, 25, 0.5), (50, 13));
    }
}
