use std::io::{self, Write};

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use i2a_ascii::quantize::{TermColor, quantize};
use i2a_ascii::reader::AsciiReader;
use i2a_core::color::{Rgb, dim_for_fill};
use i2a_core::config::{ColorDepth, ReaderConfig, TerminalOptions};
use i2a_core::frame::Cell;
use i2a_core::traits::Resample;

use crate::printer::{self, CellWriter};

/// Prépare la console pour les séquences d'échappement ANSI.
///
/// Returns whether escapes will be understood. Always true outside Windows.
#[must_use]
pub fn enable_ansi_support() -> bool {
    #[cfg(windows)]
    {
        let ok = crossterm::ansi_support::supports_ansi();
        if !ok {
            log::warn!("La console ne supporte pas les séquences ANSI");
        }
        ok
    }
    #[cfg(not(windows))]
    {
        true
    }
}

/// Index 0-7 of the basic ANSI color for a quantized cell. `Default` has none.
///
/// Written as SGR 30-37 (foreground) or 40-47 (background), which every
/// color terminal understands.
#[must_use]
pub fn ansi_code(color: TermColor) -> Option<u8> {
    match color {
        TermColor::Default => None,
        TermColor::Red => Some(1),
        TermColor::Green => Some(2),
        TermColor::Yellow => Some(3),
        TermColor::Blue => Some(4),
        TermColor::Magenta => Some(5),
        TermColor::Cyan => Some(6),
        TermColor::White => Some(7),
    }
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb {
        r: color.0,
        g: color.1,
        b: color.2,
    }
}

/// Écrit la grille sur un terminal, avec ou sans couleurs.
///
/// # Example
/// ```
/// use i2a_ascii::reader::AsciiReader;
/// use i2a_core::config::{ReaderConfig, TerminalOptions};
/// use i2a_core::frame::FrameBuffer;
/// use i2a_render::terminal::TerminalPrinter;
///
/// let src = FrameBuffer::from_fn(4, 4, |_, _| (255, 255, 255));
/// let mut reader = AsciiReader::new(src, ReaderConfig::default()).unwrap();
/// let text = TerminalPrinter::new(TerminalOptions::default())
///     .render_to_string(&mut reader, 3, 2)
///     .unwrap();
/// assert_eq!(text, "MMM\nMMM\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TerminalPrinter {
    options: TerminalOptions,
}

impl TerminalPrinter {
    #[must_use]
    pub fn new(options: TerminalOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Print a `cols × rows` grid to `out` and flush it.
    ///
    /// # Errors
    /// Returns the reader's error or the first write error.
    pub fn print<R: Resample, W: Write>(
        &self,
        reader: &mut AsciiReader<R>,
        cols: u32,
        rows: u32,
        out: &mut W,
    ) -> Result<()> {
        printer::write_rows(reader, cols, rows, self, out)?;
        out.flush()?;
        Ok(())
    }

    /// Same as [`TerminalPrinter::print`], into a string.
    ///
    /// # Errors
    /// Returns the reader's error.
    pub fn render_to_string<R: Resample>(
        &self,
        reader: &mut AsciiReader<R>,
        cols: u32,
        rows: u32,
    ) -> Result<String> {
        printer::render_to_string(reader, cols, rows, self)
    }

    fn write_ansi8<W: Write>(
        &self,
        out: &mut W,
        cell: &Cell,
        grayscale: bool,
    ) -> io::Result<()> {
        let q = quantize(cell.color, cell.luma, grayscale);
        match ansi_code(q.color) {
            None if q.bold => queue!(
                out,
                SetAttribute(Attribute::Bold),
                Print(cell.ch),
                SetAttribute(Attribute::Reset)
            ),
            None => queue!(out, Print(cell.ch)),
            Some(code) => {
                let sgr = if self.options.fill { 40 + code } else { 30 + code };
                write!(out, "\x1b[{sgr}m")?;
                queue!(out, Print(cell.ch), ResetColor)
            }
        }
    }

    fn write_true_color<W: Write>(
        &self,
        out: &mut W,
        cell: &Cell,
        grayscale: bool,
    ) -> io::Result<()> {
        if self.options.fill {
            let fg = dim_for_fill(cell.color, cell.luma, grayscale);
            queue!(
                out,
                SetBackgroundColor(rgb(cell.color)),
                SetForegroundColor(rgb(fg)),
                Print(cell.ch),
                ResetColor
            )
        } else {
            queue!(out, SetForegroundColor(rgb(cell.color)), Print(cell.ch), ResetColor)
        }
    }
}

impl CellWriter for TerminalPrinter {
    fn write_cell<W: Write>(
        &self,
        out: &mut W,
        cell: &Cell,
        config: &ReaderConfig,
    ) -> io::Result<()> {
        if !self.options.colors {
            return queue!(out, Print(cell.ch));
        }
        match self.options.color_depth {
            ColorDepth::Ansi8 => self.write_ansi8(out, cell, config.grayscale),
            ColorDepth::TrueColor => self.write_true_color(out, cell, config.grayscale),
        }
    }
}
