use std::io::{self, Write};

use anyhow::Result;
use i2a_ascii::reader::AsciiReader;
use i2a_core::color::{dim_for_fill, to_hex};
use i2a_core::config::{HtmlOptions, ReaderConfig};
use i2a_core::frame::Cell;
use i2a_core::traits::Resample;

use crate::printer::{self, CellWriter};

/// Inline CSS for one colored cell.
///
/// # Example
/// ```
/// use i2a_core::frame::Cell;
/// use i2a_render::html::pixel_style;
/// let cell = Cell { x: 0, y: 0, color: (200, 100, 50), luma: 0.4, ch: '#' };
/// assert_eq!(pixel_style(&cell, false, false), "color:#c86432");
/// assert_eq!(
///     pixel_style(&cell, true, false),
///     "color:#502814; background-color:#c86432"
/// );
/// ```
#[must_use]
pub fn pixel_style(cell: &Cell, fill: bool, grayscale: bool) -> String {
    if fill {
        let fg = dim_for_fill(cell.color, cell.luma, grayscale);
        format!(
            "color:{}; background-color:{}",
            to_hex(fg),
            to_hex(cell.color)
        )
    } else {
        format!("color:{}", to_hex(cell.color))
    }
}

fn write_escaped<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    for ch in text.chars() {
        match ch {
            '<' => out.write_all(b"&lt;")?,
            '>' => out.write_all(b"&gt;")?,
            '&' => out.write_all(b"&amp;")?,
            '"' => out.write_all(b"&quot;")?,
            _ => write!(out, "{ch}")?,
        }
    }
    Ok(())
}

fn write_glyph<W: Write>(out: &mut W, ch: char) -> io::Result<()> {
    let mut buf = [0u8; 4];
    write_escaped(out, ch.encode_utf8(&mut buf))
}

/// Document HTML, ou fragment brut avec `raw`.
///
/// # Example
/// ```
/// use i2a_ascii::reader::AsciiReader;
/// use i2a_core::config::{HtmlOptions, ReaderConfig};
/// use i2a_core::frame::FrameBuffer;
/// use i2a_render::html::HtmlPrinter;
///
/// let src = FrameBuffer::from_fn(2, 2, |_, _| (255, 255, 255));
/// let mut reader = AsciiReader::new(src, ReaderConfig::default()).unwrap();
/// let options = HtmlOptions { raw: true, ..HtmlOptions::default() };
/// let html = HtmlPrinter::new(options).render_to_string(&mut reader, 2, 1).unwrap();
/// assert_eq!(html, "MM<br>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HtmlPrinter {
    options: HtmlOptions,
}

impl HtmlPrinter {
    #[must_use]
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Write a `cols × rows` grid to `out` and flush it.
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
        if self.options.raw {
            printer::write_rows(reader, cols, rows, self, out)?;
        } else {
            self.write_head(out)?;
            printer::write_rows(reader, cols, rows, self, out)?;
            out.write_all(b"</pre></body></html>")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Same as [`HtmlPrinter::print`], into a string.
    ///
    /// # Errors
    /// Returns the reader's error.
    pub fn render_to_string<R: Resample>(
        &self,
        reader: &mut AsciiReader<R>,
        cols: u32,
        rows: u32,
    ) -> Result<String> {
        let mut buf = Vec::new();
        self.print(reader, cols, rows, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn write_head<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let o = &self.options;
        out.write_all(b"<!DOCTYPE html><html><head>")?;
        if let Some(title) = &o.title {
            out.write_all(b"<title>")?;
            write_escaped(out, title)?;
            out.write_all(b"</title>")?;
        }
        write!(
            out,
            "<style>body{{background:{}}}.ascii{{font-weight:{};font-style:{};font-size:{};font-family:monospace;color:{}}}</style>",
            o.background, o.font_weight, o.font_style, o.font_size, o.foreground
        )?;
        out.write_all(b"</head><body><pre class=\"ascii\">")
    }
}

impl CellWriter for HtmlPrinter {
    fn write_cell<W: Write>(
        &self,
        out: &mut W,
        cell: &Cell,
        config: &ReaderConfig,
    ) -> io::Result<()> {
        if self.options.colors {
            write!(
                out,
                "<span style=\"{}\">",
                pixel_style(cell, self.options.fill, config.grayscale)
            )?;
            write_glyph(out, cell.ch)?;
            out.write_all(b"</span>")
        } else {
            write_glyph(out, cell.ch)
        }
    }

    fn line_break<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"<br>")
    }
}

#[cfg(test)]
mod tests {
    use i2a_core::config::ResampleFilter;
    use i2a_core::frame::FrameBuffer;
    use i2a_core::palette::Palette;

    use super::*;

    fn reader(palette: &str) -> AsciiReader {
        let src = FrameBuffer::from_fn(2, 2, |x, y| if x == y { (0, 0, 0) } else { (255, 255, 255) });
        let config = ReaderConfig {
            palette: Palette::new(palette).unwrap(),
            resample_filter: ResampleFilter::Replicate,
            ..ReaderConfig::default()
        };
        AsciiReader::new(src, config).unwrap()
    }

    fn render(options: HtmlOptions, palette: &str) -> String {
        HtmlPrinter::new(options)
            .render_to_string(&mut reader(palette), 2, 2)
            .unwrap()
    }

    #[test]
    fn document_wrapper_with_defaults() {
        let html = render(HtmlOptions::default(), ".#");
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head>\
             <style>body{background:black}.ascii{font-weight:bold;font-style:normal;\
             font-size:8pt;font-family:monospace;color:white}</style>\
             </head><body><pre class=\"ascii\">.#<br>#.<br></pre></body></html>"
        );
    }

    #[test]
    fn title_and_css_strings_pass_through() {
        let options = HtmlOptions {
            title: Some("Chat & souris".into()),
            background: "#123456".into(),
            font_size: "12px".into(),
            ..HtmlOptions::default()
        };
        let html = render(options, ".#");
        assert!(html.contains("<title>Chat &amp; souris</title>"));
        assert!(html.contains("body{background:#123456}"));
        assert!(html.contains("font-size:12px;"));
    }

    #[test]
    fn raw_mode_has_no_document() {
        let options = HtmlOptions {
            raw: true,
            ..HtmlOptions::default()
        };
        assert_eq!(render(options, ".#"), ".#<br>#.<br>");
    }

    #[test]
    fn markup_glyphs_are_escaped() {
        let options = HtmlOptions {
            raw: true,
            ..HtmlOptions::default()
        };
        assert_eq!(render(options, "<&"), "&lt;&amp;<br>&amp;&lt;<br>");
    }

    #[test]
    fn colored_spans() {
        let options = HtmlOptions {
            raw: true,
            colors: true,
            ..HtmlOptions::default()
        };
        let html = render(options, ".#");
        assert!(html.starts_with(
            "<span style=\"color:#000000\">.</span><span style=\"color:#ffffff\">#</span><br>"
        ));
    }

    #[test]
    fn fill_spans_dim_the_glyph() {
        let options = HtmlOptions {
            raw: true,
            colors: true,
            fill: true,
            ..HtmlOptions::default()
        };
        let html = render(options, ".#");
        assert!(html.contains(
            "<span style=\"color:#ffffff; background-color:#ffffff\">#</span>"
        ));
        assert!(html.contains(
            "<span style=\"color:#000000; background-color:#000000\">.</span>"
        ));
    }

    #[test]
    fn grayscale_fill_uses_half_intensity() {
        let cell = Cell {
            x: 0,
            y: 0,
            color: (200, 200, 200),
            luma: 0.78,
            ch: 'x',
        };
        assert_eq!(
            pixel_style(&cell, true, true),
            "color:#646464; background-color:#c8c8c8"
        );
    }
}
