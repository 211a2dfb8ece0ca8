use std::io::{self, Write};

use anyhow::Result;
use i2a_ascii::reader::AsciiReader;
use i2a_core::config::ReaderConfig;
use i2a_core::frame::Cell;
use i2a_core::traits::Resample;

/// Hooks a text backend plugs into [`write_rows`].
pub trait CellWriter {
    /// Emit one cell.
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    fn write_cell<W: Write>(
        &self,
        out: &mut W,
        cell: &Cell,
        config: &ReaderConfig,
    ) -> io::Result<()>;

    /// Emit the end of a row. Newline by default.
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    fn line_break<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"\n")
    }
}

/// Walk a `cols × rows` read once, calling the writer's hooks.
///
/// Every row, including the last, is followed by a line break.
///
/// # Errors
/// Returns the reader's error or the first write error.
pub fn write_rows<R, C, W>(
    reader: &mut AsciiReader<R>,
    cols: u32,
    rows: u32,
    writer: &C,
    out: &mut W,
) -> Result<()>
where
    R: Resample,
    C: CellWriter + ?Sized,
    W: Write,
{
    let grid = reader.read(cols, rows)?;
    let config = grid.config();
    log::debug!("Écriture d'une grille {cols}x{rows}");
    for row in grid {
        for cell in row {
            writer.write_cell(out, &cell, config)?;
        }
        writer.line_break(out)?;
    }
    Ok(())
}

/// Capture a backend's output for a `cols × rows` read.
///
/// # Errors
/// Same as [`write_rows`].
pub fn render_to_string<R, C>(
    reader: &mut AsciiReader<R>,
    cols: u32,
    rows: u32,
    writer: &C,
) -> Result<String>
where
    R: Resample,
    C: CellWriter + ?Sized,
{
    let mut buf = Vec::new();
    write_rows(reader, cols, rows, writer, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
