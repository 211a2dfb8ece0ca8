//! Image-to-character sampling for img2a.
//!
//! [`reader::AsciiReader`] resamples a source image to a character grid and
//! yields rows of [`i2a_core::frame::Cell`]. [`quantize`] reduces a cell color
//! to the eight terminal colors.

pub mod quantize;
pub mod reader;

pub use quantize::{Quantized, TermColor, quantize};
pub use reader::{AsciiReader, Row, Rows};
