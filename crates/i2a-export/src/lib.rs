//! Image output for img2a: the ASCII grid drawn back into pixels.

pub mod font;
pub mod rasterizer;

pub use font::TrueTypeFont;
pub use rasterizer::{CellMetrics, RasterRenderer};
