//! Image sources for img2a: decoding and resampling.

pub mod image;
pub mod resize;
