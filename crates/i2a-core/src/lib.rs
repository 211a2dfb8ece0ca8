//! Configuration, types, and shared structures for img2a.
//!
//! This crate contains the color model, palette mapping, size solver,
//! configuration and the traits shared across the img2a workspace.

pub mod color;
pub mod config;
pub mod css_colors;
pub mod error;
pub mod frame;
pub mod palette;
pub mod size;
pub mod traits;

pub use color::{LumaWeights, Rgb};
pub use config::{AppConfig, ReaderConfig, ResampleFilter};
pub use error::CoreError;
pub use frame::{Cell, FrameBuffer};
pub use palette::Palette;
