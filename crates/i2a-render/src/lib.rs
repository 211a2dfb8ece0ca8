//! Text backends for img2a: ANSI terminal and HTML.
//!
//! Both implement [`printer::CellWriter`] and share [`printer::write_rows`].

pub mod html;
pub mod printer;
pub mod terminal;

pub use html::HtmlPrinter;
pub use printer::CellWriter;
pub use terminal::{TerminalPrinter, enable_ansi_support};
