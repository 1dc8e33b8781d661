//! Presentation layer for consilium
//!
//! CLI definition, console formatting, and progress display. No business
//! logic lives here; everything renders types owned by the domain and
//! application layers.

pub mod cli;
pub mod output;
pub mod progress;

pub use cli::{Cli, OutputFormat};
pub use output::ConsoleFormatter;
pub use progress::ProgressReporter;
