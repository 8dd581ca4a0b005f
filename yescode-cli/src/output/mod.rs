//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, KeyStatusOutput, StatusOutput};
pub use text::TextFormatter;
