//! Helpers shared by the Markdown and blocks formats.

pub mod language;
pub mod url;
