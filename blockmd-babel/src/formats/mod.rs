//! Format implementations
//!
//! - `markdown`: Markdown text, scanned into blocks and rendered back.
//! - `blocks`: the platform's block JSON.

pub mod blocks;
pub mod markdown;

pub use blocks::BlocksFormat;
pub use markdown::MarkdownFormat;
