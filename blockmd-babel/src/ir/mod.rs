//! Block model shared by every format.
//!
//! Markdown and the platform's JSON both convert to and from the arena
//! [`nodes::Document`]; nothing in here performs I/O.

pub mod ids;
pub mod nodes;
