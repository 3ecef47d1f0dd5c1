//! Conversion between cloud-document block trees and Markdown
//!
//!     Documents on the platform are trees of typed blocks (headings, lists, tables, quotes,
//!     code, to-dos...). This crate renders such a tree to Markdown and scans Markdown back into
//!     blocks, so a document can be edited as plain text and written back.
//!
//!     This is a pure lib: no network, no filesystem, no environment. The blockmd-cli crate does
//!     the I/O; callers that upload blocks assign real ids and perform the writes themselves.
//!
//! Architecture
//!
//!     Both directions meet in the arena block model (./ir/nodes.rs). Platform JSON is decoded
//!     once at the boundary (./formats/blocks/wire.rs): type detection, style reduction, URL
//!     decoding and root resolution all happen there, so the renderer only ever matches on a
//!     closed enum.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── inline.rs       # Runs <-> inline Markdown
//!     │   │   ├── table.rs        # Pipe/HTML tables in, HTML tables out
//!     │   │   ├── parser.rs       # Scanner, flat and tree modes
//!     │   │   └── serializer.rs   # Renderer
//!     │   └── blocks
//!     │       ├── wire.rs         # Platform JSON shapes
//!     │       └── expand.rs       # Grid -> table/cell/text subtree
//!     ├── ir                      # Block model and id generation
//!     └── common                  # Code languages, URL helpers
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories, so tests/lib.rs declares them.
//!
//! Failure Model
//!
//!     Conversion never fails. Unknown block types render their children, missing fields
//!     default to empty, bad percent-encoding is kept raw and unrecognized Markdown is
//!     paragraph text. Errors only exist at the outer boundary: unknown format names and input
//!     that is not JSON at all.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub mod common;
pub mod ir;

pub use error::FormatError;
pub use format::Format;
pub use formats::blocks::expand::ExpandOptions;
pub use formats::markdown::parser::ScanOptions;
pub use formats::{BlocksFormat, MarkdownFormat};
pub use registry::FormatRegistry;

use ir::nodes::{Document, FlatDocument};

/// Render a block tree as Markdown. Empty when the document has no root.
pub fn to_markdown(doc: &Document) -> String {
    formats::markdown::serializer::serialize_to_markdown(doc)
}

/// Scan Markdown into a linked tree under a synthetic page root.
pub fn markdown_to_tree(markdown: &str, options: &ScanOptions) -> Document {
    formats::markdown::parser::parse_tree(markdown, options)
}

/// Scan Markdown into unlinked blocks for appending into an existing container.
pub fn markdown_to_flat(markdown: &str, options: &ScanOptions) -> FlatDocument {
    formats::markdown::parser::parse_flat(markdown, options)
}

/// Read platform JSON and render it as Markdown.
pub fn blocks_to_markdown(json: &str) -> Result<String, FormatError> {
    let doc = BlocksFormat::default().parse(json)?;
    Ok(to_markdown(&doc))
}
