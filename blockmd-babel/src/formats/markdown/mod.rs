//! Markdown format implementation
//!
//! Scanning and rendering are line-oriented and hand-written: the accepted
//! Markdown is a small, predictable subset, and the output has to match what
//! the scanner reads back.
//!
//! # Element Mapping Table
//!
//! | Block            | Markdown                     | Export Notes                          | Import Notes                           |
//! |------------------|------------------------------|---------------------------------------|----------------------------------------|
//! | page             | `# Title` + `---`            | Always emitted first                  | First non-blank `# ` line only         |
//! | text             | Paragraph                    | Two trailing spaces (hard break)      | Lines joined by spaces until break     |
//! | heading1..9      | `#` × level                  | Children rendered below               | Levels above 9 stay paragraph text     |
//! | bullet / ordered | `- ` / `N. `                 | Two spaces of indent per level        | Indent = leading whitespace / 2        |
//! | todo             | `- [ ] ` / `- [x] `          |                                       | Bullet items with a checkbox           |
//! | code             | Fenced block                 | Numeric language → fence tag          | Fence tag kept as the language name    |
//! | quote            | `> text`                     | Every line prefixed                   | Flat mode only                         |
//! | quote_container  | `> ` lines                   | Children rendered, then prefixed      | Tree mode: one text child per line     |
//! | divider          | `---`                        |                                       | `---`, `***` or `___`                  |
//! | image            | `![](token)`                 | Token, not a URL                      | Image-only lines                       |
//! | table            | Raw HTML `<table>`           | Merge spans as rowspan/colspan        | Pipe tables and HTML tables            |
//!
//! # Lossy Conversions
//!
//! - Runs carry one style; `***both***` and similar combinations do not survive.
//! - Equations render as `$..$`/`$$..$$` and come back as plain text.
//! - Ordered numbers are recomputed from sibling position.
//! - Merge spans are emitted but not read back from HTML tables.

pub mod inline;
pub mod parser;
pub mod serializer;
pub mod table;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::{Document, FlatDocument};
use parser::ScanOptions;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: ScanOptions,
}

impl MarkdownFormat {
    pub fn new(options: ScanOptions) -> Self {
        MarkdownFormat { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan into unlinked blocks for appending into an existing container.
    pub fn parse_flat(&self, source: &str) -> FlatDocument {
        parser::parse_flat(source, &self.options)
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown with raw HTML tables"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parser::parse_tree(source, &self.options))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serializer::serialize_to_markdown(doc))
    }
}
