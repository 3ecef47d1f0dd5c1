//! Platform block JSON format
//!
//! Reading accepts `{ "blocks": [...], "metadata": {...} }` or
//! `{ "document": {...}, "blocks": [...] }`, with any text before the first
//! `{` ignored (log lines, shell prompts). Writing produces a linked tree
//! with `metadata`; see [`BlocksFormat::serialize_flat`] for the unlinked
//! shape used when appending to an existing document.

pub mod expand;
pub mod wire;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::{Document, FlatDocument};
use serde::Serialize;

/// Format implementation for the platform's block JSON
#[derive(Debug, Clone)]
pub struct BlocksFormat {
    pretty: bool,
}

impl Default for BlocksFormat {
    fn default() -> Self {
        BlocksFormat { pretty: true }
    }
}

impl BlocksFormat {
    /// Emit single-line JSON instead of indented JSON.
    pub fn compact() -> Self {
        BlocksFormat { pretty: false }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, FormatError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Unlinked blocks with no ids; tables carry their raw `_table` grid.
    pub fn serialize_flat(&self, flat: &FlatDocument) -> Result<String, FormatError> {
        self.to_json(&wire::emit_flat(flat))
    }

    /// A subtree as `{ children_id, descendants }`, e.g. an expanded table.
    pub fn serialize_descendants(&self, doc: &Document) -> Result<String, FormatError> {
        self.to_json(&wire::emit_descendants(doc))
    }
}

/// The input from its first `{` on.
fn extract_json(source: &str) -> Result<&str, FormatError> {
    source
        .find('{')
        .map(|start| source[start..].trim())
        .ok_or_else(|| FormatError::ParseError("no JSON object found in input".to_string()))
}

impl Format for BlocksFormat {
    fn name(&self) -> &str {
        "blocks"
    }

    fn description(&self) -> &str {
        "Cloud document block tree (JSON)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let input: wire::WireInput = serde_json::from_str(extract_json(source)?)?;
        Ok(wire::ingest(input))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        self.to_json(&wire::emit_tree(doc))
    }
}
