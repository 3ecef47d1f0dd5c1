//! Format registry for format discovery and selection
//!
//! Formats are registered and retrieved by name, or detected from a file
//! extension. Conversion goes through the arena document: parse with the
//! source format, serialize with the target.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{BlocksFormat, MarkdownFormat};
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let json = registry.convert("# Title\n\n- item", "markdown", "blocks")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format of the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name and description of every format, sorted by name.
    pub fn describe_formats(&self) -> Vec<(String, String)> {
        self.list_formats()
            .into_iter()
            .map(|name| {
                let description = self.formats[&name].description().to_string();
                (name, description)
            })
            .collect()
    }

    /// Detect format from filename based on file extension (case-sensitive).
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc)
    }

    /// Parse `source` as `from` and serialize the result as `to`.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        // Fail on an unknown target before doing any work.
        self.get(to)?;
        let doc = self.parse(source, from)?;
        tracing::debug!(from, to, blocks = doc.len(), "converting");
        self.serialize(&doc, to)
    }

    /// Create a registry with the built-in formats.
    pub fn with_defaults() -> Self {
        Self::with_markdown(MarkdownFormat::default())
    }

    /// Built-in formats, with a configured Markdown scanner.
    pub fn with_markdown(markdown: MarkdownFormat) -> Self {
        let mut registry = Self::new();
        registry.register(markdown);
        registry.register(BlocksFormat::default());
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
