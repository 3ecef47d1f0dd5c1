//! Error types for format operations

/// Errors that can occur at the format boundary.
///
/// Conversion itself is best-effort and never fails; these only come from
/// looking formats up and from reading input that is not JSON at all.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Input could not be read as the source format
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
