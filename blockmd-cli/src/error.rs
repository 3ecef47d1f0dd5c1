//! CLI error types.

use blockmd_babel::FormatError;
use blockmd_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("could not detect format from filename '{0}', please specify --from")]
    UndetectedFormat(String),

    #[error("{0}")]
    Validation(String),
}
