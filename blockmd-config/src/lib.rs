//! Shared configuration loader for the blockmd toolchain.
//!
//! `defaults/blockmd.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into [`BlockmdConfig`].

use blockmd_babel::{ExpandOptions, ScanOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/blockmd.default.toml");

/// Top-level configuration consumed by blockmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockmdConfig {
    pub convert: ConvertConfig,
    pub log: LogConfig,
}

/// Markdown scanning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_title: String,
    pub table: TableConfig,
}

/// Column width tuning for tables expanded into cells.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TableConfig {
    pub min_column_width: u32,
    pub max_column_width: u32,
    pub char_width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive, e.g. `warn` or `blockmd_babel=debug`.
    pub level: String,
}

impl From<TableConfig> for ExpandOptions {
    fn from(config: TableConfig) -> Self {
        ExpandOptions {
            min_column_width: config.min_column_width,
            max_column_width: config.max_column_width,
            char_width: config.char_width,
        }
    }
}

impl From<&ConvertConfig> for ScanOptions {
    fn from(config: &ConvertConfig) -> Self {
        ScanOptions {
            default_title: config.default_title.clone(),
            table: config.table.into(),
        }
    }
}

impl From<ConvertConfig> for ScanOptions {
    fn from(config: ConvertConfig) -> Self {
        ScanOptions {
            default_title: config.default_title,
            table: config.table.into(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (e.g. `convert.default_title`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BlockmdConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BlockmdConfig, ConfigError> {
    Loader::new().build()
}
