//! Error types for loading style configuration.

use std::path::PathBuf;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading style defaults.
///
/// Style resolution itself never fails; malformed property values fall back
/// to defaults. Only reading and parsing a configuration file can error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read style defaults '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error.
    #[error("Failed to parse style defaults: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
