//! Error types for GoGi.

use gogi_core::TreeError;
use gogi_style::ConfigError;

/// The main error type for GoGi operations.
#[derive(Debug, thiserror::Error)]
pub enum GogiError {
    /// Tree lookup or naming error.
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Style configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for GoGi operations.
pub type Result<T> = std::result::Result<T, GogiError>;
