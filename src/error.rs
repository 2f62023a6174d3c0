//! Error types for versioned-kv
//!
//! Store operations never fail; these errors come from the surfaces around
//! the store: loading configuration, reading command scripts, and encoding
//! output.

use thiserror::Error;

/// Result type alias for versioned-kv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for versioned-kv
#[derive(Error, Debug)]
pub enum Error {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A command script line could not be executed
    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
