//! Error types for tile buffer operations.

use thiserror::Error;

/// Errors produced while configuring or flushing a tile buffer.
#[derive(Error, Debug)]
pub enum BufferError {
    /// The options describe a buffer that cannot exist.
    #[error("invalid buffer options: {0}")]
    InvalidOptions(String),

    /// The options file could not be parsed.
    #[error("failed to parse buffer options: {0}")]
    Parse(#[from] toml::de::Error),

    /// The options file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The paint backend failed while drawing.
    #[error("paint backend error: {0}")]
    Backend(#[from] tessera_core::Error),
}

/// Result type alias for buffer operations.
pub type BufferResult<T> = std::result::Result<T, BufferError>;
