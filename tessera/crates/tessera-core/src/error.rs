//! Errors shared by the Tessera crates.

use thiserror::Error;

/// Errors raised by tiles, colors and paint backends.
#[derive(Error, Debug)]
pub enum Error {
    /// The output of a paint backend failed.
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),

    /// A color string was rejected.
    #[error(transparent)]
    Color(#[from] ColorParseError),

    /// A size or position outside what the target supports.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Why a color string could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Nothing to parse.
    #[error("color string is empty")]
    Empty,

    /// A hex color with a digit count other than 3, 4, 6 or 8.
    #[error("hex color has {0} digits")]
    BadLength(usize),

    /// A character that is not a hex digit.
    #[error("{0:?} is not a hex digit")]
    BadDigit(char),

    /// Neither a hex value nor a known name.
    #[error("unknown color {0:?}")]
    UnknownName(String),
}
