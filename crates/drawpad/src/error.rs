//! DrawPad error types

use drawpad_paint::PathParseError;
use thiserror::Error;

/// Errors surfaced by the fallible DrawPad entry points.
///
/// The imperative widget handle itself never fails; these come from strict
/// path validation and configuration loading.
#[derive(Error, Debug)]
pub enum DrawPadError {
    /// A caller-supplied path string is not valid path data
    #[error("invalid path data at index {index}: {source}")]
    InvalidPath {
        index: usize,
        #[source]
        source: PathParseError,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for DrawPad operations
pub type Result<T> = std::result::Result<T, DrawPadError>;
