//! Error types for synpane

use thiserror::Error;

/// Result type alias for synpane operations
pub type Result<T> = std::result::Result<T, PaneError>;

/// Errors raised by mutations, configuration and pattern compilation.
///
/// Queries against the token index never fail; they answer `None` or an
/// empty sequence instead.
#[derive(Error, Debug)]
pub enum PaneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store could not serve the requested location
    #[error("Bad location: offset {offset}, length {length} (document length {doc_len})")]
    BadLocation {
        offset: usize,
        length: usize,
        doc_len: usize,
    },

    /// A search pattern failed to compile
    #[error("Pattern syntax error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown token type: {0}")]
    UnknownTokenType(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("{0}")]
    Message(String),
}

impl PaneError {
    /// Build a bad-location error for a request against a store of `doc_len` bytes
    pub fn bad_location(offset: usize, length: usize, doc_len: usize) -> Self {
        PaneError::BadLocation {
            offset,
            length,
            doc_len,
        }
    }

    /// Whether this is a backing-store access failure
    pub fn is_bad_location(&self) -> bool {
        matches!(self, PaneError::BadLocation { .. })
    }
}
