//! Error types for the symbol locator.
//!
//! Degenerate geometry is never an error: parallel line pairs, zero-length
//! segments and empty neighbourhoods are skipped where they occur. Only input
//! that cannot be trusted (malformed records, bad configuration) reaches the
//! caller.

/// Result type alias for locator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while locating symbols on a page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external record is missing a field or carries unusable values
    #[error("Malformed {record} record at index {index}: {reason}")]
    MalformedInput {
        /// Record family ("line", "span", "path", "glyph", "contour")
        record: &'static str,
        /// Position of the record within its family
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A weld identifier pattern failed to compile
    #[error("Invalid weld pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern as configured
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A tunable is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Overlay rendering error
    #[cfg(feature = "rendering")]
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::MalformedInput`] for a record family.
    pub fn malformed(record: &'static str, index: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            record,
            index,
            reason: reason.into(),
        }
    }
}
