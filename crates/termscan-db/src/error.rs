//! Store error types.
//!
//! Both stores fail fast on malformed content: a wrong term database or
//! allow-list silently produces wrong scan results, so loading aborts on the
//! first bad line rather than dropping it.

use thiserror::Error;

/// Blocked-term database errors.
#[derive(Debug, Error)]
pub enum BlockDbError {
    /// A configuration line with no term before the exclusion separator.
    #[error("malformed term database line: '{line}'")]
    MalformedLine {
        /// The offending configuration line, verbatim
        line: String,
    },

    /// A term or exclusion fragment that does not compile as a pattern.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern fragment that failed to compile
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// I/O error reading or creating the database file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Allow-list store errors.
#[derive(Debug, Error)]
pub enum AllowDbError {
    /// An entry that does not parse as `file:line_number:text`.
    #[error("malformed allow-list line: '{line}'")]
    MalformedLine {
        /// The offending raw line, verbatim
        line: String,
    },

    /// I/O error reading the allow-list file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for blocked-term database operations.
pub type BlockDbResult<T> = std::result::Result<T, BlockDbError>;

/// Result type alias for allow-list operations.
pub type AllowDbResult<T> = std::result::Result<T, AllowDbError>;
