//! Scan error types.

use std::time::Duration;
use thiserror::Error;

/// Errors from the external line-search primitive.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search invocation exceeded its wall-clock timeout.
    ///
    /// Non-fatal: the affected path contributes zero findings.
    #[error("search timed out after {timeout:?} for {path}")]
    Timeout {
        /// The path being searched when the timeout hit
        path: String,
        /// The configured per-invocation timeout
        timeout: Duration,
    },

    /// The search command could not be spawned or produced an I/O failure.
    ///
    /// Fatal: aborts the whole run.
    #[error("failed to run search command: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced through the scan result stream.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A fatal search-primitive failure.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

/// Result type alias for search-primitive operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for scan operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
