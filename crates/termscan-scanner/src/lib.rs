//! Termscan Scanner - Parallel scan orchestration.
//!
//! This crate fans a list of target paths out across a fixed-size worker
//! pool, runs the external line-search primitive per path, filters the
//! candidates through the compiled term database, and streams surviving
//! lines back in completion order while tracking throughput.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use termscan_core::{ScanOptions, ScanSettings};
//! use termscan_db::TermDatabase;
//! use termscan_scanner::ScanOrchestrator;
//!
//! let db = Arc::new(TermDatabase::load(".termscan.cfg".as_ref())?);
//! let orchestrator =
//!     ScanOrchestrator::with_grep(db, ScanSettings::default(), ScanOptions::default());
//!
//! let mut results = orchestrator.scan(paths);
//! while let Some(batch) = results.recv().await {
//!     for line in batch?.lines {
//!         println!("{line}");
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod search;

// Re-export commonly used types
pub use error::{ScanError, ScanResult, SearchError, SearchResult};
pub use orchestrator::{line_skip_pattern, PathBatch, ScanOrchestrator};
pub use progress::ProgressTracker;
pub use search::{GrepSearch, LineSearch, SearchTarget};
