//! Termscan Stores - The two persisted, human-edited inputs of a scan.
//!
//! - [`blockdb`] - the blocked-term database: configuration parsing, pattern
//!   compilation, and the per-line match decision (`should_block`)
//! - [`allowdb`] - the allow-list of previously accepted findings
//!
//! Both stores are loaded once before any scanning starts and are immutable
//! for the duration of a run; loading fails fast on malformed content.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod allowdb;
pub mod blockdb;
pub mod error;

// Re-export commonly used types
pub use allowdb::AllowDb;
pub use blockdb::{occurrence_starts, ConfigEntry, ExclusionRule, TermDatabase, DEFAULT_TERMS};
pub use error::{AllowDbError, AllowDbResult, BlockDbError, BlockDbResult};
