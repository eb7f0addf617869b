//! Termscan Core - Foundation crate for the termscan scanner.
//!
//! This crate provides the shared types, error handling, and settings
//! management that the other termscan crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based settings with environment overrides
//! - [`types`] - Shared types (`Finding`, `ScanOptions`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ScanSettings, ALLOW_DB_FILE, BLOCK_DB_FILE, SETTINGS_FILE};
pub use error::{Result, SettingsError, SettingsResult, TermscanError};
pub use types::{Finding, ScanOptions, PROBLEM_PREFIX};
