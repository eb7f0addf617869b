//! Shared types used across the termscan crates.
//!
//! This module defines the `Finding` triple produced by scans and the
//! boolean toggles the CLI layer hands to the core.

use crate::error::TermscanError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix applied to reported findings on stdout, and tolerated (and
/// stripped) on allow-list entries.
pub const PROBLEM_PREFIX: &str = "PROBLEM:";

/// A single finding: one line of source text containing a blocked term.
///
/// Findings travel as raw `file:line_number:text` lines between the search
/// primitive, the allow-list store, and the reporter. Only the first two
/// colons are structural; the text may itself contain colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Path of the file the line was found in
    pub file: String,
    /// 1-based line number within the file
    pub line_number: u32,
    /// The full line text, colons and all
    pub text: String,
}

impl Finding {
    /// Parse a raw `file:line_number:text` line into a `Finding`.
    ///
    /// A leading `PROBLEM:` marker is stripped first. Splits on the first
    /// two colons only, so colon characters in the text survive intact.
    ///
    /// # Errors
    /// Returns a validation error if the line has fewer than three parts or
    /// the line number is not a positive integer.
    pub fn parse(raw: &str) -> Result<Self, TermscanError> {
        let raw = raw
            .trim()
            .strip_prefix(PROBLEM_PREFIX)
            .unwrap_or(raw)
            .trim();

        let mut parts = raw.splitn(3, ':');
        let (file, number, text) = match (parts.next(), parts.next(), parts.next()) {
            (Some(file), Some(number), Some(text)) => (file, number, text),
            _ => {
                return Err(TermscanError::Validation(format!(
                    "expected file:line:text, got '{raw}'"
                )))
            }
        };

        let line_number: u32 = number.parse().map_err(|_| {
            TermscanError::Validation(format!("invalid line number '{number}' in '{raw}'"))
        })?;
        if line_number == 0 {
            return Err(TermscanError::Validation(format!(
                "line number must be at least 1 in '{raw}'"
            )));
        }

        Ok(Self {
            file: file.to_string(),
            line_number,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line_number, self.text)
    }
}

/// Behavior toggles handed down from the CLI layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Enable progress and debug reporting
    pub verbose: bool,
    /// Do not honor the inline `term-allowed` suppression marker
    pub no_term_allowed: bool,
    /// Skip the allow-list check entirely, reporting every match
    pub ignore_allowed_db: bool,
}
