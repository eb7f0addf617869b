//! Allow-list store: previously accepted findings.
//!
//! The allow-list is a line-oriented file of `file:line_number:text` entries
//! (optionally `PROBLEM:`-prefixed, as appended by the external review
//! workflow). It is loaded once at startup, immutable for the run, and never
//! written back by this tool.

use crate::error::{AllowDbError, AllowDbResult};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use termscan_core::Finding;

/// In-memory index of approved findings.
///
/// Keyed `line_text -> file_path -> line numbers`, because many approved
/// entries share identical text across files.
#[derive(Debug, Default)]
pub struct AllowDb {
    entries: HashMap<String, HashMap<String, HashSet<u32>>>,
}

impl AllowDb {
    /// Load the allow-list from `path`.
    ///
    /// A missing file is not an error: it means nothing is pre-approved.
    ///
    /// # Errors
    /// Aborts on the first malformed entry (fewer than three parts, or a
    /// non-integer line number), quoting the offending raw line. Malformed
    /// entries are never silently ignored.
    pub fn load(path: &Path) -> AllowDbResult<Self> {
        let mut db = Self::default();

        if !path.exists() {
            tracing::info!("Allowed db file {} not found", path.display());
            return Ok(db);
        }

        tracing::info!("Reading allowed db {}", path.display());
        let contents = fs::read_to_string(path)?;
        for raw in contents.lines() {
            if raw.trim().is_empty() {
                continue;
            }
            let finding = Finding::parse(raw).map_err(|e| {
                tracing::error!("Failed to parse allowed db line: {}", e);
                AllowDbError::MalformedLine {
                    line: raw.to_string(),
                }
            })?;
            db.insert(finding);
        }

        let num_files: usize = db
            .entries
            .values()
            .flat_map(HashMap::keys)
            .collect::<HashSet<_>>()
            .len();
        tracing::info!(
            "Found {} allowed lines across {} files",
            db.entries.len(),
            num_files
        );

        Ok(db)
    }

    fn insert(&mut self, finding: Finding) {
        self.entries
            .entry(finding.text)
            .or_default()
            .entry(finding.file)
            .or_default()
            .insert(finding.line_number);
    }

    /// Exact-triple membership lookup.
    #[must_use]
    pub fn contains(&self, file: &str, line_number: u32, text: &str) -> bool {
        self.entries
            .get(text)
            .and_then(|files| files.get(file))
            .is_some_and(|numbers| numbers.contains(&line_number))
    }

    /// Membership lookup for a raw `file:line_number:text` finding line.
    ///
    /// A line that does not parse as a finding is treated as not approved,
    /// so it will still be reported.
    #[must_use]
    pub fn contains_line(&self, raw: &str) -> bool {
        match Finding::parse(raw) {
            Ok(finding) => self.contains(&finding.file, finding.line_number, &finding.text),
            Err(_) => false,
        }
    }

    /// Number of distinct approved line texts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no approvals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
