//! External line-search primitive.
//!
//! The actual text search is delegated to a sandboxed subprocess (`grep`)
//! behind the [`LineSearch`] trait, so the orchestrator can be exercised
//! against canned results in tests. The primitive returns matching lines
//! prefixed `path:line_number:`, already filtered through a denylist of
//! patterns that must never surface as candidates.

use crate::error::{SearchError, SearchResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

/// Invocations slower than this are logged for operator visibility.
const SLOW_SEARCH: Duration = Duration::from_secs(5);

/// What a single search invocation runs against.
#[derive(Debug, Clone)]
pub enum SearchTarget {
    /// Search one file directly.
    File(PathBuf),
    /// Search the direct children of a directory (one level, non-recursive).
    Children(PathBuf),
}

impl SearchTarget {
    /// Classify a path: directories are searched through their children,
    /// anything else directly.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::Children(path.to_path_buf())
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// The underlying path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Children(path) => path,
        }
    }
}

/// A case-insensitive, line-oriented multi-file search.
#[async_trait]
pub trait LineSearch: Send + Sync {
    /// Search `target` for `pattern`, dropping lines matching
    /// `skip_pattern`, within `limit` wall-clock time.
    ///
    /// Returns matching lines in `path:line_number:text` form, in the order
    /// the underlying search produced them. Zero matches is an empty `Ok`.
    async fn search(
        &self,
        pattern: &str,
        target: &SearchTarget,
        skip_pattern: &str,
        limit: Duration,
    ) -> SearchResult<Vec<String>>;
}

/// Production [`LineSearch`]: `grep -E -iHn` piped through a `grep -E -v`
/// denylist pass, run via `sh -c` with a hard timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrepSearch;

impl GrepSearch {
    /// Create a new grep-backed search.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn command_line(pattern: &str, target: &SearchTarget, skip_pattern: &str) -> String {
        let (path, suffix) = match target {
            SearchTarget::File(path) => (path, ""),
            SearchTarget::Children(path) => (path, "/*"),
        };
        format!(
            "grep -E -iHn '{}' '{}'{} | grep -E -v '{}'",
            shell_escape(pattern),
            shell_escape(&path.display().to_string()),
            suffix,
            shell_escape(skip_pattern),
        )
    }
}

/// Escape a string for interpolation inside single quotes in `sh -c`.
fn shell_escape(s: &str) -> String {
    s.replace('\'', "'\\''")
}

#[async_trait]
impl LineSearch for GrepSearch {
    async fn search(
        &self,
        pattern: &str,
        target: &SearchTarget,
        skip_pattern: &str,
        limit: Duration,
    ) -> SearchResult<Vec<String>> {
        let command_line = Self::command_line(pattern, target, skip_pattern);
        tracing::debug!(command = %command_line, "running search");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&command_line).kill_on_drop(true);

        let start = Instant::now();
        let output = match timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(SearchError::Timeout {
                    path: target.path().display().to_string(),
                    timeout: limit,
                })
            }
        };

        let elapsed = start.elapsed();
        if elapsed > SLOW_SEARCH {
            tracing::warn!(
                "Long running search: {:.2}s for {}",
                elapsed.as_secs_f64(),
                command_line
            );
        }

        // Search exit status is not meaningful here: no-match and
        // fully-filtered output both exit non-zero.
        let n_errors = output
            .stderr
            .split(|b| *b == b'\n')
            .filter(|l| !l.is_empty())
            .count();
        if n_errors > 0 {
            tracing::debug!("{} stderr lines from search of {:?}", n_errors, target);
        }

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim().to_string())
            .collect();
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_for_file_and_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let file = dir.path().join("x.txt");
        std::fs::write(&file, "data\n").expect("write file");

        assert!(matches!(SearchTarget::for_path(&file), SearchTarget::File(_)));
        assert!(matches!(
            SearchTarget::for_path(dir.path()),
            SearchTarget::Children(_)
        ));
    }

    #[test]
    fn test_command_line_globs_directory_children() {
        let cmd = GrepSearch::command_line(
            "master|slave",
            &SearchTarget::Children(PathBuf::from("src")),
            "^grep: ",
        );
        assert!(cmd.contains("'src'/*"));
        assert!(cmd.contains("grep -E -iHn 'master|slave'"));
        assert!(cmd.contains("grep -E -v '^grep: '"));
    }

    #[test]
    fn test_command_line_plain_file() {
        let cmd = GrepSearch::command_line(
            "master",
            &SearchTarget::File(PathBuf::from("a.txt")),
            "^grep: ",
        );
        assert!(cmd.contains("'a.txt' |"));
    }

    #[test]
    fn test_shell_escape_single_quote() {
        assert_eq!(shell_escape("it's"), "it'\\''s");
    }
}
