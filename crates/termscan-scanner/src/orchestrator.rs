//! Scan orchestrator: fans paths out to a bounded worker pool and streams
//! surviving lines back in completion order.
//!
//! The compiled term database is built once by the caller and shared
//! read-only with every worker; the only shared mutable resource is the
//! result channel, which delivers each path's result set as one unit.

use crate::error::{ScanError, ScanResult, SearchError};
use crate::progress::ProgressTracker;
use crate::search::{GrepSearch, LineSearch, SearchTarget};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use termscan_core::{ScanOptions, ScanSettings};
use termscan_db::TermDatabase;
use tokio::sync::mpsc;

/// Raw output lines longer than this are discarded as pathological or
/// binary content rather than evaluated.
const MAX_LINE_LEN: usize = 1000;

/// Line patterns always dropped by the search primitive, even when they
/// matched a term: search-tool error lines, binary-file markers, the inline
/// suppression marker, and a binary-in-text artifact.
const LINE_SKIP_PATTERNS: &[&str] = &[
    "^grep: ",
    "^Binary file ",
    "term-allowed",
    "\"image/png\":",
];

/// Build the denylist pattern handed to the search primitive.
///
/// With `no_term_allowed` set the inline `term-allowed` marker is no longer
/// honored, so lines carrying it stay in the candidate set.
#[must_use]
pub fn line_skip_pattern(no_term_allowed: bool) -> String {
    LINE_SKIP_PATTERNS
        .iter()
        .filter(|p| !(no_term_allowed && **p == "term-allowed"))
        .copied()
        .collect::<Vec<_>>()
        .join("|")
}

/// All surviving lines from one scanned path, delivered atomically.
#[derive(Debug, Clone)]
pub struct PathBatch {
    /// The path this batch came from
    pub path: String,
    /// Surviving lines in search-output order (may be empty)
    pub lines: Vec<String>,
}

/// Orchestrates scanning a list of paths across a fixed-size worker pool.
#[derive(Clone)]
pub struct ScanOrchestrator {
    /// Compiled term database, shared read-only with every worker
    db: Arc<TermDatabase>,
    /// The external line-search primitive
    search: Arc<dyn LineSearch>,
    settings: ScanSettings,
    options: ScanOptions,
}

impl ScanOrchestrator {
    /// Create a new orchestrator over an explicit search primitive.
    #[must_use]
    pub fn new(
        db: Arc<TermDatabase>,
        search: Arc<dyn LineSearch>,
        settings: ScanSettings,
        options: ScanOptions,
    ) -> Self {
        Self {
            db,
            search,
            settings,
            options,
        }
    }

    /// Create a new orchestrator backed by the production grep search.
    #[must_use]
    pub fn with_grep(db: Arc<TermDatabase>, settings: ScanSettings, options: ScanOptions) -> Self {
        Self::new(db, Arc::new(GrepSearch::new()), settings, options)
    }

    /// Scan `paths`, streaming each path's surviving lines back as soon as
    /// that path completes.
    ///
    /// The stream is finite and not restartable. Batches arrive in
    /// completion order, not submission order; within a batch, line order is
    /// the search primitive's output order. A fatal search failure is
    /// delivered as an `Err` item and ends the stream early; per-path
    /// timeouts only empty that path's batch.
    #[must_use]
    pub fn scan(&self, paths: Vec<String>) -> mpsc::Receiver<ScanResult<PathBatch>> {
        let (tx, rx) = mpsc::channel(self.settings.workers.max(1));
        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run_scan(paths, tx).await;
        });
        rx
    }

    async fn run_scan(&self, paths: Vec<String>, tx: mpsc::Sender<ScanResult<PathBatch>>) {
        let workers = self.settings.workers.max(1);
        let mut progress = ProgressTracker::new(&["paths", "lines"]);
        let mut futures = FuturesUnordered::new();

        for path in paths {
            futures.push(self.scan_path(path));

            // Respect the worker limit, draining completions as they come
            while futures.len() >= workers {
                if let Some(result) = futures.next().await {
                    if !Self::deliver(result, &tx, &mut progress).await {
                        return;
                    }
                }
            }
        }

        while let Some(result) = futures.next().await {
            if !Self::deliver(result, &tx, &mut progress).await {
                return;
            }
        }

        progress.end();
    }

    /// Forward one completed path result; returns `false` when the scan
    /// should stop (fatal error, or the receiver hung up).
    async fn deliver(
        result: ScanResult<PathBatch>,
        tx: &mpsc::Sender<ScanResult<PathBatch>>,
        progress: &mut ProgressTracker,
    ) -> bool {
        match result {
            Ok(batch) => {
                progress.increment("paths");
                progress.add("lines", batch.lines.len() as u64);
                progress.message(false);
                tx.send(Ok(batch)).await.is_ok()
            }
            Err(e) => {
                tracing::error!("Scan failed: {}", e);
                let _ = tx.send(Err(e)).await;
                false
            }
        }
    }

    /// Scan one path to completion: search, guard, decide.
    async fn scan_path(&self, path: String) -> ScanResult<PathBatch> {
        let target = SearchTarget::for_path(Path::new(&path));
        let skip_pattern = line_skip_pattern(self.options.no_term_allowed);
        let limit = Duration::from_secs(self.settings.search_timeout_secs);

        let raw_lines = match self
            .search
            .search(self.db.combined_pattern(), &target, &skip_pattern, limit)
            .await
        {
            Ok(lines) => lines,
            Err(SearchError::Timeout { .. }) => {
                tracing::warn!("Search timed out for {}, path yields no findings", path);
                return Ok(PathBatch {
                    path,
                    lines: Vec::new(),
                });
            }
            Err(e) => {
                tracing::error!("Search failed for {}: {}", path, e);
                return Err(e.into());
            }
        };

        let mut lines = Vec::new();
        for line in raw_lines {
            if line.is_empty() {
                continue;
            }
            if line.len() > MAX_LINE_LEN {
                let preview: String = line.chars().take(100).collect();
                tracing::warn!("Line too long ({} chars), discarding: {}...", line.len(), preview);
                continue;
            }
            if self.db.should_block(&line) {
                lines.push(line);
            }
        }

        Ok(PathBatch { path, lines })
    }
}
