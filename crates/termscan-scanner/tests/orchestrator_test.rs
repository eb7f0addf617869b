//! Orchestrator behavior against a canned search primitive: completion-order
//! streaming, term filtering, oversized-line and timeout guards, and fatal
//! error propagation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use termscan_core::{ScanOptions, ScanSettings};
use termscan_db::TermDatabase;
use termscan_scanner::{
    LineSearch, PathBatch, ScanError, ScanOrchestrator, SearchError, SearchResult, SearchTarget,
};

enum MockResponse {
    Lines {
        lines: Vec<String>,
        delay: Duration,
    },
    Timeout,
    Fail,
}

struct MockSearch {
    responses: HashMap<String, MockResponse>,
}

impl MockSearch {
    fn new(responses: Vec<(&str, MockResponse)>) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .into_iter()
                .map(|(path, response)| (path.to_string(), response))
                .collect(),
        })
    }
}

#[async_trait]
impl LineSearch for MockSearch {
    async fn search(
        &self,
        _pattern: &str,
        target: &SearchTarget,
        _skip_pattern: &str,
        limit: Duration,
    ) -> SearchResult<Vec<String>> {
        let path = target.path().display().to_string();
        match self.responses.get(&path).expect("unexpected path") {
            MockResponse::Lines { lines, delay } => {
                tokio::time::sleep(*delay).await;
                Ok(lines.clone())
            }
            MockResponse::Timeout => Err(SearchError::Timeout {
                path,
                timeout: limit,
            }),
            MockResponse::Fail => Err(SearchError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "spawn failed",
            ))),
        }
    }
}

fn orchestrator(config: &str, search: Arc<MockSearch>, workers: usize) -> ScanOrchestrator {
    let db = Arc::new(TermDatabase::from_config(config).expect("valid config"));
    let settings = ScanSettings {
        workers,
        ..ScanSettings::default()
    };
    ScanOrchestrator::new(db, search, settings, ScanOptions::default())
}

async fn collect(mut rx: tokio::sync::mpsc::Receiver<Result<PathBatch, ScanError>>) -> Vec<Result<PathBatch, ScanError>> {
    let mut batches = Vec::new();
    while let Some(item) = rx.recv().await {
        batches.push(item);
    }
    batches
}

#[tokio::test]
async fn test_streams_in_completion_order() {
    let search = MockSearch::new(vec![
        (
            "slow.txt",
            MockResponse::Lines {
                lines: vec!["slow.txt:1:master copy".to_string()],
                delay: Duration::from_millis(150),
            },
        ),
        (
            "fast.txt",
            MockResponse::Lines {
                lines: vec!["fast.txt:1:master copy".to_string()],
                delay: Duration::from_millis(10),
            },
        ),
    ]);
    let orchestrator = orchestrator("master\n", search, 2);

    let rx = orchestrator.scan(vec!["slow.txt".to_string(), "fast.txt".to_string()]);
    let batches = collect(rx).await;

    let paths: Vec<String> = batches
        .into_iter()
        .map(|b| b.expect("no errors").path)
        .collect();
    assert_eq!(paths, vec!["fast.txt", "slow.txt"]);
}

#[tokio::test]
async fn test_lines_filtered_through_term_db() {
    let search = MockSearch::new(vec![(
        "f.txt",
        MockResponse::Lines {
            lines: vec![
                "f.txt:1:a subclass here".to_string(),
                "f.txt:2:sub alone".to_string(),
                String::new(),
            ],
            delay: Duration::ZERO,
        },
    )]);
    let orchestrator = orchestrator("sub :! subset, subclass\n", search, 1);

    let batches = collect(orchestrator.scan(vec!["f.txt".to_string()])).await;
    assert_eq!(batches.len(), 1);
    let batch = batches.into_iter().next().unwrap().expect("no errors");
    assert_eq!(batch.lines, vec!["f.txt:2:sub alone"]);
}

#[tokio::test]
async fn test_oversized_line_discarded() {
    let long_line = format!("f.txt:1:{}", "master ".repeat(200));
    assert!(long_line.len() > 1000);
    let search = MockSearch::new(vec![(
        "f.txt",
        MockResponse::Lines {
            lines: vec![long_line, "f.txt:2:short master line".to_string()],
            delay: Duration::ZERO,
        },
    )]);
    let orchestrator = orchestrator("master\n", search, 1);

    let batches = collect(orchestrator.scan(vec!["f.txt".to_string()])).await;
    let batch = batches.into_iter().next().unwrap().expect("no errors");
    assert_eq!(batch.lines, vec!["f.txt:2:short master line"]);
}

#[tokio::test]
async fn test_timeout_yields_empty_batch_without_aborting() {
    let search = MockSearch::new(vec![
        ("hangs.txt", MockResponse::Timeout),
        (
            "ok.txt",
            MockResponse::Lines {
                lines: vec!["ok.txt:1:master copy".to_string()],
                delay: Duration::ZERO,
            },
        ),
    ]);
    let orchestrator = orchestrator("master\n", search, 1);

    let batches = collect(orchestrator.scan(vec!["hangs.txt".to_string(), "ok.txt".to_string()])).await;
    assert_eq!(batches.len(), 2);

    let mut by_path = HashMap::new();
    for batch in batches {
        let batch = batch.expect("timeouts are not fatal");
        by_path.insert(batch.path.clone(), batch.lines);
    }
    assert!(by_path["hangs.txt"].is_empty());
    assert_eq!(by_path["ok.txt"], vec!["ok.txt:1:master copy"]);
}

#[tokio::test]
async fn test_fatal_search_error_ends_stream() {
    let search = MockSearch::new(vec![("broken.txt", MockResponse::Fail)]);
    let orchestrator = orchestrator("master\n", search, 1);

    let batches = collect(orchestrator.scan(vec!["broken.txt".to_string()])).await;
    assert_eq!(batches.len(), 1);
    assert!(matches!(batches[0], Err(ScanError::Search(_))));
}

#[tokio::test]
async fn test_line_order_preserved_within_batch() {
    let lines: Vec<String> = (1..=5).map(|n| format!("f.txt:{n}:master {n}")).collect();
    let search = MockSearch::new(vec![(
        "f.txt",
        MockResponse::Lines {
            lines: lines.clone(),
            delay: Duration::ZERO,
        },
    )]);
    let orchestrator = orchestrator("master\n", search, 4);

    let batches = collect(orchestrator.scan(vec!["f.txt".to_string()])).await;
    let batch = batches.into_iter().next().unwrap().expect("no errors");
    assert_eq!(batch.lines, lines);
}

#[tokio::test]
async fn test_single_worker_completes_all_paths() {
    let search = MockSearch::new(vec![
        (
            "a.txt",
            MockResponse::Lines {
                lines: vec!["a.txt:1:master".to_string()],
                delay: Duration::from_millis(20),
            },
        ),
        (
            "b.txt",
            MockResponse::Lines {
                lines: Vec::new(),
                delay: Duration::ZERO,
            },
        ),
        (
            "c.txt",
            MockResponse::Lines {
                lines: vec!["c.txt:9:master".to_string()],
                delay: Duration::ZERO,
            },
        ),
    ]);
    let orchestrator = orchestrator("master\n", search, 1);

    let batches = collect(orchestrator.scan(vec![
        "a.txt".to_string(),
        "b.txt".to_string(),
        "c.txt".to_string(),
    ]))
    .await;

    assert_eq!(batches.len(), 3);
    let total_lines: usize = batches
        .iter()
        .map(|b| b.as_ref().expect("no errors").lines.len())
        .sum();
    assert_eq!(total_lines, 2);
}
