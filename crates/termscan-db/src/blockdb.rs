//! Blocked-term database: configuration parsing and pattern compilation.
//!
//! The database is compiled once from a human-edited, line-oriented
//! configuration file and is immutable afterwards. Compilation produces
//! three artifacts: a combined search pattern handed to the external search
//! primitive, per-term exclusion rules for the match decision, and a
//! fast-path pattern of terms that block unconditionally.

use crate::error::{BlockDbError, BlockDbResult};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Terms written to a freshly created configuration file.
///
/// Each entry is a case-insensitive pattern fragment, so `white?list` also
/// matches `whitlist`-free spellings such as `whitelist`.
pub const DEFAULT_TERMS: &[&str] = &[
    "master",
    "slave",
    "white?list",
    "black?list",
    "grandfather",
    "dummy",
    "stupid",
];

/// Separator between a term and its exclusion-phrase list. Whitespace
/// around it is trimmed.
const EXCLUSION_SEPARATOR: &str = ":!";

/// One parsed line of the term configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEntry {
    /// A bare term, blocking unconditionally.
    Plain(String),
    /// A term whose occurrences are tolerated when covered by an exclusion
    /// phrase.
    WithExclusions {
        /// The term pattern fragment
        term: String,
        /// The exclusion phrases, deduplicated and sorted
        exclusions: BTreeSet<String>,
    },
}

impl ConfigEntry {
    fn into_parts(self) -> (String, BTreeSet<String>) {
        match self {
            Self::Plain(term) => (term, BTreeSet::new()),
            Self::WithExclusions { term, exclusions } => (term, exclusions),
        }
    }
}

/// Parse one configuration line.
///
/// Blank lines yield `None`. A line is either a bare term or
/// `TERM :! EXC1, EXC2, ...`; whitespace is trimmed around the separator and
/// around each list entry. An exclusion list that is empty after trimming
/// degrades to a plain term.
///
/// # Errors
/// Returns [`BlockDbError::MalformedLine`] when the term before the
/// separator is empty. Nothing is ever silently dropped.
pub fn parse_config_line(line: &str) -> BlockDbResult<Option<ConfigEntry>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some((term, exclusions)) = line.split_once(EXCLUSION_SEPARATOR) else {
        return Ok(Some(ConfigEntry::Plain(line.to_string())));
    };

    let term = term.trim();
    if term.is_empty() {
        return Err(BlockDbError::MalformedLine {
            line: line.to_string(),
        });
    }

    let exclusions: BTreeSet<String> = exclusions
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect();

    if exclusions.is_empty() {
        Ok(Some(ConfigEntry::Plain(term.to_string())))
    } else {
        Ok(Some(ConfigEntry::WithExclusions {
            term: term.to_string(),
            exclusions,
        }))
    }
}

/// Find the start offsets of all occurrences of `pattern` in `line`,
/// including overlapping ones.
///
/// Occurrences are anchored by start offset: the scan restarts one character
/// past each match start, so two matches beginning at different offsets are
/// both reported even when one contains the other.
#[must_use]
pub fn occurrence_starts(pattern: &Regex, line: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut at = 0;
    while at <= line.len() {
        let Some(m) = pattern.find_at(line, at) else {
            break;
        };
        starts.push(m.start());
        let mut next = m.start() + 1;
        while next < line.len() && !line.is_char_boundary(next) {
            next += 1;
        }
        at = next;
    }
    starts
}

/// A compiled `(term, exclusions)` rule for one exclusion-bearing term.
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    term_pattern: Regex,
    exclusion_pattern: Regex,
}

impl ExclusionRule {
    /// Start offsets of every term occurrence on `line`.
    #[must_use]
    pub fn term_starts(&self, line: &str) -> Vec<usize> {
        occurrence_starts(&self.term_pattern, line)
    }

    /// Start offsets of every exclusion-phrase occurrence on `line`.
    #[must_use]
    pub fn exclusion_starts(&self, line: &str) -> Vec<usize> {
        occurrence_starts(&self.exclusion_pattern, line)
    }

    /// Source string of the compiled term pattern.
    #[must_use]
    pub fn term_pattern_str(&self) -> &str {
        self.term_pattern.as_str()
    }

    /// Source string of the compiled exclusion pattern.
    #[must_use]
    pub fn exclusion_pattern_str(&self) -> &str {
        self.exclusion_pattern.as_str()
    }
}

/// The compiled blocked-term database. Immutable after construction.
#[derive(Debug)]
pub struct TermDatabase {
    terms: BTreeSet<String>,
    combined_pattern: String,
    exclusion_rules: Vec<ExclusionRule>,
    exclusion_free_pattern: Option<Regex>,
}

impl TermDatabase {
    /// Load and compile the database from `path`.
    ///
    /// If the file does not exist it is first created with
    /// [`DEFAULT_TERMS`], so the tool is usable out of the box and the
    /// configuration is self-documenting on first run.
    pub fn load(path: &Path) -> BlockDbResult<Self> {
        if path.exists() {
            tracing::info!("Reading existing blocked db config file {}", path.display());
        } else {
            tracing::warn!(
                "Creating blocked db config file {}, using defaults",
                path.display()
            );
            let mut contents = DEFAULT_TERMS.join("\n");
            contents.push('\n');
            fs::write(path, contents)?;
        }

        let contents = fs::read_to_string(path)?;
        Self::from_config(&contents)
    }

    /// Compile a database from configuration text.
    ///
    /// Later duplicate definitions of a term replace earlier ones; pattern
    /// strings are built from sorted term order so equal configuration
    /// content always compiles to an equal database.
    pub fn from_config(contents: &str) -> BlockDbResult<Self> {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for line in contents.lines() {
            if let Some(entry) = parse_config_line(line)? {
                let (term, exclusions) = entry.into_parts();
                entries.insert(term, exclusions);
            }
        }
        Self::compile(&entries)
    }

    fn compile(entries: &BTreeMap<String, BTreeSet<String>>) -> BlockDbResult<Self> {
        let mut terms = BTreeSet::new();
        let mut non_exclusion_terms = BTreeSet::new();
        let mut exclusion_rules = Vec::new();

        for (term, exclusions) in entries {
            terms.insert(term.clone());
            if exclusions.is_empty() {
                non_exclusion_terms.insert(term.clone());
            } else {
                let term_fragment = format!("{term}.*");
                let exclusion_fragment = format!(
                    "{}.*",
                    exclusions.iter().cloned().collect::<Vec<_>>().join(".*|")
                );
                exclusion_rules.push(ExclusionRule {
                    term_pattern: build_pattern(&term_fragment)?,
                    exclusion_pattern: build_pattern(&exclusion_fragment)?,
                });
            }
        }

        let combined_pattern = terms.iter().cloned().collect::<Vec<_>>().join("|");

        let exclusion_free_pattern = if non_exclusion_terms.is_empty() {
            None
        } else {
            let fragment = non_exclusion_terms
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("|");
            Some(build_pattern(&fragment)?)
        };

        tracing::debug!("Search terms: {:?}", terms);
        tracing::debug!("Combined search pattern: {}", combined_pattern);
        tracing::debug!("Terms without exclusions: {:?}", non_exclusion_terms);
        tracing::debug!("Exclusion rules: {}", exclusion_rules.len());

        Ok(Self {
            terms,
            combined_pattern,
            exclusion_rules,
            exclusion_free_pattern,
        })
    }

    /// Decide whether a candidate line should be reported.
    ///
    /// The line is already known to contain some raw term occurrence (the
    /// search primitive pre-filters with the combined pattern); this is the
    /// definitive per-match decision applying exclusion-phrase logic.
    #[must_use]
    pub fn should_block(&self, line: &str) -> bool {
        // No exclusion rules at all: every configured term blocks
        // unconditionally, so the pre-filter match stands.
        if self.exclusion_rules.is_empty() {
            return true;
        }

        // An exclusion-free term on the line blocks regardless of any
        // exclusion-bearing term also present.
        if let Some(pattern) = &self.exclusion_free_pattern {
            if pattern.is_match(line) {
                return true;
            }
        }

        for rule in &self.exclusion_rules {
            let found = rule.term_starts(line);
            if found.is_empty() {
                continue;
            }
            // Every term occurrence must be an exclusion occurrence at the
            // same offset; any mismatch in count or position blocks.
            let excluded = rule.exclusion_starts(line);
            if found != excluded {
                return true;
            }
        }
        false
    }

    /// The configured term set, in sorted order.
    #[must_use]
    pub fn terms(&self) -> &BTreeSet<String> {
        &self.terms
    }

    /// The combined alternation pattern over all terms.
    ///
    /// Non-empty iff the term set is non-empty. This is handed to the
    /// external search primitive, which applies case-insensitivity itself.
    #[must_use]
    pub fn combined_pattern(&self) -> &str {
        &self.combined_pattern
    }

    /// The compiled exclusion rules, in sorted term order.
    #[must_use]
    pub fn exclusion_rules(&self) -> &[ExclusionRule] {
        &self.exclusion_rules
    }

    /// Source string of the exclusion-free fast-path pattern, if any term
    /// declared no exclusions.
    #[must_use]
    pub fn exclusion_free_pattern_str(&self) -> Option<&str> {
        self.exclusion_free_pattern.as_ref().map(Regex::as_str)
    }

    /// Whether no terms are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn build_pattern(fragment: &str) -> BlockDbResult<Regex> {
    RegexBuilder::new(fragment)
        .case_insensitive(true)
        .build()
        .map_err(|source| BlockDbError::InvalidPattern {
            pattern: fragment.to_string(),
            source,
        })
}
