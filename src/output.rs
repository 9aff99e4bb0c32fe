//! Structured JSON output for scripting and piping.
//!
//! When the `--json` flag is passed, each command serializes one of these
//! structures to stdout as a single JSON object, replacing all human-readable
//! output.

use humansize::{DECIMAL, format_size};
use serde::Serialize;

use crate::{
    classify::{ClassifyMode, DirClassification},
    cleaner::CleanResult,
    utils::human_bytes,
};

/// Output of the `lcp` command.
#[derive(Serialize, Debug)]
pub struct JsonLcp {
    /// Number of input strings.
    pub count: usize,

    /// The common prefix, or `null` when there was no input.
    pub prefix: Option<String>,
}

/// Output of the `size` command.
#[derive(Serialize, Debug)]
pub struct JsonSizes {
    /// One entry per argument, in argument order.
    pub sizes: Vec<JsonSizeEntry>,
}

/// A single formatted size.
#[derive(Serialize, Debug)]
pub struct JsonSizeEntry {
    /// The argument as given on the command line.
    pub input: String,

    /// The size in bytes.
    pub bytes: u64,

    /// Compact binary rendering (e.g. `"1.0M"`).
    pub human: String,

    /// Decimal rendering (e.g. `"1.05 MB"`).
    pub decimal: String,
}

impl JsonSizeEntry {
    /// Build an entry for `bytes`, parsed from `input`.
    #[must_use]
    pub fn new(input: &str, bytes: u64) -> Self {
        Self {
            input: input.to_string(),
            bytes,
            human: human_bytes(bytes),
            decimal: format_size(bytes, DECIMAL),
        }
    }
}

/// Output of the `dirs` command.
#[derive(Serialize, Debug)]
pub struct JsonDirs {
    /// The listing that was classified.
    pub source: String,

    /// Number of entries in the listing after filtering.
    pub total_entries: usize,

    /// Empty directories. Present unless the mode is `missing`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<Vec<String>>,

    /// Missing directories. Present unless the mode is `empty`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl JsonDirs {
    /// Select the sets requested by `mode` from a classification.
    #[must_use]
    pub fn from_classification(
        source: String,
        total_entries: usize,
        classification: &DirClassification,
        mode: ClassifyMode,
    ) -> Self {
        Self {
            source,
            total_entries,
            empty: mode
                .includes_empty()
                .then(|| classification.empty.iter().cloned().collect()),
            missing: mode
                .includes_missing()
                .then(|| classification.missing.iter().cloned().collect()),
        }
    }
}

/// Output of the `cleanup` command.
#[derive(Serialize, Debug)]
pub struct JsonCleanup {
    /// The execution mode: `"dry_run"` or `"cleanup"`.
    pub mode: String,

    /// The directory tree that was cleaned.
    pub root: String,

    /// Directories selected for removal.
    pub planned: Vec<String>,

    /// Present only when an actual cleanup was performed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<JsonCleanupResult>,
}

/// Results of a cleanup operation.
#[derive(Serialize, Debug)]
pub struct JsonCleanupResult {
    /// Directories that were removed.
    pub removed: Vec<String>,

    /// Error messages for directories that could not be removed.
    pub errors: Vec<String>,
}

impl JsonCleanup {
    /// Output for a dry run.
    #[must_use]
    pub fn dry_run(root: String, planned: Vec<String>) -> Self {
        Self {
            mode: "dry_run".to_string(),
            root,
            planned,
            cleanup: None,
        }
    }

    /// Output after directories were removed.
    #[must_use]
    pub fn cleanup(root: String, planned: Vec<String>, result: &CleanResult) -> Self {
        Self {
            mode: "cleanup".to_string(),
            root,
            planned,
            cleanup: Some(JsonCleanupResult {
                removed: result.removed.clone(),
                errors: result.errors.clone(),
            }),
        }
    }
}
