//! Directory classification for archive listings.
//!
//! Given a flat listing of `(path, is_dir)` entries, as produced by reading the
//! member list of a tarball, this module works out which directories are
//! *empty* (declared, but no file lives anywhere below them) and which are
//! *missing* (implied by a file's path, but never declared).
//!
//! Paths use `/` as the separator and carry no trailing separator. They are
//! treated as opaque strings: no normalisation happens here, that is the job of
//! whatever produced the listing (see [`crate::listing`]).

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::Serialize;

/// A single member of an archive listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ArchiveEntry {
    /// `/`-separated path, without a trailing separator.
    pub path: String,

    /// Whether the member is a directory.
    pub is_dir: bool,
}

impl ArchiveEntry {
    /// Create a directory entry.
    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    /// Create a file entry.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }
}

impl<P: Into<String>> From<(P, bool)> for ArchiveEntry {
    fn from((path, is_dir): (P, bool)) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }
}

impl From<&ArchiveEntry> for ArchiveEntry {
    fn from(entry: &ArchiveEntry) -> Self {
        entry.clone()
    }
}

/// Which directory sets to report.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Default)]
pub enum ClassifyMode {
    /// Declared directories with no file anywhere below them
    #[default]
    Empty,

    /// Directories implied by file paths but never declared
    Missing,

    /// Both of the above
    Both,
}

impl ClassifyMode {
    /// Whether the empty-directory set is part of this mode.
    #[must_use]
    pub const fn includes_empty(self) -> bool {
        matches!(self, Self::Empty | Self::Both)
    }

    /// Whether the missing-directory set is part of this mode.
    #[must_use]
    pub const fn includes_missing(self) -> bool {
        matches!(self, Self::Missing | Self::Both)
    }
}

/// Result of [`classify_directories`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DirClassification {
    /// Declared directories that are not an ancestor of any file.
    pub empty: BTreeSet<String>,

    /// Ancestors of files that were never declared as directories.
    pub missing: BTreeSet<String>,
}

impl DirClassification {
    /// `true` when neither set has any member.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.empty.is_empty() && self.missing.is_empty()
    }
}

/// Classify the directories of an archive listing.
///
/// Every proper ancestor of every file is collected into an ancestor set; the
/// walk up a file's parent chain stops at the first ancestor that is already
/// known, since everything above it was added when it was first seen. Then:
///
/// - `empty   = declared directories - ancestors`
/// - `missing = ancestors - declared directories`
///
/// The result depends only on the set of entries, not on their order or on
/// duplicates.
///
/// # Examples
///
/// ```
/// # use ilan_dev::classify::classify_directories;
/// let result = classify_directories([("a", true), ("a/b", true), ("a/file", false), ("c/file", false)]);
/// assert!(result.empty.contains("a/b"));
/// assert!(result.missing.contains("c"));
/// ```
#[must_use]
pub fn classify_directories<I, E>(entries: I) -> DirClassification
where
    I: IntoIterator<Item = E>,
    E: Into<ArchiveEntry>,
{
    let mut declared = BTreeSet::new();
    let mut ancestors: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        let entry = entry.into();

        if entry.is_dir {
            declared.insert(entry.path);
            continue;
        }

        let mut path = entry.path.as_str();
        while let Some(parent) = parent_of(path) {
            if ancestors.contains(parent) {
                break;
            }
            ancestors.insert(parent.to_string());
            path = parent;
        }
    }

    DirClassification {
        empty: declared.difference(&ancestors).cloned().collect(),
        missing: ancestors.difference(&declared).cloned().collect(),
    }
}

/// Declared directories that contain no file anywhere in their subtree.
#[must_use]
pub fn empty_directories<I, E>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = E>,
    E: Into<ArchiveEntry>,
{
    classify_directories(entries).empty
}

/// Directories implied by file paths but absent from the listing.
#[must_use]
pub fn missing_directories<I, E>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = E>,
    E: Into<ArchiveEntry>,
{
    classify_directories(entries).missing
}

/// Reduce a set of directories to those with no proper ancestor in the set.
///
/// Removing the returned directories removes every directory of `dirs`.
#[must_use]
pub fn outermost(dirs: &BTreeSet<String>) -> Vec<String> {
    dirs.iter()
        .filter(|dir| {
            let mut path = dir.as_str();
            while let Some(parent) = parent_of(path) {
                if dirs.contains(parent) {
                    return false;
                }
                path = parent;
            }
            true
        })
        .cloned()
        .collect()
}

/// The parent of a `/`-separated path, or `None` at the top level.
fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}
