//! Empty directory removal.
//!
//! This module removes the empty directories found in a directory tree: those
//! that hold no file anywhere below them. Nested chains of empty directories
//! are removed through their outermost member, and every directory is checked
//! again right before removal so that a file created in the meantime is never
//! deleted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::{
    classify::{classify_directories, outermost},
    listing::Listing,
};

/// Strategy for removing directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalStrategy {
    /// Permanently delete the directory.
    Permanent,

    /// Move the directory to the system trash (recoverable deletion).
    Trash,
}

impl RemovalStrategy {
    /// Create a removal strategy from the `use_trash` boolean flag.
    #[must_use]
    pub const fn from_use_trash(use_trash: bool) -> Self {
        if use_trash {
            Self::Trash
        } else {
            Self::Permanent
        }
    }
}

/// Structured result returned after a cleanup operation.
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Directories that were removed, relative to the cleaned root.
    pub removed: Vec<String>,

    /// Error messages for directories that could not be removed.
    pub errors: Vec<String>,
}

/// Removes empty directories below a root directory.
#[derive(Debug)]
pub struct Cleaner;

impl Cleaner {
    /// The directories to remove for a directory listing.
    ///
    /// These are the outermost empty directories; removing them removes every
    /// empty directory of the listing. A directory that could not be read,
    /// and every directory above it, is left out.
    #[must_use]
    pub fn plan(listing: &Listing) -> Vec<String> {
        let mut empty = classify_directories(&listing.entries).empty;
        empty.retain(|dir| !listing.may_hide_files(dir));

        outermost(&empty)
    }

    /// Remove `dirs` (relative to `root`) with the given strategy.
    ///
    /// Failures do not stop the run; each one is recorded in the returned
    /// [`CleanResult`].
    ///
    /// # Panics
    ///
    /// This method may panic if the progress bar template string is invalid,
    /// which cannot happen for the hardcoded template.
    #[must_use]
    pub fn remove_dirs(
        root: &Path,
        dirs: &[String],
        quiet: bool,
        removal_strategy: RemovalStrategy,
    ) -> CleanResult {
        let progress = if quiet {
            ProgressBar::hidden()
        } else {
            let action = match removal_strategy {
                RemovalStrategy::Permanent => "🧹 Removing empty directories...",
                RemovalStrategy::Trash => "🗑️  Moving empty directories to trash...",
            };
            println!("\n{}", action.cyan());

            let pb = ProgressBar::new(dirs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            pb
        };

        let mut result = CleanResult::default();

        for dir in dirs {
            let path = root.join(dir);

            match remove_empty_dir(&path, removal_strategy) {
                Ok(()) => {
                    progress.set_message(dir.clone());
                    result.removed.push(dir.clone());
                }
                Err(e) => result
                    .errors
                    .push(format!("Failed to remove {}: {e}", path.display())),
            }

            progress.inc(1);
        }

        progress.finish_with_message("✅ Cleanup complete");

        result
    }

    /// Print a human-readable cleanup summary to stdout.
    pub fn print_summary(result: &CleanResult) {
        if !result.errors.is_empty() {
            println!("\n{}", "⚠️  Some errors occurred during cleanup:".yellow());
            for error in &result.errors {
                eprintln!("  {}", error.red());
            }
        }

        println!("\n{}", "📊 Cleanup Summary:".bold());
        println!(
            "  ✅ Removed: {} directories",
            result.removed.len().to_string().green()
        );

        if !result.errors.is_empty() {
            println!(
                "  ❌ Failed to remove: {} directories",
                result.errors.len().to_string().red()
            );
        }
    }
}

/// Remove a directory that must not contain any file.
///
/// # Errors
///
/// Fails if the path is not a directory, if anything other than a directory
/// exists below it, if any part of it cannot be read, or if the removal
/// itself fails.
fn remove_empty_dir(path: &Path, removal_strategy: RemovalStrategy) -> Result<()> {
    if !path.is_dir() {
        bail!("not a directory");
    }

    if let Some(file) = first_non_directory(path)? {
        bail!("contains {}", file.display());
    }

    match removal_strategy {
        RemovalStrategy::Permanent => {
            // Children first, and only with `remove_dir`, which refuses
            // non-empty directories.
            for entry in WalkDir::new(path).contents_first(true) {
                fs::remove_dir(entry?.path())?;
            }
        }
        RemovalStrategy::Trash => {
            trash::delete(path).map_err(|e| anyhow::anyhow!("failed to move to trash: {e}"))?;
        }
    }

    Ok(())
}

/// The first entry below `path` that is not a directory, including symlinks.
///
/// # Errors
///
/// Fails on the first entry that cannot be read, since its contents are unknown.
fn first_non_directory(path: &Path) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|e| anyhow::anyhow!("cannot check contents: {e}"))?;

        if !entry.file_type().is_dir() {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::ArchiveEntry, listing::walk_directory};

    #[test]
    fn test_removal_strategy_from_use_trash() {
        assert_eq!(RemovalStrategy::from_use_trash(true), RemovalStrategy::Trash);
        assert_eq!(
            RemovalStrategy::from_use_trash(false),
            RemovalStrategy::Permanent
        );
    }

    #[test]
    fn test_plan_keeps_only_outermost() {
        let entries = vec![
            ArchiveEntry::dir("a"),
            ArchiveEntry::file("a/file"),
            ArchiveEntry::dir("b"),
            ArchiveEntry::dir("b/c"),
            ArchiveEntry::dir("b/c/d"),
            ArchiveEntry::file("b/file"),
            ArchiveEntry::dir("e"),
            ArchiveEntry::dir("e/f"),
        ];

        assert_eq!(Cleaner::plan(&Listing::from(entries)), vec!["b/c", "e"]);
    }

    #[test]
    fn test_plan_skips_unreadable_directories_and_ancestors() {
        let listing = Listing {
            entries: vec![
                ArchiveEntry::dir("outer"),
                ArchiveEntry::dir("outer/locked"),
                ArchiveEntry::dir("spare"),
            ],
            unreadable: ["outer/locked".to_string()].into_iter().collect(),
            errors: Vec::new(),
        };

        assert_eq!(Cleaner::plan(&listing), vec!["spare"]);
    }

    #[test]
    fn test_plan_is_empty_when_root_unreadable() {
        let listing = Listing {
            entries: vec![ArchiveEntry::dir("spare")],
            unreadable: [String::new()].into_iter().collect(),
            errors: Vec::new(),
        };

        assert!(Cleaner::plan(&listing).is_empty());
    }

    #[test]
    fn test_remove_dirs_permanent() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("empty/nested/deeper")).unwrap();
        fs::create_dir_all(tmp.path().join("full")).unwrap();
        fs::write(tmp.path().join("full/keep.txt"), "keep").unwrap();

        let result = Cleaner::remove_dirs(
            tmp.path(),
            &["empty".to_string()],
            true,
            RemovalStrategy::Permanent,
        );

        assert_eq!(result.removed, vec!["empty"]);
        assert!(result.errors.is_empty());
        assert!(!tmp.path().join("empty").exists());
        assert!(tmp.path().join("full/keep.txt").exists());
    }

    #[test]
    fn test_remove_dirs_refuses_directory_with_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("late/sub")).unwrap();
        fs::write(tmp.path().join("late/sub/new.txt"), "appeared").unwrap();

        let result = Cleaner::remove_dirs(
            tmp.path(),
            &["late".to_string(), "gone".to_string()],
            true,
            RemovalStrategy::Permanent,
        );

        assert!(result.removed.is_empty());
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("new.txt"));
        assert!(result.errors[1].contains("not a directory"));
        assert!(tmp.path().join("late/sub/new.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_counts_as_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("target")).unwrap();
        fs::create_dir_all(tmp.path().join("links")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("target"), tmp.path().join("links/t")).unwrap();

        assert!(
            first_non_directory(&tmp.path().join("links"))
                .unwrap()
                .is_some()
        );
        assert!(
            first_non_directory(&tmp.path().join("target"))
                .unwrap()
                .is_none()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_never_removed() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let locked = tmp.path().join("outer/locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("precious.txt"), "keep").unwrap();
        fs::create_dir_all(tmp.path().join("spare")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through mode 000.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let listing = walk_directory(tmp.path());
        let planned = Cleaner::plan(&listing);
        let contents = first_non_directory(&locked);
        let result = Cleaner::remove_dirs(
            tmp.path(),
            &["outer".to_string()],
            true,
            RemovalStrategy::Trash,
        );

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(planned, vec!["spare"]);
        assert!(contents.is_err());
        assert!(result.removed.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("cannot check contents"));
        assert!(locked.join("precious.txt").exists());
    }
}
