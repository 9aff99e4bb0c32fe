//! Building archive listings from tarballs, directory trees and text files.
//!
//! The classifier in [`crate::classify`] works on an in-memory list of
//! [`ArchiveEntry`] values. This module produces that list from wherever the
//! entries actually live, and cleans up the path spellings archives tend to
//! use (`./a/b`, `a/b/`) so that the classifier sees plain `a/b` paths.

use std::{
    collections::BTreeSet,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use colored::Colorize;
use flate2::read::GzDecoder;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use tar::Archive;
use walkdir::WalkDir;

use crate::{classify::ArchiveEntry, config::ListingOptions};

/// Where a listing comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingSource {
    /// Plain-text listing on standard input
    Stdin,

    /// A directory tree on disk
    Directory(PathBuf),

    /// An uncompressed tar archive
    Tar(PathBuf),

    /// A gzip-compressed tar archive
    TarGz(PathBuf),

    /// A plain-text listing file, one path per line, directories ending in `/`
    Text(PathBuf),
}

impl ListingSource {
    /// Pick a reader for `path`.
    ///
    /// `-` means standard input, an existing directory is walked, and files
    /// are recognised by extension (`.tar`, `.tar.gz`, `.tgz`). Anything else
    /// is read as a text listing such as the output of `tar -tf`.
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            return Self::Stdin;
        }

        if path.is_dir() {
            return Self::Directory(path.to_path_buf());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz(path.to_path_buf())
        } else if name.ends_with(".tar") {
            Self::Tar(path.to_path_buf())
        } else {
            Self::Text(path.to_path_buf())
        }
    }

    /// Whether this source is a directory tree that can be modified.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::Directory(p) | Self::Tar(p) | Self::TarGz(p) | Self::Text(p) => {
                write!(f, "{}", p.display())
            }
        }
    }
}

/// The entries read from a source, with what could not be read.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Normalised entries, excluded paths removed
    pub entries: Vec<ArchiveEntry>,

    /// Directories whose contents could not be read, relative to the walked
    /// root. The empty string stands for the root itself.
    pub unreadable: BTreeSet<String>,

    /// Messages for entries that could not be read
    pub errors: Vec<String>,
}

impl Listing {
    /// Whether `dir` is an unreadable directory or an ancestor of one.
    ///
    /// Such a directory may hold files the listing never saw.
    #[must_use]
    pub fn may_hide_files(&self, dir: &str) -> bool {
        self.unreadable.iter().any(|unreadable| {
            unreadable.is_empty()
                || unreadable == dir
                || unreadable
                    .strip_prefix(dir)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl From<Vec<ArchiveEntry>> for Listing {
    fn from(entries: Vec<ArchiveEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

/// Reads listings and applies [`ListingOptions`] to them.
#[derive(Debug)]
pub struct Lister {
    options: ListingOptions,

    /// When `true`, suppresses the spinner (used by `--json` mode).
    quiet: bool,
}

impl Lister {
    /// Create a lister with the given options.
    #[must_use]
    pub const fn new(options: ListingOptions) -> Self {
        Self {
            options,
            quiet: false,
        }
    }

    /// Enable or disable quiet mode (suppresses the progress spinner).
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Read every entry of `source`, normalised and filtered.
    ///
    /// Entries that cannot be read while walking a directory are skipped,
    /// recorded in the returned [`Listing`], and printed to stderr in verbose
    /// mode. The root of a directory walk is not an entry itself.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is invalid, or if the archive or
    /// listing file cannot be opened or decoded.
    ///
    /// # Panics
    ///
    /// This method may panic if the spinner template string is invalid, which
    /// cannot happen for the hardcoded template.
    pub fn list(&self, source: &ListingSource) -> Result<Listing> {
        let excludes = self.options.exclude_patterns()?;

        let progress = if self.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            pb.set_message(format!("Reading {source}..."));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        let read = match source {
            ListingSource::Stdin => read_text(io::stdin().lock()).map(Listing::from),
            ListingSource::Directory(root) => Ok(walk_directory(root)),
            ListingSource::Tar(path) => open(path).and_then(read_tar).map(Listing::from),
            ListingSource::TarGz(path) => open(path)
                .and_then(|file| read_tar(GzDecoder::new(file)))
                .map(Listing::from),
            ListingSource::Text(path) => open(path)
                .and_then(|file| read_text(BufReader::new(file)))
                .map(Listing::from),
        };

        progress.finish_and_clear();

        let mut listing = read.with_context(|| format!("Failed to read listing from {source}"))?;
        listing.entries = normalize_entries(std::mem::take(&mut listing.entries), &excludes);

        if self.options.verbose {
            for error in &listing.errors {
                eprintln!("{}", error.red());
            }
        }

        Ok(listing)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))
}

/// List the members of a tar stream without extracting anything.
///
/// # Errors
///
/// Returns an error if the stream is not a valid tar archive.
pub fn read_tar<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        let path = entry.path()?.to_string_lossy().into_owned();
        // Old-style archives mark directories only by the trailing slash.
        let is_dir = entry.header().entry_type().is_dir() || path.ends_with('/');

        entries.push(ArchiveEntry { path, is_dir });
    }

    Ok(entries)
}

/// Parse a text listing: one path per line, a trailing `/` marks a directory.
///
/// Blank lines are ignored.
///
/// # Errors
///
/// Returns an error if the reader fails or yields invalid UTF-8.
pub fn read_text<R: BufRead>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let is_dir = line.ends_with('/');
        entries.push(ArchiveEntry { path: line, is_dir });
    }

    Ok(entries)
}

/// Walk a directory tree, producing entries relative to `root`.
///
/// Symlinks are not followed and are listed as files. An entry that cannot
/// be read is skipped; its path goes to [`Listing::unreadable`] (the root
/// when walkdir reports no path) and a message to [`Listing::errors`].
#[must_use]
pub fn walk_directory(root: &Path) -> Listing {
    let mut listing = Listing::default();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let failed = e.path().unwrap_or(root);
                let reason = e
                    .io_error()
                    .map_or_else(|| e.to_string(), ToString::to_string);

                listing
                    .errors
                    .push(format!("Error reading {}: {reason}", failed.display()));
                listing
                    .unreadable
                    .insert(relative_path(root, failed).unwrap_or_default());
                continue;
            }
        };

        let Some(path) = relative_path(root, entry.path()) else {
            continue;
        };

        listing.entries.push(ArchiveEntry {
            path,
            is_dir: entry.file_type().is_dir(),
        });
    }

    listing
}

/// `path` relative to `root`, joined with `/`. The root itself is `""`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    Some(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Strip a leading `./` and trailing `/` from an archive path.
///
/// Returns `None` for the archive root (`.`, `./` or an empty path).
#[must_use]
pub fn normalize_path(path: &str) -> Option<String> {
    let mut path = path.trim_end_matches('/');
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.trim_start_matches('/');
    }

    if path.is_empty() || path == "." {
        None
    } else {
        Some(path.to_string())
    }
}

fn normalize_entries(raw: Vec<ArchiveEntry>, excludes: &[Pattern]) -> Vec<ArchiveEntry> {
    raw.into_iter()
        .filter_map(|entry| {
            normalize_path(&entry.path).map(|path| ArchiveEntry {
                path,
                is_dir: entry.is_dir,
            })
        })
        .filter(|entry| !excludes.iter().any(|p| p.matches(&entry.path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a/b"), Some("a/b".to_string()));
        assert_eq!(normalize_path("a/b/"), Some("a/b".to_string()));
        assert_eq!(normalize_path("./a/b"), Some("a/b".to_string()));
        assert_eq!(normalize_path("././a"), Some("a".to_string()));
        assert_eq!(normalize_path(".hidden"), Some(".hidden".to_string()));
        assert_eq!(normalize_path("./"), None);
        assert_eq!(normalize_path("."), None);
        assert_eq!(normalize_path(""), None);
    }

    #[test]
    fn test_read_text_marks_directories() {
        let listing = "pkg/\npkg/__init__.py\n\npkg/data/\n";
        let entries = read_text(Cursor::new(listing)).unwrap();

        assert_eq!(
            entries,
            vec![
                ArchiveEntry::dir("pkg/"),
                ArchiveEntry::file("pkg/__init__.py"),
                ArchiveEntry::dir("pkg/data/"),
            ]
        );
    }

    #[test]
    fn test_read_text_crlf() {
        let entries = read_text(Cursor::new("a/\r\na/f\r\n")).unwrap();

        assert_eq!(entries, vec![ArchiveEntry::dir("a/"), ArchiveEntry::file("a/f")]);
    }

    #[test]
    fn test_normalize_entries_applies_excludes() {
        let raw = vec![
            ArchiveEntry::dir("./"),
            ArchiveEntry::dir("./src/"),
            ArchiveEntry::file("./src/lib.rs"),
            ArchiveEntry::file("./src/lib.pyc"),
        ];
        let excludes = vec![Pattern::new("*.pyc").unwrap()];

        assert_eq!(
            normalize_entries(raw, &excludes),
            vec![ArchiveEntry::dir("src"), ArchiveEntry::file("src/lib.rs")]
        );
    }

    #[test]
    fn test_read_tar_lists_members() {
        let mut builder = tar::Builder::new(Vec::new());

        let mut dir = tar::Header::new_gnu();
        dir.set_entry_type(tar::EntryType::Directory);
        dir.set_size(0);
        dir.set_mode(0o755);
        dir.set_cksum();
        builder.append_data(&mut dir, "top/", io::empty()).unwrap();

        let content = b"hello";
        let mut file = tar::Header::new_gnu();
        file.set_size(content.len() as u64);
        file.set_mode(0o644);
        file.set_cksum();
        builder
            .append_data(&mut file, "top/hello.txt", &content[..])
            .unwrap();

        let bytes = builder.into_inner().unwrap();
        let entries = read_tar(Cursor::new(bytes)).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir);
        assert_eq!(normalize_path(&entries[0].path), Some("top".to_string()));
        assert_eq!(entries[1], ArchiveEntry::file("top/hello.txt"));
    }

    #[test]
    fn test_read_tar_old_style_directories() {
        let mut builder = tar::Builder::new(Vec::new());

        let mut dir = tar::Header::new_old();
        dir.set_entry_type(tar::EntryType::Regular);
        dir.set_size(0);
        dir.set_mode(0o755);
        dir.set_cksum();
        builder.append_data(&mut dir, "old/", io::empty()).unwrap();

        let mut file = tar::Header::new_old();
        file.set_size(0);
        file.set_mode(0o644);
        file.set_cksum();
        builder
            .append_data(&mut file, "old/file", io::empty())
            .unwrap();

        let bytes = builder.into_inner().unwrap();
        let entries = read_tar(Cursor::new(bytes)).unwrap();

        assert!(entries[0].is_dir);
        assert!(!entries[1].is_dir);
        assert!(crate::classify::classify_directories(&normalize_entries(entries, &[])).is_clean());
    }

    #[test]
    fn test_missing_archive_error_names_path() {
        let err = Lister::new(ListingOptions::default())
            .list(&ListingSource::Tar(PathBuf::from("no/such/dist.tar")))
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("Failed to read listing from no/such/dist.tar"));
        assert!(message.contains("Failed to open no/such/dist.tar"));
    }

    #[test]
    fn test_may_hide_files() {
        let listing = Listing {
            unreadable: ["a/b".to_string()].into_iter().collect(),
            ..Listing::default()
        };

        assert!(listing.may_hide_files("a"));
        assert!(listing.may_hide_files("a/b"));
        assert!(!listing.may_hide_files("a/bc"));
        assert!(!listing.may_hide_files("a/b/c"));
        assert!(!listing.may_hide_files("z"));

        let root_unreadable = Listing {
            unreadable: [String::new()].into_iter().collect(),
            ..Listing::default()
        };
        assert!(root_unreadable.may_hide_files("anything"));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_records_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("precious.txt"), "keep").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through mode 000.
        if std::fs::read_dir(&locked).is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let listing = walk_directory(tmp.path());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(listing.entries, vec![ArchiveEntry::dir("locked")]);
        assert_eq!(
            listing.unreadable,
            BTreeSet::from(["locked".to_string()])
        );
        assert_eq!(listing.errors.len(), 1);
        assert!(listing.errors[0].contains("locked"));
    }

    #[test]
    fn test_read_tar_rejects_garbage() {
        let garbage = vec![0xffu8; 1024];
        assert!(read_tar(Cursor::new(garbage)).is_err());
    }

    #[test]
    fn test_detect_source() {
        assert_eq!(ListingSource::detect(Path::new("-")), ListingSource::Stdin);
        assert_eq!(
            ListingSource::detect(Path::new("no/such/dist.tar.gz")),
            ListingSource::TarGz(PathBuf::from("no/such/dist.tar.gz"))
        );
        assert_eq!(
            ListingSource::detect(Path::new("no/such/dist.TGZ")),
            ListingSource::TarGz(PathBuf::from("no/such/dist.TGZ"))
        );
        assert_eq!(
            ListingSource::detect(Path::new("no/such/dist.tar")),
            ListingSource::Tar(PathBuf::from("no/such/dist.tar"))
        );
        assert_eq!(
            ListingSource::detect(Path::new("no/such/listing.txt")),
            ListingSource::Text(PathBuf::from("no/such/listing.txt"))
        );
    }

    #[test]
    fn test_detect_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = ListingSource::detect(tmp.path());

        assert!(source.is_directory());
        assert_eq!(source.to_string(), tmp.path().display().to_string());
    }
}
