//! # ilan-dev
//!
//! A few personal tools used for development.
//!
//! The core is three pure helpers:
//!
//! - [`lcp`] - the longest common prefix of a set of strings
//! - [`human_bytes`] - a compact, binary-unit rendering of a byte count
//! - [`classify_directories`] - the *empty* and *missing* directories of an
//!   archive listing
//!
//! Around them sit the pieces the `ilan-dev` command-line tool needs: reading
//! listings from tarballs and directory trees ([`listing`]), removing empty
//! directories ([`cleaner`]), JSON output ([`output`]) and a persistent
//! configuration file ([`config`]).

pub mod classify;
pub mod cleaner;
pub mod config;
pub mod listing;
pub mod output;
pub mod utils;

pub use classify::{
    ArchiveEntry, ClassifyMode, DirClassification, classify_directories, empty_directories,
    missing_directories,
};
pub use config::{CleanupOptions, ListingOptions};
pub use utils::{human_bytes, lcp};
