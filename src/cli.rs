//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library.
//!
//! Helper methods accept a [`FileConfig`] reference so that config-file values
//! act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use ilan_dev::classify::ClassifyMode;
use ilan_dev::config::{CleanupOptions, FileConfig, ListingOptions};

/// Command-line arguments controlling how a listing is read.
#[derive(Parser)]
pub struct ListingArgs {
    /// Leave out entries whose path matches this glob pattern
    ///
    /// Matched against the normalised entry path (e.g. `pkg/mod.pyc`).
    /// Can be specified multiple times; patterns from the config file are
    /// applied as well.
    #[arg(short = 'x', long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Show entries that could not be read
    ///
    /// When enabled, permission errors and similar problems met while walking
    /// a directory tree are printed to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Command-line arguments controlling how empty directories are removed.
#[derive(Parser)]
pub struct CleanupArgs {
    /// Don't ask for confirmation; remove all empty directories found
    #[arg(short = 'y', long)]
    yes: bool,

    /// List the empty directories that would be removed, and stop
    #[arg(long)]
    dry_run: bool,

    /// Permanently delete directories instead of moving them to the system trash
    #[arg(long)]
    permanent: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the longest common prefix of the given strings
    ///
    /// Reads one string per line from stdin when no strings are given.
    Lcp {
        /// Strings to compare
        strings: Vec<String>,
    },

    /// Print byte counts in human-readable form
    ///
    /// Each value is either a size (`4096`, `1.5MiB`, `2GB`) or the path of a
    /// file or directory whose total size is measured.
    Size {
        /// Sizes or paths
        #[arg(required = true)]
        sizes: Vec<String>,
    },

    /// Find empty and missing directories in an archive or directory listing
    ///
    /// SOURCE is a `.tar`, `.tar.gz` or `.tgz` archive, a directory, a text
    /// listing file (as printed by `tar -tf`), or `-` for a listing on stdin.
    Dirs {
        /// Archive, directory or listing to inspect
        source: PathBuf,

        /// Which directories to report
        #[arg(short = 'm', long, value_enum)]
        mode: Option<ClassifyMode>,

        /// Listing options
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Remove empty directories from a directory tree
    Cleanup {
        /// Directory tree to clean
        dir: PathBuf,

        /// Cleanup options
        #[command(flatten)]
        cleanup: CleanupArgs,

        /// Listing options
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
#[derive(Parser)]
#[command(name = "ilan-dev")]
#[command(about = "A few personal tools used for development")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// When enabled, all human-readable output (colors, progress bars, emojis)
    /// is suppressed and a single JSON document is printed to stdout.
    #[arg(long, global = true)]
    json: bool,
}

impl Cli {
    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }
}

impl ListingArgs {
    /// Extract listing options from CLI args and config file.
    ///
    /// - **exclude**: merged from both sources (config values first, then CLI)
    /// - **verbose**: CLI flag `||` config value `||` `false`
    #[must_use]
    pub fn listing_options(&self, config: &FileConfig) -> ListingOptions {
        let mut exclude = config.dirs.exclude.clone().unwrap_or_default();
        exclude.extend(self.exclude.iter().cloned());

        ListingOptions {
            verbose: self.verbose || config.dirs.verbose.unwrap_or(false),
            exclude,
        }
    }
}

impl CleanupArgs {
    /// Extract cleanup options from CLI args and config file.
    ///
    /// For boolean flags, the CLI flag (if set) takes priority, then the
    /// config file value, then the default.
    #[must_use]
    pub fn cleanup_options(&self, config: &FileConfig) -> CleanupOptions {
        CleanupOptions {
            dry_run: self.dry_run || config.cleanup.dry_run.unwrap_or(false),
            yes: self.yes,
            use_trash: !self.permanent && config.cleanup.use_trash.unwrap_or(true),
        }
    }
}

/// Resolve the classification mode.
///
/// Priority: CLI argument > config file > default (`Empty`).
#[must_use]
pub fn resolve_mode(cli: Option<ClassifyMode>, config: &FileConfig) -> ClassifyMode {
    cli.or_else(|| {
        config
            .dirs
            .mode
            .as_ref()
            .and_then(|s| ClassifyMode::from_str(s, true).ok())
    })
    .unwrap_or_default()
}
