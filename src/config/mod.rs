//! Configuration types for the command-line tool.
//!
//! - [`FileConfig`]: persistent settings loaded from `config.toml`
//! - [`ListingOptions`]: what to keep while reading a listing
//! - [`CleanupOptions`]: how empty directories are removed

pub mod cleanup;
pub mod file;
pub mod listing;

pub use cleanup::CleanupOptions;
pub use file::FileConfig;
pub use listing::ListingOptions;
