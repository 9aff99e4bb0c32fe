//! Listing configuration for building archive-entry lists.
//!
//! This module defines the options that control which entries a listing keeps
//! and how much is reported while reading it.

use anyhow::Result;
use glob::Pattern;

/// Configuration for reading a listing.
#[derive(Clone, Debug, Default)]
pub struct ListingOptions {
    /// Whether to report entries that could not be read
    pub verbose: bool,

    /// Glob patterns; entries whose path matches any of them are dropped
    pub exclude: Vec<String>,
}

impl ListingOptions {
    /// Compile the exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that is not a valid glob.
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|raw| {
                Pattern::new(raw)
                    .map_err(|e| anyhow::anyhow!("Invalid exclude pattern '{raw}': {e}"))
            })
            .collect()
    }
}
