//! Options controlling how empty directories are removed.

/// Configuration for the cleanup run.
#[derive(Clone, Copy, Debug)]
pub struct CleanupOptions {
    /// Report what would be removed without touching the disk
    pub dry_run: bool,

    /// Skip the confirmation prompt
    pub yes: bool,

    /// Move directories to the system trash instead of deleting them
    pub use_trash: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            yes: false,
            use_trash: true,
        }
    }
}
