//! Small, self-contained helpers.
//!
//! Pure string and number helpers ([`lcp`], [`human_bytes`]) together with the
//! size parsing and measuring functions the command-line tool builds on.

pub mod prefix;
pub mod size;

pub use prefix::lcp;
pub use size::{calculate_dir_size, human_bytes, human_bytes_checked, parse_size};
