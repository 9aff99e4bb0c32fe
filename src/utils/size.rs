//! Size formatting, parsing and measuring utilities.
//!
//! This module provides [`human_bytes`] for rendering byte counts in a compact
//! binary-unit form (`"1023"`, `"1K"`, `"1.0M"`, `"1.00G"`), functions for
//! parsing human-readable size strings (like "100MB" or "1.5GiB") into byte
//! values, and for measuring the size of files and directories on disk.

use std::path::Path;

use anyhow::Result;
use walkdir::WalkDir;

const KIB: u64 = 1024;

/// Format a byte count in compact binary units.
///
/// | Range              | Rendering                            | Example            |
/// |--------------------|--------------------------------------|--------------------|
/// | `n < 1024`         | plain integer, no suffix             | `1023` → `"1023"`  |
/// | `n < 1024²`        | KiB rounded to an integer, `K`       | `1024` → `"1K"`    |
/// | `n < 1024³`        | MiB with one decimal, `M`            | `1 << 20` → `"1.0M"` |
/// | otherwise          | GiB with two decimals, `G`           | `1 << 30` → `"1.00G"` |
///
/// There is no tier above `G`; terabyte-scale values keep the `G` suffix.
///
/// # Examples
///
/// ```
/// # use ilan_dev::utils::human_bytes;
/// assert_eq!(human_bytes(1536), "2K");
/// assert_eq!(human_bytes(5 << 20), "5.0M");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_bytes(n: u64) -> String {
    if n < KIB {
        return n.to_string();
    }

    let k = n as f64 / 1024.0;
    if k < 1024.0 {
        return format!("{}K", k.round());
    }

    let m = k / 1024.0;
    if m < 1024.0 {
        return format!("{m:.1}M");
    }

    let g = m / 1024.0;
    format!("{g:.2}G")
}

/// Format a signed byte count, rejecting negative values.
///
/// # Errors
///
/// Returns an invalid-argument error if `n` is negative.
pub fn human_bytes_checked(n: i64) -> Result<String> {
    u64::try_from(n)
        .map(human_bytes)
        .map_err(|_| anyhow::anyhow!("Invalid argument: byte count must be non-negative, got {n}"))
}

/// Calculate the total size of a file, or of a directory and all its contents, in bytes.
///
/// Recursively traverses the directory tree using `walkdir` and sums the sizes
/// of all files found; a plain file yields its own length. Errors for
/// individual entries (permission denied, broken symlinks, etc.) are silently
/// skipped so the function always returns a result.
///
/// Returns `0` if the path does not exist or cannot be traversed at the root level.
#[must_use]
pub fn calculate_dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Parse a human-readable size string into bytes.
///
/// Accepts plain byte counts, decimal units (KB, MB, GB: powers of 1000),
/// binary units (KiB, MiB, GiB: powers of 1024) and an optional `B` suffix,
/// case-insensitively. The number may have up to nine fractional digits;
/// fractions of a byte are truncated.
///
/// # Errors
///
/// Returns an error if the string is not a number followed by a known unit,
/// has more than nine fractional digits, or does not fit in a `u64`.
///
/// # Examples
///
/// ```
/// # use ilan_dev::utils::parse_size;
/// # fn main() -> anyhow::Result<()> {
/// assert_eq!(parse_size("100KB")?, 100_000);
/// assert_eq!(parse_size("1.5MiB")?, 1_572_864);
/// # Ok(())
/// # }
/// ```
pub fn parse_size(size_str: &str) -> Result<u64> {
    let upper = size_str.trim().to_uppercase();
    let (number, multiplier) = split_unit(&upper);

    let bytes = match number.split_once('.') {
        Some((integer, fraction)) => decimal_bytes(integer, fraction, multiplier)?,
        None => u128::from(parse_digits(number)?) * u128::from(multiplier),
    };

    u64::try_from(bytes).map_err(|_| anyhow::anyhow!("Size value overflow: {size_str}"))
}

/// Split a known unit suffix off an upper-cased size string.
fn split_unit(size_str: &str) -> (&str, u64) {
    const UNITS: &[(&str, u64)] = &[
        ("GIB", 1 << 30),
        ("MIB", 1 << 20),
        ("KIB", 1 << 10),
        ("GB", 1_000_000_000),
        ("MB", 1_000_000),
        ("KB", 1_000),
        ("B", 1),
    ];

    UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            size_str
                .strip_suffix(suffix)
                .map(|number| (number, *multiplier))
        })
        .unwrap_or((size_str, 1))
}

/// `integer.fraction * multiplier`, truncated to whole bytes.
fn decimal_bytes(integer: &str, fraction: &str, multiplier: u64) -> Result<u128> {
    const NANOS: u128 = 1_000_000_000;

    if fraction.len() > 9 {
        anyhow::bail!("Too many decimal places: {fraction}");
    }

    let integer: u128 = if integer.is_empty() {
        0
    } else {
        u128::from(parse_digits(integer)?)
    };
    let digits = u32::try_from(fraction.len())?;
    let nanos = u128::from(parse_digits(fraction)?) * 10u128.pow(9 - digits);

    Ok(integer * u128::from(multiplier) + nanos * u128::from(multiplier) / NANOS)
}

/// Parse a run of ASCII digits. Signs and whitespace are rejected.
fn parse_digits(digits: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Invalid number: '{digits}'");
    }

    Ok(digits.parse()?)
}
