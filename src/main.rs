//! # ilan-dev
//!
//! A few personal tools used for development.
//!
//! ## Usage
//!
//! ```bash
//! # Longest common prefix
//! ilan-dev lcp pineapple pinetree
//!
//! # Human-readable sizes, of numbers or of files on disk
//! ilan-dev size 1048576 1.5GiB target/
//!
//! # Empty and missing directories of a tarball
//! ilan-dev dirs dist/pkg-1.0.tar.gz --mode both
//!
//! # Remove empty directories below the current directory
//! ilan-dev cleanup . --dry-run
//! ```

mod cli;

use std::{
    collections::BTreeSet,
    io::{self, BufRead},
    path::Path,
    process::exit,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{CleanupArgs, Cli, Commands, ConfigCommand, ListingArgs, resolve_mode};
use colored::Colorize;
use ilan_dev::{
    classify::{ClassifyMode, classify_directories},
    cleaner::{Cleaner, RemovalStrategy},
    config::FileConfig,
    listing::{Lister, ListingSource},
    output::{JsonCleanup, JsonDirs, JsonLcp, JsonSizeEntry, JsonSizes},
    utils::{calculate_dir_size, lcp, parse_size},
};
use inquire::Confirm;

/// Entry point for the ilan-dev application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// # Errors
///
/// Returns errors from reading input, parsing sizes, listing archives or
/// directories, file-system operations, prompts, or JSON serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();
    let json_mode = args.json();

    match &args.command {
        Commands::Config { command } => handle_config_command(command),
        Commands::Lcp { strings } => run_lcp(strings, json_mode),
        Commands::Size { sizes } => run_size(sizes, json_mode),
        Commands::Dirs {
            source,
            mode,
            listing,
        } => {
            let file_config = load_config(json_mode);
            run_dirs(
                source,
                resolve_mode(*mode, &file_config),
                listing,
                &file_config,
                json_mode,
            )
        }
        Commands::Cleanup {
            dir,
            cleanup,
            listing,
        } => {
            let file_config = load_config(json_mode);
            run_cleanup(dir, cleanup, listing, &file_config, json_mode)
        }
    }
}

// ── lcp / size ──────────────────────────────────────────────────────────

/// Print the common prefix of the arguments, or of stdin's lines.
fn run_lcp(strings: &[String], json_mode: bool) -> Result<()> {
    let strings = if strings.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read strings from stdin")?
    } else {
        strings.to_vec()
    };

    let count = strings.len();
    let prefix = lcp(&strings);

    if json_mode {
        let output = JsonLcp { count, prefix };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match prefix {
        Some(prefix) => println!("{prefix}"),
        None => eprintln!("{}", "No input strings; there is no common prefix.".yellow()),
    }
    Ok(())
}

/// Print each size argument in human-readable form.
///
/// An argument is first parsed as a size; if that fails and it names an
/// existing path, the size of that path is measured instead.
fn run_size(sizes: &[String], json_mode: bool) -> Result<()> {
    let entries = sizes
        .iter()
        .map(|raw| resolve_size(raw).map(|bytes| JsonSizeEntry::new(raw, bytes)))
        .collect::<Result<Vec<_>>>()?;

    if json_mode {
        let output = JsonSizes { sizes: entries };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{:>8}  {:>10}  {}",
            entry.human.bright_green().bold(),
            entry.decimal.dimmed(),
            entry.input
        );
    }
    Ok(())
}

fn resolve_size(raw: &str) -> Result<u64> {
    match parse_size(raw) {
        Ok(bytes) => Ok(bytes),
        Err(_) if Path::new(raw).exists() => Ok(calculate_dir_size(Path::new(raw))),
        Err(e) => Err(e.context(format!("'{raw}' is neither a size nor an existing path"))),
    }
}

// ── dirs ────────────────────────────────────────────────────────────────

/// List a source and report its empty and/or missing directories.
fn run_dirs(
    source: &Path,
    mode: ClassifyMode,
    listing: &ListingArgs,
    file_config: &FileConfig,
    json_mode: bool,
) -> Result<()> {
    let source = ListingSource::detect(source);
    let lister = Lister::new(listing.listing_options(file_config)).with_quiet(json_mode);
    let listing = lister.list(&source)?;
    let classification = classify_directories(&listing.entries);

    if json_mode {
        let output = JsonDirs::from_classification(
            source.to_string(),
            listing.entries.len(),
            &classification,
            mode,
        );
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Read {} entries from {source}", listing.entries.len());
    if !listing.unreadable.is_empty() {
        eprintln!(
            "{}",
            format!(
                "Warning: {} paths could not be read; directories around them may be misreported (use --verbose)",
                listing.unreadable.len()
            )
            .yellow()
        );
    }

    if mode.includes_empty() {
        print_dir_set("📂 Empty directories", "✨ No empty directories!", &classification.empty);
    }
    if mode.includes_missing() {
        print_dir_set(
            "🕳️  Missing directories",
            "✨ No missing directories!",
            &classification.missing,
        );
    }
    Ok(())
}

fn print_dir_set(title: &str, none_message: &str, dirs: &BTreeSet<String>) {
    if dirs.is_empty() {
        println!("\n{}", none_message.green());
        return;
    }

    println!("\n{} ({}):", title.bold(), dirs.len());
    for dir in dirs {
        println!("  {dir}");
    }
}

// ── cleanup ─────────────────────────────────────────────────────────────

/// Remove the empty directories below `dir`.
fn run_cleanup(
    dir: &Path,
    cleanup: &CleanupArgs,
    listing: &ListingArgs,
    file_config: &FileConfig,
    json_mode: bool,
) -> Result<()> {
    let options = cleanup.cleanup_options(file_config);

    if !dir.is_dir() {
        bail!(
            "{} is not a directory; only directory trees can be cleaned",
            dir.display()
        );
    }

    if json_mode && !options.yes && !options.dry_run {
        bail!("--json cleanup needs --yes or --dry-run, since it cannot prompt");
    }

    let lister = Lister::new(listing.listing_options(file_config)).with_quiet(json_mode);
    let listing = lister.list(&ListingSource::Directory(dir.to_path_buf()))?;
    let planned = Cleaner::plan(&listing);
    let root = dir.display().to_string();

    if planned.is_empty() || options.dry_run {
        if json_mode {
            let output = JsonCleanup::dry_run(root, planned);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if planned.is_empty() {
            println!("{}", "✨ No empty directories found!".green());
        } else {
            print_planned(&planned);
            println!(
                "\n{} {}",
                "🧪 Dry run complete!".yellow(),
                format!("Would remove {} directories", planned.len()).bright_white()
            );
        }
        return Ok(());
    }

    if !json_mode {
        print_planned(&planned);

        if !options.yes {
            let confirmed = Confirm::new(&format!("Remove {} empty directories?", planned.len()))
                .with_default(false)
                .prompt()?;
            if !confirmed {
                println!("{}", "✨ Nothing removed.".green());
                return Ok(());
            }
        }
    }

    let strategy = RemovalStrategy::from_use_trash(options.use_trash);
    let result = Cleaner::remove_dirs(dir, &planned, json_mode, strategy);

    if json_mode {
        let output = JsonCleanup::cleanup(root, planned, &result);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        Cleaner::print_summary(&result);
    }

    Ok(())
}

fn print_planned(planned: &[String]) {
    println!("\n{} ({}):", "📂 Empty directories".bold(), planned.len());
    for dir in planned {
        println!("  {dir}");
    }
}

// ── Config subcommand ───────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# ilan-dev configuration
# All values shown are their defaults. Uncomment and change as needed.

[dirs]
# Which directories `dirs` reports: empty, missing, both
# mode = "empty"

# Glob patterns of entries to leave out of every listing
# exclude = []

# Show entries that could not be read
# verbose = false

[cleanup]
# Only list the empty directories that would be removed
# dry_run = false

# Move directories to system trash instead of permanently deleting (default: true)
# use_trash = true
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_list(val: Option<&[String]>) -> String {
        match val {
            Some(v) if !v.is_empty() => {
                let items: Vec<String> = v.iter().map(|p| format!("\"{p}\"")).collect();
                format!("[{}]", items.join(", "))
            }
            _ => "[]  (default)".to_string(),
        }
    }

    let mode = config
        .dirs
        .mode
        .as_deref()
        .map_or_else(|| "\"empty\"  (default)".to_string(), |v| format!("\"{v}\""));

    format!(
        "\
[dirs]
mode      = {mode}
exclude   = {exclude}
verbose   = {verbose}

[cleanup]
dry_run   = {dry_run}
use_trash = {use_trash}",
        exclude = show_list(config.dirs.exclude.as_deref()),
        verbose = show_bool(config.dirs.verbose, false),
        dry_run = show_bool(config.cleanup.dry_run, false),
        use_trash = show_bool(config.cleanup.use_trash, true),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_template_parses_to_defaults() {
        let config: FileConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();

        assert!(config.dirs.mode.is_none());
        assert!(config.cleanup.use_trash.is_none());
    }

    #[test]
    fn test_format_config_defaults() {
        let text = format_config(&FileConfig::default());

        assert!(text.contains("mode      = \"empty\"  (default)"));
        assert!(text.contains("use_trash = true  (default)"));
    }

    #[test]
    fn test_resolve_size() {
        assert_eq!(resolve_size("1KiB").unwrap(), 1024);

        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("f"), [0u8; 10]).unwrap();
        assert_eq!(resolve_size(&tmp.path().display().to_string()).unwrap(), 10);

        let err = resolve_size("definitely-not-a-size-or-path").unwrap_err();
        assert!(format!("{err:#}").contains("neither a size nor an existing path"));
    }
}
