//! CLI entry point for the decorator migration tool.
//!
//! This binary finds Polymer-TS components (decorated classes) in TypeScript
//! sources and hands them to the `polymer-decorators` rewrite step.
//!
//! # Usage
//!
//! ```bash
//! dm-migrate [OPTIONS] <COMMAND>
//!
//! # Convert every component under src/, writing manifests to ./output/
//! dm-migrate convert 'src/**/*.ts'
//!
//! # List the components that would be converted
//! dm-migrate scan 'src/**/*.ts' --json
//!
//! # Options from a file, overridden by flags
//! dm-migrate --config migrate.json --no-output convert 'app/**/*.ts'
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use dm_core::{ComponentDescriptor, OptionOverrides};
use dm_scanner::{ManifestWriter, Migrator, OutputDirStatus, PathPatterns, RunSummary};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Migrates Polymer-TS components to the `polymer-decorators` vocabulary.
///
/// Scans TypeScript files for decorated classes and rewrites each one.
#[derive(Parser)]
#[command(name = "dm-migrate", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON file with run options (`outputPath`, `glob.ignore`, ...).
    ///
    /// Flags given on the command line take precedence.
    #[arg(short, long, global = true, env = "DM_MIGRATE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Directory that receives the rewritten components.
    ///
    /// Created if missing, emptied if it exists. Defaults to `./output/`.
    #[arg(short, long, global = true, env = "DM_MIGRATE_OUTPUT_PATH")]
    output_path: Option<Utf8PathBuf>,

    /// Do not create or clear an output directory.
    #[arg(long, global = true, conflicts_with = "output_path")]
    no_output: bool,

    /// Mark every component for metadata reflection.
    #[arg(long, global = true)]
    use_metadata_reflection: bool,

    /// Do not mark components for metadata reflection.
    #[arg(long, global = true, conflicts_with = "use_metadata_reflection")]
    no_use_metadata_reflection: bool,

    /// Rewrite components next to their source files.
    #[arg(long, global = true)]
    change_inline: bool,

    /// Rewrite components into the output directory.
    #[arg(long, global = true, conflicts_with = "change_inline")]
    no_change_inline: bool,

    /// Glob for paths to skip; repeat for several. Replaces the defaults.
    #[arg(long = "ignore", value_name = "GLOB", global = true)]
    ignore: Vec<String>,

    /// Let wildcards match file and directory names starting with a dot.
    #[arg(long, global = true)]
    dot: bool,

    /// Keep wildcards from matching names starting with a dot.
    #[arg(long, global = true, conflicts_with = "dot")]
    no_dot: bool,

    /// Parse files in parallel.
    #[arg(long, global = true)]
    parallel: bool,

    /// Parse files on the current thread.
    #[arg(long, global = true, conflicts_with = "parallel")]
    no_parallel: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert every component found in the matching files.
    Convert {
        /// Glob patterns naming the input files.
        #[arg(required = true, value_name = "PATTERNS")]
        patterns: Vec<String>,
    },

    /// List the components found in the matching files without converting.
    Scan {
        /// Glob patterns naming the input files.
        #[arg(required = true, value_name = "PATTERNS")]
        patterns: Vec<String>,

        /// Print the component descriptors as JSON.
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `no_color` - Disable ANSI colors in output
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Maps a `--flag` / `--no-flag` pair to an override; neither leaves it unset.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Builds the run options: the `--config` file, if any, with flags on top.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read or parsed.
fn build_overrides(cli: &Cli) -> color_eyre::Result<OptionOverrides> {
    let file = match &cli.config {
        Some(path) => OptionOverrides::load(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => OptionOverrides::default(),
    };

    let output_path = if cli.no_output {
        Some(None)
    } else {
        cli.output_path.clone().map(Some)
    };

    // The glob group is replaced as a whole, so start from the file's group.
    let dot = switch(cli.dot, cli.no_dot);
    let glob = (!cli.ignore.is_empty() || dot.is_some()).then(|| {
        let mut glob = file.glob.clone().unwrap_or_default();
        if !cli.ignore.is_empty() {
            glob.ignore.clone_from(&cli.ignore);
        }
        if let Some(dot) = dot {
            glob.dot = dot;
        }
        glob
    });

    let flags = OptionOverrides {
        change_inline: switch(cli.change_inline, cli.no_change_inline),
        output_path,
        use_metadata_reflection: switch(cli.use_metadata_reflection, cli.no_use_metadata_reflection),
        conversion_type: None,
        glob,
        parallel: switch(cli.parallel, cli.no_parallel),
    };

    Ok(file.layered(flags))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a full conversion, writing one manifest per component.
///
/// # Errors
///
/// Returns an error if the run fails. Output directory failures are logged
/// as fatal before being returned.
fn run_convert(patterns: Vec<String>, overrides: OptionOverrides) -> color_eyre::Result<()> {
    let mut migrator = Migrator::new(ManifestWriter::new());

    let summary = match migrator.run(Some(PathPatterns::from(patterns)), Some(overrides)) {
        Ok(summary) => summary,
        Err(e) if e.is_process_fatal() => {
            error!(error = %e, "Output directory is unusable, aborting");
            return Err(e.into());
        }
        Err(e) => return Err(e).wrap_err("Conversion failed"),
    };

    print_summary(&summary, migrator.rewriter().written());
    Ok(())
}

/// Lists the components found by a run without side effects.
///
/// # Errors
///
/// Returns an error if resolution or parsing fails.
fn run_scan(patterns: Vec<String>, overrides: OptionOverrides, json: bool) -> color_eyre::Result<()> {
    let mut migrator = Migrator::new(ManifestWriter::new());
    let components = migrator
        .collect_components(Some(PathPatterns::from(patterns)), Some(overrides))
        .wrap_err("Scan failed")?;

    info!(count = components.len(), "Scan completed");

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if json {
        let content = serde_json::to_string_pretty(&components)
            .wrap_err("Failed to serialize components")?;
        writeln!(handle, "{content}")?;
    } else {
        for component in &components {
            writeln!(handle, "{}", describe(component))?;
        }
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Formats one component as `path:line:col  Name  @decorators`.
fn describe(component: &ComponentDescriptor) -> String {
    let annotations: Vec<String> = component.annotations.iter().map(ToString::to_string).collect();
    format!(
        "{}  {}  {}",
        component.source,
        component.qualified_name(),
        annotations.join(" ")
    )
}

/// Prints a summary of a conversion run.
fn print_summary(summary: &RunSummary, written: &[Utf8PathBuf]) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Conversion Summary");
    let _ = writeln!(handle, "==================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Files parsed:         {}", summary.files);
    let _ = writeln!(handle, "Components converted: {}", summary.components);
    match summary.output {
        Some(OutputDirStatus::Created) => {
            let _ = writeln!(handle, "Output directory:     created");
        }
        Some(OutputDirStatus::Cleared { removed }) => {
            let _ = writeln!(handle, "Output directory:     cleared ({removed} entries removed)");
        }
        None => {}
    }

    if !written.is_empty() {
        let _ = writeln!(handle);
        let _ = writeln!(handle, "Manifests ({}):", written.len());
        for path in written {
            let _ = writeln!(handle, "  {path}");
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Merge the configuration file and flags
    let overrides = build_overrides(&cli)?;

    // 5. Route to appropriate command
    match cli.command {
        Commands::Convert { patterns } => run_convert(patterns, overrides),
        Commands::Scan { patterns, json } => run_scan(patterns, overrides, json),
    }
}
