//! File resolution, component extraction and run orchestration.
//!
//! This crate drives a decorator migration run: it expands path patterns into
//! files, parses them with `dm-ts-parser`, extracts a [`ComponentDescriptor`]
//! for every decorated class and hands the descriptors to a
//! [`ComponentRewriter`].
//!
//! # Overview
//!
//! The main entry point is [`Migrator`], which combines:
//!
//! - [`FileResolver`]: glob expansion with ignore patterns
//! - [`SourceLoader`] / [`load_all`]: reading and parsing, optionally on rayon
//! - [`extract`]: the pre-order walk producing descriptors
//! - [`OutputDir`]: output directory creation and clearing
//! - [`ComponentRewriter`]: the consumer of the descriptors
//!
//! # Example
//!
//! ```ignore
//! use dm_core::OptionOverrides;
//! use dm_scanner::{ManifestWriter, Migrator, PathPatterns};
//!
//! let mut migrator = Migrator::new(ManifestWriter::new());
//!
//! // First run: patterns and options are cached
//! let summary = migrator.run(Some(PathPatterns::from("src/**/*.ts")), Some(OptionOverrides::default()))?;
//! println!("{} components in {} files", summary.components, summary.files);
//!
//! // Later run over the same files with the same options
//! migrator.run(None, None)?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! Migrator::run
//!     │
//!     ├── RunOptions (overrides merged over defaults, or cached)
//!     ├── FileResolver (patterns → files, or cached)
//!     ├── OutputDir::prepare (create or clear)
//!     ├── load_all → extract (every file, fail-fast)
//!     └── ComponentRewriter (begin_run, then one call per descriptor, in order)
//! ```
//!
//! Every descriptor is extracted before the first one is handed over, so a
//! file that fails to parse means no component of the run is rewritten.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod extractor;
mod output;
mod resolver;
mod rewrite;
mod source;

pub use error::ScanError;
pub use extractor::{ComponentWalker, WalkState, extract};
pub use output::{OutputDir, OutputDirStatus};
pub use resolver::{FileResolver, PathPatterns};
pub use rewrite::{ComponentRewriter, ManifestCollision, ManifestWriter, RewriteError};
pub use source::{SourceFile, SourceLoader, load_all};

use camino::Utf8PathBuf;
use dm_core::{ComponentDescriptor, ConfigError, OptionOverrides, RunOptions};
use tracing::{debug, info};

/// State carried from one run to the next.
///
/// Omitting the options or the patterns of a later run reuses the values of
/// the previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// Options of the previous run.
    pub options: Option<RunOptions>,

    /// Files resolved by the previous run.
    pub files: Option<Vec<Utf8PathBuf>>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files parsed.
    pub files: usize,

    /// Number of components handed to the rewriter.
    pub components: usize,

    /// What happened to the output directory, if one is configured.
    pub output: Option<OutputDirStatus>,
}

/// Runs migrations and remembers options and files between runs.
#[derive(Debug, Default)]
pub struct Migrator<R> {
    rewriter: R,
    state: RunState,
}

impl<R> Migrator<R> {
    /// Creates a migrator with no cached state.
    pub fn new(rewriter: R) -> Self {
        Self {
            rewriter,
            state: RunState::default(),
        }
    }

    /// The state cached from previous runs.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The rewriter receiving descriptors.
    #[inline]
    #[must_use]
    pub fn rewriter(&self) -> &R {
        &self.rewriter
    }

    /// Consumes the migrator and returns its rewriter.
    pub fn into_rewriter(self) -> R {
        self.rewriter
    }

    /// Resolves options and files, then extracts every component without
    /// touching the output directory or calling the rewriter.
    ///
    /// Options and files are cached exactly as by [`run`](Migrator::run).
    ///
    /// # Errors
    ///
    /// See [`run`](Migrator::run); output directory and rewrite errors cannot
    /// occur.
    pub fn collect_components(
        &mut self,
        patterns: Option<PathPatterns>,
        options: Option<OptionOverrides>,
    ) -> Result<Vec<ComponentDescriptor>, ScanError> {
        let options = self.activate_options(options);
        let files = self.activate_files(patterns, &options)?;
        collect(&files, &options)
    }

    /// Replaces the cached options with `overrides` merged over the defaults,
    /// or returns the cached options (the defaults on a first run).
    fn activate_options(&mut self, overrides: Option<OptionOverrides>) -> RunOptions {
        let options = match overrides {
            Some(overrides) => RunOptions::from_overrides(&overrides),
            None => self.state.options.clone().unwrap_or_default(),
        };
        self.state.options = Some(options.clone());
        options
    }

    fn activate_files(
        &mut self,
        patterns: Option<PathPatterns>,
        options: &RunOptions,
    ) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let files = match patterns {
            Some(patterns) => FileResolver::new(&options.glob)?.resolve(&patterns)?,
            None => self
                .state
                .files
                .clone()
                .ok_or(ConfigError::NoPatterns)?,
        };
        info!(count = files.len(), "Resolved input files");
        self.state.files = Some(files.clone());
        Ok(files)
    }
}

impl<R: ComponentRewriter> Migrator<R> {
    /// Performs one migration run.
    ///
    /// 1. `options` merged over the defaults become the active options;
    ///    `None` reuses the previous run's options
    /// 2. `patterns` are resolved to files; `None` reuses the previous run's
    ///    files
    /// 3. The output directory, if configured, is created or cleared
    /// 4. Every file is parsed and its components extracted
    /// 5. The rewriter is told a run begins, then each component is handed
    ///    to it in order
    ///
    /// # Errors
    ///
    /// - [`ScanError::Config`] if no patterns were given and none are cached
    /// - [`ScanError::Pattern`] or [`ScanError::NonUtf8Path`] from resolution
    /// - [`ScanError::OutputDir`] if the output directory cannot be prepared
    /// - [`ScanError::Read`] or [`ScanError::Syntax`] for the first bad file;
    ///   no component is handed over in that case
    /// - [`ScanError::Rewrite`] if the rewriter rejects a component
    pub fn run(
        &mut self,
        patterns: Option<PathPatterns>,
        options: Option<OptionOverrides>,
    ) -> Result<RunSummary, ScanError> {
        info!("Starting transformation of components");

        let options = self.activate_options(options);
        let files = self.activate_files(patterns, &options)?;

        let output = match &options.output_path {
            Some(path) => {
                info!(path = %path, "Output files will be placed in the output directory");
                Some(OutputDir::new(path).prepare()?)
            }
            None => None,
        };

        let components = collect(&files, &options)?;

        self.rewriter.begin_run(&options);
        for component in &components {
            info!(component = %component.qualified_name(), "Transforming component");
            self.rewriter
                .rewrite(component, &options)
                .map_err(|e| ScanError::rewrite(component.qualified_name(), e))?;
        }

        let summary = RunSummary {
            files: files.len(),
            components: components.len(),
            output,
        };
        info!(
            files = summary.files,
            components = summary.components,
            "Transformation completed"
        );

        Ok(summary)
    }
}

/// Loads `files` and extracts their components in file order.
fn collect(files: &[Utf8PathBuf], options: &RunOptions) -> Result<Vec<ComponentDescriptor>, ScanError> {
    let sources = load_all(files, options.parallel)?;

    let components: Vec<_> = sources
        .iter()
        .flat_map(|file| extract(file, options.use_metadata_reflection))
        .collect();

    debug!(count = components.len(), "Extracted components");
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &ComponentDescriptor, _: &RunOptions) -> Result<(), RewriteError> {
        Ok(())
    }

    #[test]
    fn test_run_without_patterns_or_cache() {
        let mut migrator = Migrator::new(noop);
        let err = migrator.run(None, None).expect_err("no patterns");
        assert!(matches!(err, ScanError::Config(ConfigError::NoPatterns)));
    }

    #[test]
    fn test_options_are_replaced_not_merged() {
        let mut migrator = Migrator::new(noop);

        let first = OptionOverrides {
            use_metadata_reflection: Some(true),
            output_path: Some(None),
            ..OptionOverrides::default()
        };
        assert!(migrator.activate_options(Some(first)).use_metadata_reflection);

        let second = OptionOverrides {
            parallel: Some(true),
            ..OptionOverrides::default()
        };
        let options = migrator.activate_options(Some(second));
        assert!(!options.use_metadata_reflection);
        assert!(options.parallel);
        assert_eq!(options.output_path, RunOptions::default().output_path);

        assert_eq!(migrator.activate_options(None), options);
    }

    #[test]
    fn test_first_run_defaults() {
        let mut migrator = Migrator::new(noop);
        assert_eq!(migrator.activate_options(None), RunOptions::default());
        assert_eq!(migrator.state().options, Some(RunOptions::default()));
    }
}
