//! Error types for the dm-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while resolving files, parsing them, preparing the output directory and
//! handing components to the rewrite step.

use camino::{Utf8Path, Utf8PathBuf};
use dm_core::ConfigError;
use dm_ts_parser::ParseError;

use crate::rewrite::RewriteError;

/// Errors that can occur during a migration run.
///
/// # Error Strategy
///
/// Every error aborts the run. No component is handed to the rewriter
/// unless every file was loaded and parsed.
///
/// - **Output directory errors** ([`ScanError::OutputDir`]): process-fatal,
///   see [`ScanError::is_process_fatal`]
/// - **Everything else**: returned to the caller unchanged
///
/// # Examples
///
/// ```
/// use dm_scanner::ScanError;
///
/// fn handle_error(err: &ScanError) {
///     match err {
///         ScanError::Syntax { path, source } => eprintln!("{path}: {source}"),
///         ScanError::Read { path, .. } => eprintln!("cannot read {path}"),
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The run configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An input or ignore pattern is not valid glob syntax.
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// A path is not valid UTF-8.
    ///
    /// This crate uses UTF-8 paths throughout. If a non-UTF-8 path is
    /// encountered, it cannot be processed.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid TypeScript.
    #[error("failed to parse file {path}: {source}")]
    Syntax {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// The parser itself could not be set up.
    #[error("parser unavailable: {0}")]
    Parser(#[from] ParseError),

    /// The output directory could not be created or cleared.
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        /// The configured output directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The rewrite step rejected a component.
    #[error("failed to rewrite component {component}: {source}")]
    Rewrite {
        /// Qualified name of the component.
        component: String,
        /// The error reported by the rewriter.
        #[source]
        source: RewriteError,
    },
}

impl ScanError {
    /// Creates a new [`ScanError::Pattern`] error.
    #[inline]
    pub fn pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Syntax`] error.
    #[inline]
    pub fn syntax(path: impl Into<Utf8PathBuf>, source: ParseError) -> Self {
        Self::Syntax {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::OutputDir`] error.
    #[inline]
    pub fn output_dir(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::OutputDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Rewrite`] error.
    #[inline]
    pub fn rewrite(component: impl Into<String>, source: RewriteError) -> Self {
        Self::Rewrite {
            component: component.into(),
            source,
        }
    }

    /// Returns `true` if the process should stop rather than report and
    /// continue with another run.
    ///
    /// A half-cleared output directory leaves the destination in an unknown
    /// state, so the binary exits with a failure status.
    #[inline]
    #[must_use]
    pub const fn is_process_fatal(&self) -> bool {
        matches!(self, Self::OutputDir { .. })
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Read { path, .. } | Self::Syntax { path, .. } | Self::OutputDir { path, .. } => {
                Some(path)
            }
            Self::Config(_)
            | Self::Pattern { .. }
            | Self::NonUtf8Path(_)
            | Self::Parser(_)
            | Self::Rewrite { .. } => None,
        }
    }
}
