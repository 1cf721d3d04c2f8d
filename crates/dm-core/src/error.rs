//! Error types for the dm-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration failures
//! that can occur before any file is scanned.

use camino::Utf8PathBuf;

/// Errors that can occur while assembling the configuration for a run.
///
/// # Examples
///
/// ```
/// use dm_core::ConfigError;
///
/// let error = ConfigError::NoPatterns;
/// assert!(error.to_string().contains("no input patterns"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No path patterns were supplied and no file list is cached from an
    /// earlier run.
    #[error("no input patterns supplied and no files cached from a previous run")]
    NoPatterns,

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the options schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
