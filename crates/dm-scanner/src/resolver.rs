//! Path pattern expansion.
//!
//! This module provides [`FileResolver`], which expands glob patterns into
//! the list of files a run processes, and [`PathPatterns`], the one-or-many
//! pattern input.
//!
//! # Matching Rules
//!
//! - Patterns are expanded in the order given; each pattern's matches come
//!   back sorted, and matches are concatenated without deduplication
//! - Only regular files are returned
//! - Paths matching any ignore pattern are dropped
//! - A pattern that matches nothing (including a missing directory) simply
//!   contributes no files
//!
//! # Examples
//!
//! ```ignore
//! use dm_core::GlobOptions;
//! use dm_scanner::{FileResolver, PathPatterns};
//!
//! let resolver = FileResolver::new(&GlobOptions::default())?;
//! let files = resolver.resolve(&PathPatterns::from("src/**/*.ts"))?;
//!
//! for file in &files {
//!     println!("Found: {file}");
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use dm_core::{ConfigError, GlobOptions};
use glob::{MatchOptions, Pattern};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::ScanError;

/// One or more glob patterns naming the input files.
///
/// # Examples
///
/// ```
/// use dm_scanner::PathPatterns;
///
/// let one = PathPatterns::from("src/**/*.ts");
/// let many = PathPatterns::from(vec!["a/*.ts".to_owned(), "b/*.ts".to_owned()]);
///
/// assert_eq!(one.len(), 1);
/// assert_eq!(many.iter().collect::<Vec<_>>(), vec!["a/*.ts", "b/*.ts"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPatterns(SmallVec<[String; 1]>);

impl PathPatterns {
    /// Iterates over the patterns in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of patterns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no patterns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PathPatterns {
    fn from(pattern: &str) -> Self {
        Self(SmallVec::from_iter([pattern.to_owned()]))
    }
}

impl From<String> for PathPatterns {
    fn from(pattern: String) -> Self {
        Self(SmallVec::from_iter([pattern]))
    }
}

impl From<Vec<String>> for PathPatterns {
    fn from(patterns: Vec<String>) -> Self {
        Self(SmallVec::from_vec(patterns))
    }
}

impl From<&[&str]> for PathPatterns {
    fn from(patterns: &[&str]) -> Self {
        patterns.iter().copied().collect()
    }
}

impl<'a> FromIterator<&'a str> for PathPatterns {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

/// Expands path patterns into the files to process.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dm_core::GlobOptions;
/// use dm_scanner::FileResolver;
///
/// let resolver = FileResolver::new(&GlobOptions::default())?;
/// assert!(resolver.is_ignored(Utf8Path::new("app/bower_components/polymer/polymer.ts")));
/// assert!(!resolver.is_ignored(Utf8Path::new("app/elements/shell.ts")));
/// # Ok::<(), dm_scanner::ScanError>(())
/// ```
#[derive(Debug)]
pub struct FileResolver {
    /// Compiled exclusion patterns.
    ignore: Vec<Pattern>,
    /// Options for expanding input patterns.
    expand_options: MatchOptions,
    /// Options for matching paths against the exclusion patterns.
    ignore_options: MatchOptions,
}

impl FileResolver {
    /// Creates a resolver for the given glob settings.
    ///
    /// # Errors
    ///
    /// - Returns [`ScanError::Config`] if an ignore pattern is blank
    /// - Returns [`ScanError::Pattern`] if an ignore pattern is not valid glob
    ///   syntax
    pub fn new(options: &GlobOptions) -> Result<Self, ScanError> {
        let ignore = options
            .ignore
            .iter()
            .map(|raw| {
                if raw.trim().is_empty() {
                    return Err(ConfigError::invalid_option("glob.ignore", "empty pattern").into());
                }
                Pattern::new(raw).map_err(|e| ScanError::pattern(raw.as_str(), e))
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        let expand_options = MatchOptions {
            case_sensitive: options.case_sensitive,
            require_literal_separator: false,
            require_literal_leading_dot: !options.dot,
        };

        // Ignore patterns are anchored with `**`, which must be able to cross
        // dot-directories such as temporary or hidden project roots.
        let ignore_options = MatchOptions {
            case_sensitive: options.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        Ok(Self {
            ignore,
            expand_options,
            ignore_options,
        })
    }

    /// Expands every pattern and returns the matching files.
    ///
    /// # Errors
    ///
    /// - Returns [`ScanError::Config`] if a pattern is blank
    /// - Returns [`ScanError::Pattern`] if a pattern is not valid glob syntax
    /// - Returns [`ScanError::NonUtf8Path`] if a match is not valid UTF-8
    pub fn resolve(&self, patterns: &PathPatterns) -> Result<Vec<Utf8PathBuf>, ScanError> {
        if patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::invalid_option("patterns", "empty pattern").into());
        }

        let mut files = Vec::new();
        for pattern in patterns.iter() {
            let before = files.len();
            self.expand(pattern, &mut files)?;
            debug!(pattern, matches = files.len() - before, "Expanded pattern");
        }
        Ok(files)
    }

    fn expand(&self, pattern: &str, out: &mut Vec<Utf8PathBuf>) -> Result<(), ScanError> {
        let entries = glob::glob_with(pattern, self.expand_options)
            .map_err(|e| ScanError::pattern(pattern, e))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry");
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            let path = Utf8PathBuf::from_path_buf(path).map_err(ScanError::NonUtf8Path)?;
            if self.is_ignored(&path) {
                debug!(path = %path, "Ignored");
                continue;
            }

            out.push(path);
        }

        Ok(())
    }

    /// Returns `true` if `path` matches one of the ignore patterns.
    #[must_use]
    pub fn is_ignored(&self, path: &Utf8Path) -> bool {
        self.ignore
            .iter()
            .any(|pattern| pattern.matches_path_with(path.as_std_path(), self.ignore_options))
    }
}
