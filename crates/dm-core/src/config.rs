//! Run configuration for the decorator migration tool.
//!
//! This module provides:
//!
//! - [`RunOptions`] - the fully resolved options for one run
//! - [`GlobOptions`] - file resolution settings (exclusions, dot-files, case)
//! - [`ConversionType`] - the rewrite dialect selector
//! - [`OptionOverrides`] - caller input merged field-by-field over the defaults
//!
//! The JSON keys follow the camelCase names users already write in their
//! configuration files (`outputPath`, `useMetadataReflection`, `glob.ignore`, ...).

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Default destination directory for rewritten components.
pub const DEFAULT_OUTPUT_PATH: &str = "./output/";

/// Dependency directories excluded from file resolution unless overridden.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/bower_components/**", "**/node_modules/**"];

/// The decorator vocabulary the rewrite step converts components to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ConversionType {
    /// The `polymer-decorators` package shipped with Polymer 2.4.
    #[default]
    PolymerDecorators,
}

impl ConversionType {
    /// Returns the identifier used in configuration files.
    ///
    /// # Examples
    ///
    /// ```
    /// use dm_core::ConversionType;
    ///
    /// assert_eq!(ConversionType::PolymerDecorators.as_str(), "polymer-decorators");
    /// ```
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PolymerDecorators => "polymer-decorators",
        }
    }
}

impl std::fmt::Display for ConversionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings passed through to the file resolver.
///
/// # Examples
///
/// ```
/// use dm_core::GlobOptions;
///
/// let glob = GlobOptions::default();
/// assert!(glob.ignore.iter().any(|p| p.contains("node_modules")));
/// assert!(!glob.dot);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobOptions {
    /// Glob patterns for paths that are never returned.
    pub ignore: Vec<String>,

    /// Whether wildcards also match names starting with a dot.
    pub dot: bool,

    /// Whether matching is case-sensitive.
    pub case_sensitive: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            dot: false,
            case_sensitive: true,
        }
    }
}

/// Fully resolved options for one migration run.
///
/// Every descriptor produced during the run copies
/// [`use_metadata_reflection`](Self::use_metadata_reflection), and the rewrite
/// step receives the whole struct alongside each descriptor.
///
/// # Examples
///
/// ```
/// use dm_core::{ConversionType, RunOptions};
///
/// let options = RunOptions::default();
/// assert_eq!(options.output_path.as_deref().map(|p| p.as_str()), Some("./output/"));
/// assert!(!options.use_metadata_reflection);
/// assert_eq!(options.conversion_type, ConversionType::PolymerDecorators);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunOptions {
    /// Rewrite components next to their source instead of in the output directory.
    pub change_inline: bool,

    /// Destination directory, created or cleared before processing.
    /// `None` disables directory preparation.
    pub output_path: Option<Utf8PathBuf>,

    /// Copied verbatim into every descriptor.
    pub use_metadata_reflection: bool,

    /// Rewrite dialect.
    pub conversion_type: ConversionType,

    /// File resolution settings.
    pub glob: GlobOptions,

    /// Parse files on the rayon thread pool. Descriptor order is unaffected.
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            change_inline: false,
            output_path: Some(Utf8PathBuf::from(DEFAULT_OUTPUT_PATH)),
            use_metadata_reflection: false,
            conversion_type: ConversionType::default(),
            glob: GlobOptions::default(),
            parallel: false,
        }
    }
}

impl RunOptions {
    /// Builds options from the defaults with `overrides` applied on top.
    ///
    /// Fields the caller left unset keep their default values. A supplied
    /// `glob` group replaces the default group as a whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use dm_core::{OptionOverrides, RunOptions};
    ///
    /// let overrides = OptionOverrides {
    ///     use_metadata_reflection: Some(true),
    ///     ..OptionOverrides::default()
    /// };
    /// let options = RunOptions::from_overrides(&overrides);
    ///
    /// assert!(options.use_metadata_reflection);
    /// assert_eq!(options.output_path, RunOptions::default().output_path);
    /// ```
    #[must_use]
    pub fn from_overrides(overrides: &OptionOverrides) -> Self {
        let mut options = Self::default();
        overrides.apply_to(&mut options);
        options
    }
}

/// Caller-supplied options; every field is optional.
///
/// Deserializes from the same camelCase JSON as [`RunOptions`]. An explicit
/// `"outputPath": null` is distinguished from an absent key and disables the
/// output directory.
///
/// # Examples
///
/// ```
/// use dm_core::OptionOverrides;
///
/// let overrides = OptionOverrides::from_json_str(r#"{"outputPath": null}"#)?;
/// assert_eq!(overrides.output_path, Some(None));
///
/// let overrides = OptionOverrides::from_json_str("{}")?;
/// assert_eq!(overrides.output_path, None);
/// # Ok::<(), dm_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionOverrides {
    /// Overrides [`RunOptions::change_inline`].
    pub change_inline: Option<bool>,

    /// Overrides [`RunOptions::output_path`]; `Some(None)` disables it.
    #[serde(deserialize_with = "explicit_null")]
    pub output_path: Option<Option<Utf8PathBuf>>,

    /// Overrides [`RunOptions::use_metadata_reflection`].
    pub use_metadata_reflection: Option<bool>,

    /// Overrides [`RunOptions::conversion_type`].
    pub conversion_type: Option<ConversionType>,

    /// Replaces [`RunOptions::glob`].
    pub glob: Option<GlobOptions>,

    /// Overrides [`RunOptions::parallel`].
    pub parallel: Option<bool>,
}

impl OptionOverrides {
    /// Parses overrides from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses overrides from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    ///
    /// Used to put command-line flags over a configuration file.
    #[must_use]
    pub fn layered(self, other: Self) -> Self {
        Self {
            change_inline: other.change_inline.or(self.change_inline),
            output_path: other.output_path.or(self.output_path),
            use_metadata_reflection: other
                .use_metadata_reflection
                .or(self.use_metadata_reflection),
            conversion_type: other.conversion_type.or(self.conversion_type),
            glob: other.glob.or(self.glob),
            parallel: other.parallel.or(self.parallel),
        }
    }

    /// Writes every set field into `options`.
    pub fn apply_to(&self, options: &mut RunOptions) {
        if let Some(change_inline) = self.change_inline {
            options.change_inline = change_inline;
        }
        if let Some(output_path) = &self.output_path {
            options.output_path.clone_from(output_path);
        }
        if let Some(reflection) = self.use_metadata_reflection {
            options.use_metadata_reflection = reflection;
        }
        if let Some(conversion_type) = self.conversion_type {
            options.conversion_type = conversion_type;
        }
        if let Some(glob) = &self.glob {
            options.glob.clone_from(glob);
        }
        if let Some(parallel) = self.parallel {
            options.parallel = parallel;
        }
    }
}

/// Maps a present key to `Some(value)`, so a JSON `null` becomes `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
