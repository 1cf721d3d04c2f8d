//! Core types, errors, and configuration for the decorator migration tool.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`ComponentDescriptor`] - the record extracted for every decorated class
//! - [`Annotation`] and [`DocComment`] - decorator and documentation metadata
//! - [`SourceLocation`], [`ByteSpan`], [`SourceRef`] - positions back into source files
//! - [`RunOptions`] and [`OptionOverrides`] - run configuration and its merging rules
//! - [`ConfigError`] - configuration failures
//!
//! Descriptors are produced by `dm-scanner` and consumed by a rewrite step that
//! emits the same component with the `polymer-decorators` vocabulary.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConversionType, GlobOptions, OptionOverrides, RunOptions};
pub use error::ConfigError;
pub use types::{
    Annotation, ByteSpan, CommentRole, ComponentDescriptor, DocComment, SourceLocation, SourceRef,
};
