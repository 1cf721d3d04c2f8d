//! Domain types for the decorator migration tool.
//!
//! # Module Organization
//!
//! - [`annotation`] - Decorator invocations
//! - [`comment`] - Documentation blocks and their roles
//! - [`component`] - The component descriptor
//! - [`location`] - Source positions and spans
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use dm_core::{Annotation, ComponentDescriptor, DocComment, SourceRef};
//! ```

pub mod annotation;
pub mod comment;
pub mod component;
pub mod location;

pub use annotation::Annotation;
pub use comment::{CommentRole, DocComment};
pub use component::ComponentDescriptor;
pub use location::{ByteSpan, SourceLocation, SourceRef};
