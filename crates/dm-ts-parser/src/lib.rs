//! TypeScript parser using tree-sitter for namespace and decorated class detection.
//!
//! This crate turns TypeScript source into a [`DeclarationTree`]: the
//! namespace headers and class declarations of a file, nested as in the
//! source, with every other construct pruned away.
//!
//! # Overview
//!
//! The main entry point is [`TsParser`], which wraps a tree-sitter parser
//! configured for TypeScript or TSX:
//!
//! ```
//! use dm_ts_parser::{DeclKind, TsParser};
//!
//! let mut parser = TsParser::new()?;
//! let source = r#"
//!     namespace App.Elements {
//!         /** The application shell. */
//!         @customElement('app-shell')
//!         export class AppShell extends Polymer.Element {}
//!     }
//! "#;
//!
//! let result = parser.parse(source)?;
//!
//! for node in result.declarations.preorder() {
//!     match &node.kind {
//!         DeclKind::Namespace(ns) => println!("namespace {}", ns.name),
//!         DeclKind::Class(class) => println!("class {} ({} decorators)", class.name, class.decorators.len()),
//!     }
//! }
//! # Ok::<(), dm_ts_parser::ParseError>(())
//! ```
//!
//! # Recognized Declarations
//!
//! | Source | Node |
//! |--------|------|
//! | `namespace A.B { ... }` | `Namespace` named `A.B` |
//! | `module A { ... }` | `Namespace` named `A` |
//! | `declare module 'x' { ... }` | `Namespace` named `'x'` |
//! | `@Foo class Bar {}` | `Class` named `Bar` |
//! | `@Foo export abstract class Bar {}` | `Class` named `Bar` |
//!
//! Class expressions and anonymous classes are not modeled, but any
//! declarations inside them are.
//!
//! # Syntax Errors
//!
//! Tree-sitter recovers from invalid input instead of failing. [`TsParser::parse`]
//! inspects the recovered tree and reports the first `ERROR` or `MISSING` node
//! as [`ParseError::Syntax`], so invalid files never produce declarations.
//!
//! # Thread Safety
//!
//! [`TsParser`] is `Send` but not `Sync`. Create one parser per worker thread.
//! The error queries are compiled once and shared globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod declarations;
mod diagnostics;
pub mod error;
mod parser;
pub mod queries;
pub mod syntax;

// Re-export main types for convenient access
pub use error::ParseError;
pub use parser::{ParseResult, TsParser, is_tsx_path};
pub use syntax::{ClassDecl, DeclKind, DeclNode, DeclarationTree, NamespaceDecl, Preorder};

pub use declarations::extract_declarations;
pub use diagnostics::first_syntax_error;
