//! TypeScript parser management using tree-sitter.
//!
//! This module provides the [`TsParser`] struct for parsing TypeScript files
//! into a [`DeclarationTree`].

use std::path::Path;

use tree_sitter::{Language, Parser, Query};

use crate::declarations::extract_declarations;
use crate::diagnostics::first_syntax_error;
use crate::error::ParseError;
use crate::queries::{get_tsx_error_query, get_typescript_error_query};
use crate::syntax::DeclarationTree;

/// Indicates whether the parser is configured for TypeScript or TSX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserKind {
    TypeScript,
    Tsx,
}

impl ParserKind {
    const fn label(self) -> &'static str {
        match self {
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
        }
    }
}

/// Result of parsing a TypeScript file.
#[derive(Debug)]
pub struct ParseResult {
    /// Namespaces and classes declared in the file.
    pub declarations: DeclarationTree,
}

/// TypeScript parser for extracting declarations from source files.
///
/// Wraps a tree-sitter parser configured for TypeScript. The parser can be
/// reused for multiple files to avoid repeated initialization.
///
/// # Thread Safety
///
/// `TsParser` is `Send` but not `Sync`. For parallel scanning with rayon,
/// create one parser per worker (for example with `map_init`).
///
/// The syntax error [`Query`] is thread-safe and shared across all parser
/// instances.
///
/// # Examples
///
/// ```
/// use dm_ts_parser::TsParser;
///
/// let mut parser = TsParser::new()?;
/// let source = "namespace NS { @Component class Foo {} }";
/// let result = parser.parse(source)?;
///
/// for class in result.declarations.classes() {
///     println!("{} has {} decorators", class.name, class.decorators.len());
/// }
/// # Ok::<(), dm_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// Whether this is a TypeScript or TSX parser.
    kind: ParserKind,
}

impl TsParser {
    /// Creates a new TypeScript parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the TypeScript language
    /// cannot be set on the parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use dm_ts_parser::TsParser;
    ///
    /// let parser = TsParser::new()?;
    /// # Ok::<(), dm_ts_parser::ParseError>(())
    /// ```
    pub fn new() -> Result<Self, ParseError> {
        Self::with_language(
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ParserKind::TypeScript,
        )
    }

    /// Creates a new TSX parser. Use this for `.tsx` files.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the TSX language
    /// cannot be set on the parser.
    pub fn new_tsx() -> Result<Self, ParseError> {
        Self::with_language(tree_sitter_typescript::LANGUAGE_TSX.into(), ParserKind::Tsx)
    }

    fn with_language(language: Language, kind: ParserKind) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, kind })
    }

    /// Returns the syntax error query for this parser's language.
    fn get_query(&self) -> Result<&'static Query, ParseError> {
        match self.kind {
            ParserKind::TypeScript => get_typescript_error_query(),
            ParserKind::Tsx => get_tsx_error_query(),
        }
    }

    /// Parses TypeScript source code and extracts its declarations.
    ///
    /// # Errors
    ///
    /// - Returns [`ParseError::Parse`] if tree-sitter produces no tree
    /// - Returns [`ParseError::QueryCompile`] if the error query fails to compile
    /// - Returns [`ParseError::Syntax`] if the source is not valid TypeScript
    ///
    /// # Examples
    ///
    /// ```
    /// use dm_ts_parser::{ParseError, TsParser};
    ///
    /// let mut parser = TsParser::new()?;
    ///
    /// let result = parser.parse("@Component class Foo {}")?;
    /// assert_eq!(result.declarations.classes().count(), 1);
    ///
    /// let err = parser.parse("class {").unwrap_err();
    /// assert!(err.is_syntax());
    /// # Ok::<(), ParseError>(())
    /// ```
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::Parse)?;

        let query = self.get_query()?;
        if let Some(err) = first_syntax_error(&tree, source, query) {
            return Err(err);
        }

        let declarations = extract_declarations(&tree, source);

        Ok(ParseResult { declarations })
    }

    /// Returns `true` if this parser uses the TSX grammar.
    #[inline]
    #[must_use]
    pub fn is_tsx(&self) -> bool {
        self.kind == ParserKind::Tsx
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("language", &self.kind.label())
            .finish_non_exhaustive()
    }
}

/// Returns `true` if `path` should be parsed with the TSX grammar.
#[must_use]
pub fn is_tsx_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsx"))
}
