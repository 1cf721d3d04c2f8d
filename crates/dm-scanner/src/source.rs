//! Reading and parsing source files.
//!
//! [`SourceLoader`] owns one TypeScript and one TSX parser and turns a path
//! into a [`SourceFile`]. [`load_all`] loads a whole file list, either on the
//! current thread or on the rayon pool with one loader per worker.
//!
//! # Ordering
//!
//! Both modes return files in input order and report the error of the first
//! failing file in input order, so a parallel run fails the same way a
//! sequential one does.

use camino::{Utf8Path, Utf8PathBuf};
use dm_ts_parser::{DeclarationTree, ParseError, TsParser, is_tsx_path};
use rayon::prelude::*;
use tracing::debug;

use crate::error::ScanError;

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The path the file was read from.
    pub path: Utf8PathBuf,

    /// The file contents.
    pub text: String,

    /// Namespaces and classes declared in the file.
    pub declarations: DeclarationTree,
}

/// Reads and parses files, reusing its parsers between calls.
///
/// # Examples
///
/// ```ignore
/// use dm_scanner::SourceLoader;
/// use camino::Utf8Path;
///
/// let mut loader = SourceLoader::new()?;
/// let file = loader.load(Utf8Path::new("src/app-shell.ts"))?;
/// println!("{} classes", file.declarations.classes().count());
/// ```
#[derive(Debug)]
pub struct SourceLoader {
    typescript: TsParser,
    tsx: TsParser,
}

impl SourceLoader {
    /// Creates a loader with fresh TypeScript and TSX parsers.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if a grammar cannot be loaded.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            typescript: TsParser::new()?,
            tsx: TsParser::new_tsx()?,
        })
    }

    /// Reads and parses one file.
    ///
    /// `.tsx` files are parsed with the TSX grammar, everything else with the
    /// TypeScript grammar.
    ///
    /// # Errors
    ///
    /// - Returns [`ScanError::Read`] if the file cannot be read
    /// - Returns [`ScanError::Syntax`] if the file is not valid TypeScript
    pub fn load(&mut self, path: &Utf8Path) -> Result<SourceFile, ScanError> {
        let text = std::fs::read_to_string(path).map_err(|e| ScanError::read(path, e))?;

        let parser = if is_tsx_path(path.as_std_path()) {
            &mut self.tsx
        } else {
            &mut self.typescript
        };
        let result = parser.parse(&text).map_err(|e| ScanError::syntax(path, e))?;

        debug!(
            path = %path,
            tsx = parser.is_tsx(),
            classes = result.declarations.classes().count(),
            "Parsed file"
        );

        Ok(SourceFile {
            path: path.to_owned(),
            text,
            declarations: result.declarations,
        })
    }
}

/// Loads every file in `paths`, failing on the first error in input order.
///
/// With `parallel` set, files are read and parsed on the rayon thread pool.
///
/// # Errors
///
/// Returns the error of the first file (in input order) that could not be
/// loaded, or [`ScanError::Parser`] if no parser could be created.
pub fn load_all(paths: &[Utf8PathBuf], parallel: bool) -> Result<Vec<SourceFile>, ScanError> {
    if !parallel {
        let mut loader = SourceLoader::new()?;
        return paths.iter().map(|path| loader.load(path)).collect();
    }

    let results: Vec<Result<SourceFile, ScanError>> = paths
        .par_iter()
        .map_init(SourceLoader::new, |loader, path| match loader {
            Ok(loader) => loader.load(path),
            Err(e) => Err(ScanError::Parser(e.clone())),
        })
        .collect();

    results.into_iter().collect()
}
