//! Output directory preparation.
//!
//! Before any component is rewritten, the configured output directory is
//! created if it is absent, or emptied if it already exists.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::error::ScanError;

/// What [`OutputDir::prepare`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDirStatus {
    /// The directory did not exist and was created.
    Created,
    /// The directory existed and its entries were removed.
    Cleared {
        /// Number of top-level entries removed.
        removed: usize,
    },
}

/// The directory rewritten components are written to.
///
/// # Examples
///
/// ```ignore
/// use dm_scanner::{OutputDir, OutputDirStatus};
///
/// let dir = OutputDir::new("./output/");
/// match dir.prepare()? {
///     OutputDirStatus::Created => println!("created {}", dir.path()),
///     OutputDirStatus::Cleared { removed } => println!("removed {removed} entries"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: Utf8PathBuf,
}

impl OutputDir {
    /// Creates a handle for `path` without touching the filesystem.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The directory path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Creates the directory, or removes everything inside it.
    ///
    /// The directory itself is kept when clearing. Symbolic links inside it
    /// are removed, never followed.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::OutputDir`] if the path exists but is not a
    /// directory, or if creating or clearing it fails.
    pub fn prepare(&self) -> Result<OutputDirStatus, ScanError> {
        let err = |source: io::Error| ScanError::output_dir(&self.path, source);

        match fs::metadata(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.path).map_err(err)?;
                info!(path = %self.path, "Created output directory");
                Ok(OutputDirStatus::Created)
            }
            Err(e) => Err(err(e)),
            Ok(meta) if !meta.is_dir() => Err(err(io::Error::other("path exists and is not a directory"))),
            Ok(_) => {
                warn!(path = %self.path, "Deleting the contents of the output directory");
                let removed = self.clear().map_err(err)?;
                info!(path = %self.path, removed, "Cleared output directory");
                Ok(OutputDirStatus::Cleared { removed })
            }
        }
    }

    fn clear(&self) -> io::Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
            removed += 1;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[test]
    fn test_prepare_creates_missing_directory() {
        let (_dir, root) = temp_root();
        let output = OutputDir::new(root.join("nested/out"));

        assert_eq!(output.prepare().expect("prepare"), OutputDirStatus::Created);
        assert!(output.path().is_dir());
    }

    #[test]
    fn test_prepare_clears_existing_directory() {
        let (_dir, root) = temp_root();
        let out = root.join("out");
        fs::create_dir_all(out.join("sub/deeper")).expect("create dirs");
        fs::write(out.join("a.json"), "{}").expect("write");
        fs::write(out.join("sub/deeper/b.json"), "{}").expect("write");

        let output = OutputDir::new(&out);
        assert_eq!(
            output.prepare().expect("prepare"),
            OutputDirStatus::Cleared { removed: 2 }
        );
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).expect("read dir").count(), 0);
    }

    #[test]
    fn test_prepare_empty_directory() {
        let (_dir, root) = temp_root();
        let output = OutputDir::new(&root);
        assert_eq!(
            output.prepare().expect("prepare"),
            OutputDirStatus::Cleared { removed: 0 }
        );
    }

    #[test]
    fn test_prepare_rejects_file() {
        let (_dir, root) = temp_root();
        let file = root.join("not-a-dir");
        fs::write(&file, "").expect("write");

        let err = OutputDir::new(&file).prepare().expect_err("file is not a directory");
        assert!(err.is_process_fatal());
        assert_eq!(err.path(), Some(file.as_path()));
    }
}
