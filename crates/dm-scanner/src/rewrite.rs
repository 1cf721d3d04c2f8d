//! The hand-off from extraction to the rewrite step.
//!
//! A run hands every [`ComponentDescriptor`] to a [`ComponentRewriter`] in
//! extraction order, together with the active [`RunOptions`]. Closures
//! implement the trait directly:
//!
//! ```
//! use dm_core::{ComponentDescriptor, RunOptions};
//! use dm_scanner::{ComponentRewriter, RewriteError};
//!
//! let mut seen = Vec::new();
//! let mut rewriter = |component: &ComponentDescriptor, _: &RunOptions| -> Result<(), RewriteError> {
//!     seen.push(component.qualified_name());
//!     Ok(())
//! };
//! # let _ = &mut rewriter as &mut dyn ComponentRewriter;
//! ```
//!
//! [`ManifestWriter`] is the bundled implementation: it records each
//! component as a JSON manifest for the `polymer-decorators` emitter.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use dm_core::{ComponentDescriptor, ConversionType, RunOptions};
use serde::Serialize;
use tracing::debug;

/// Error type returned by rewriters.
pub type RewriteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Consumes component descriptors produced by a run.
pub trait ComponentRewriter {
    /// Called once per run, before the first component is handed over.
    fn begin_run(&mut self, _options: &RunOptions) {}

    /// Rewrites one component.
    ///
    /// # Errors
    ///
    /// Any error aborts the run; later components are not handed over.
    fn rewrite(
        &mut self,
        component: &ComponentDescriptor,
        options: &RunOptions,
    ) -> Result<(), RewriteError>;
}

impl<F> ComponentRewriter for F
where
    F: FnMut(&ComponentDescriptor, &RunOptions) -> Result<(), RewriteError>,
{
    fn rewrite(
        &mut self,
        component: &ComponentDescriptor,
        options: &RunOptions,
    ) -> Result<(), RewriteError> {
        self(component, options)
    }
}

/// The document written for each component.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    conversion_type: ConversionType,
    qualified_name: String,
    component: &'a ComponentDescriptor,
}

/// Two components of one run map to the same manifest path.
#[derive(Debug, thiserror::Error)]
#[error("manifest {path} was already written for another component in this run")]
pub struct ManifestCollision {
    /// The contested manifest path.
    pub path: Utf8PathBuf,
}

/// Writes one pretty-printed JSON manifest per component.
///
/// Manifests are named `<file stem>.<qualified name>.json` and written to the
/// configured output directory, or next to the source file when
/// [`RunOptions::change_inline`] is set or no output directory is configured.
/// A component whose manifest path was already written in the same run is
/// rejected with [`ManifestCollision`] instead of overwriting it.
#[derive(Debug, Default)]
pub struct ManifestWriter {
    written: Vec<Utf8PathBuf>,
    seen: HashSet<Utf8PathBuf>,
}

impl ManifestWriter {
    /// Creates a writer that has written nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of the manifests written by the current run, in order.
    #[must_use]
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }

    /// Returns the path the manifest for `component` is written to.
    #[must_use]
    pub fn target(component: &ComponentDescriptor, options: &RunOptions) -> Utf8PathBuf {
        let source = &component.source.path;
        let dir = match &options.output_path {
            Some(output) if !options.change_inline => output.as_path(),
            _ => source.parent().unwrap_or_else(|| Utf8Path::new(".")),
        };
        let name = match source.file_stem() {
            Some(stem) if !stem.is_empty() => format!("{stem}.{}.json", component.qualified_name()),
            _ => format!("{}.json", component.qualified_name()),
        };
        dir.join(name)
    }
}

impl ComponentRewriter for ManifestWriter {
    fn begin_run(&mut self, _options: &RunOptions) {
        self.written.clear();
        self.seen.clear();
    }

    fn rewrite(
        &mut self,
        component: &ComponentDescriptor,
        options: &RunOptions,
    ) -> Result<(), RewriteError> {
        let target = Self::target(component, options);
        if !self.seen.insert(target.clone()) {
            return Err(ManifestCollision { path: target }.into());
        }

        let manifest = Manifest {
            conversion_type: options.conversion_type,
            qualified_name: component.qualified_name(),
            component,
        };
        let json = serde_json::to_string_pretty(&manifest)?;

        std::fs::write(&target, json)?;
        debug!(path = %target, "Wrote component manifest");

        self.written.push(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::{Annotation, SourceLocation, SourceRef};
    use smallvec::smallvec;

    fn component(path: &str, namespace: Option<&str>) -> ComponentDescriptor {
        ComponentDescriptor {
            name: "Foo".to_owned(),
            namespace: namespace.map(str::to_owned),
            comment: None,
            annotations: smallvec![Annotation::bare("Component", SourceLocation::new(1, 0, 0))],
            extends: None,
            use_metadata_reflection: false,
            source: SourceRef {
                path: Utf8PathBuf::from(path),
                ..SourceRef::default()
            },
        }
    }

    #[test]
    fn test_target_uses_output_path() {
        let options = RunOptions {
            output_path: Some(Utf8PathBuf::from("out")),
            ..RunOptions::default()
        };
        let target = ManifestWriter::target(&component("src/foo.ts", Some("NS")), &options);
        assert_eq!(target, "out/foo.NS.Foo.json");
    }

    #[test]
    fn test_target_inline_or_without_output() {
        let inline = RunOptions {
            change_inline: true,
            ..RunOptions::default()
        };
        assert_eq!(
            ManifestWriter::target(&component("src/foo.ts", None), &inline),
            "src/foo.Foo.json"
        );

        let no_output = RunOptions {
            output_path: None,
            ..RunOptions::default()
        };
        assert_eq!(
            ManifestWriter::target(&component("foo.ts", None), &no_output),
            "foo.Foo.json"
        );
    }

    #[test]
    fn test_rewrite_writes_manifest() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let options = RunOptions {
            output_path: Some(root.clone()),
            ..RunOptions::default()
        };

        let mut writer = ManifestWriter::new();
        writer
            .rewrite(&component("src/foo.ts", Some("NS")), &options)
            .expect("rewrite");

        assert_eq!(writer.written(), &[root.join("foo.NS.Foo.json")]);
        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(root.join("foo.NS.Foo.json")).expect("read manifest"),
        )
        .expect("valid json");
        assert_eq!(json["conversionType"], "polymer-decorators");
        assert_eq!(json["qualifiedName"], "NS.Foo");
        assert_eq!(json["component"]["name"], "Foo");
    }

    #[test]
    fn test_same_name_in_different_files() {
        let options = RunOptions {
            output_path: Some(Utf8PathBuf::from("out")),
            ..RunOptions::default()
        };
        let a = ManifestWriter::target(&component("src/a.ts", None), &options);
        let b = ManifestWriter::target(&component("src/b.ts", None), &options);
        assert_ne!(a, b);
    }

    #[test]
    fn test_collision_is_rejected_until_next_run() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let options = RunOptions {
            output_path: Some(root.clone()),
            ..RunOptions::default()
        };
        let foo = component("src/foo.ts", None);

        let mut writer = ManifestWriter::new();
        writer.begin_run(&options);
        writer.rewrite(&foo, &options).expect("first write");
        let err = writer.rewrite(&foo, &options).expect_err("same target");
        assert!(err.to_string().contains("already written"), "got {err}");
        assert_eq!(writer.written().len(), 1);

        writer.begin_run(&options);
        writer.rewrite(&foo, &options).expect("new run");
        assert_eq!(writer.written(), &[root.join("foo.Foo.json")]);
    }

    #[test]
    fn test_closure_rewriter() {
        let mut names = Vec::new();
        {
            let mut rewriter = |c: &ComponentDescriptor, _: &RunOptions| -> Result<(), RewriteError> {
                names.push(c.qualified_name());
                Ok(())
            };
            rewriter
                .rewrite(&component("a.ts", Some("NS")), &RunOptions::default())
                .expect("rewrite");
        }
        assert_eq!(names, vec!["NS.Foo".to_owned()]);
    }
}
