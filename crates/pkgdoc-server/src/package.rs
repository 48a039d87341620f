//! Package documents.
//!
//! Package documentation is produced by an external extractor and stored as
//! JSON files named after the import path: `github.com/user/repo` lives at
//! `<data_dir>/github.com/user/repo.json`.

use std::path::{Path, PathBuf};

use pkgdoc_render::Declaration;
use serde::{Deserialize, Serialize};

/// Extension of package document files.
const DOC_EXTENSION: &str = "json";

/// Documentation of a single package.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PackageDoc {
    /// Import path of the package.
    pub import_path: String,
    /// Import path of the repository root; empty for standard packages.
    #[serde(default)]
    pub project_root: String,
    /// Package name.
    #[serde(default)]
    pub name: String,
    /// First sentence of the package comment.
    #[serde(default)]
    pub synopsis: String,
    /// Package comment.
    #[serde(default)]
    pub doc: String,
    /// When the documentation was last extracted (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub consts: Vec<Item>,
    #[serde(default)]
    pub vars: Vec<Item>,
    #[serde(default)]
    pub funcs: Vec<Item>,
    #[serde(default)]
    pub types: Vec<Item>,
    /// Import paths of packages below this one.
    #[serde(default)]
    pub subdirectories: Vec<String>,
    /// Fields not modelled above, passed through to templates untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A documented declaration group.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Item {
    /// Declared name; empty for grouped `const`/`var` blocks.
    #[serde(default)]
    pub name: String,
    pub decl: Declaration,
    #[serde(default)]
    pub doc: String,
}

/// Entry of the package index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub import_path: String,
    pub synopsis: String,
}

/// Template context of `package.html`.
#[derive(Debug, Serialize)]
pub struct PackagePage<'a> {
    pub pkg: &'a PackageDoc,
}

/// Template context of `index.html`.
#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub packages: Vec<PackageSummary>,
}

/// Template context of `notfound.html`.
#[derive(Debug, Serialize)]
pub struct NotFoundPage<'a> {
    pub import_path: &'a str,
}

/// Error loading a package document.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The import path cannot name a file inside the data directory.
    #[error("invalid import path: {0}")]
    InvalidPath(String),
    /// I/O error.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON or lacks required fields.
    #[error("invalid package document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only store of package documents in a data directory.
#[derive(Clone, Debug)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the document for `import_path`.
    ///
    /// Returns `Ok(None)` when no document exists for the path.
    ///
    /// # Errors
    ///
    /// Returns an error for paths with empty, `.` or `..` segments, and for
    /// documents that cannot be read or parsed.
    pub fn get(&self, import_path: &str) -> Result<Option<PackageDoc>, PackageError> {
        let path = self.document_path(import_path)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PackageError::Io { path, source }),
        };
        let doc = serde_json::from_str(&content)
            .map_err(|source| PackageError::Parse { path, source })?;
        Ok(Some(doc))
    }

    /// List every package in the store, sorted by import path.
    ///
    /// Unreadable documents are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be traversed.
    pub fn list(&self) -> Result<Vec<PackageSummary>, PackageError> {
        let mut packages = Vec::new();
        self.collect(&self.root, &mut packages)?;
        packages.sort_by(|a, b| a.import_path.cmp(&b.import_path));
        Ok(packages)
    }

    fn collect(&self, dir: &Path, out: &mut Vec<PackageSummary>) -> Result<(), PackageError> {
        let io_error = |source| PackageError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(io_error(err)),
        };

        for entry in entries {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                self.collect(&path, out)?;
                continue;
            }
            if path.extension().is_none_or(|ext| ext != DOC_EXTENSION) {
                continue;
            }
            let Some(import_path) = self.import_path_of(&path) else {
                continue;
            };
            match self.get(&import_path) {
                Ok(Some(doc)) => out.push(PackageSummary {
                    import_path: doc.import_path,
                    synopsis: doc.synopsis,
                }),
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "Skipping package document"),
            }
        }
        Ok(())
    }

    /// Import path for a document file, derived from its location.
    fn import_path_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(segments.join("/"))
    }

    fn document_path(&self, import_path: &str) -> Result<PathBuf, PackageError> {
        let invalid = || PackageError::InvalidPath(import_path.to_owned());
        let mut path = self.root.clone();
        for segment in import_path.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(invalid());
            }
            path.push(segment);
        }
        let mut file_name = path.file_name().ok_or_else(invalid)?.to_os_string();
        file_name.push(".");
        file_name.push(DOC_EXTENSION);
        path.set_file_name(file_name);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_doc(root: &Path, import_path: &str, body: &str) {
        let path = root.join(format!("{import_path}.json"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_get_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "github.com/user/repo",
            r#"{
                "import_path": "github.com/user/repo",
                "project_root": "github.com/user/repo",
                "name": "repo",
                "synopsis": "Package repo does things.",
                "funcs": [{
                    "name": "New",
                    "decl": {"text": "func New() *T", "annotations": []},
                    "doc": "New returns a T."
                }],
                "stars": 12
            }"#,
        );

        let doc = PackageStore::new(dir.path())
            .get("github.com/user/repo")
            .unwrap()
            .unwrap();

        assert_eq!(doc.name, "repo");
        assert_eq!(doc.funcs.len(), 1);
        assert_eq!(doc.funcs[0].decl.text, "func New() *T");
        assert_eq!(doc.extra["stars"], 12);
        assert!(doc.consts.is_empty());
    }

    #[test]
    fn test_get_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path());
        assert!(store.get("example.com/none").unwrap().is_none());
    }

    #[test]
    fn test_get_rejects_traversal() {
        let store = PackageStore::new("/data");
        for path in ["../etc/passwd", "a/../../b", "a//b", "", "./a", "a\\..\\b"] {
            assert!(
                matches!(store.get(path), Err(PackageError::InvalidPath(_))),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_get_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "broken", "{not json");
        let err = PackageStore::new(dir.path()).get("broken").unwrap_err();
        assert!(matches!(err, PackageError::Parse { .. }));
    }

    #[test]
    fn test_list_is_sorted_and_skips_bad_documents() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(
            dir.path(),
            "net/http",
            r#"{"import_path": "net/http", "synopsis": "HTTP."}"#,
        );
        write_doc(dir.path(), "fmt", r#"{"import_path": "fmt", "synopsis": "Formatting."}"#);
        write_doc(dir.path(), "bad", "[]");
        fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let packages = PackageStore::new(dir.path()).list().unwrap();

        assert_eq!(
            packages,
            vec![
                PackageSummary {
                    import_path: "fmt".to_owned(),
                    synopsis: "Formatting.".to_owned(),
                },
                PackageSummary {
                    import_path: "net/http".to_owned(),
                    synopsis: "HTTP.".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_list_missing_data_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PackageStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }
}
