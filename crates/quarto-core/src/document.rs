/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Editor document snapshots.
 */

//! Editor document snapshots.
//!
//! A document is the unit an editor saves: a path, the text that was saved,
//! and the kind of document (plain text source or notebook). Documents may
//! come from the editor (in-memory buffers) or from the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quarto_system_runtime::SystemRuntime;

use crate::error::Result;

/// Kind of an editor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    /// Text source (`.qmd`, `.md`, `.Rmd`, ...)
    #[default]
    Text,
    /// Jupyter notebook (`.ipynb`)
    Notebook,
}

impl DocumentKind {
    /// Determine the kind from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ipynb") => DocumentKind::Notebook,
            _ => DocumentKind::Text,
        }
    }
}

/// An immutable snapshot of a document at save time.
#[derive(Debug, Clone)]
pub struct EditorDocument {
    path: PathBuf,
    content: String,
    kind: DocumentKind,
    /// Version number for tracking changes (optional, used by LSP).
    version: Option<i32>,
}

impl EditorDocument {
    /// Create a document, inferring its kind from the path.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let kind = DocumentKind::from_path(&path);
        Self {
            path,
            content: content.into(),
            kind,
            version: None,
        }
    }

    /// Create a document with a version number.
    pub fn with_version(path: impl Into<PathBuf>, content: impl Into<String>, version: i32) -> Self {
        Self {
            version: Some(version),
            ..Self::new(path, content)
        }
    }

    /// Override the inferred kind.
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Load a document from the runtime's filesystem.
    pub fn load(runtime: &dyn SystemRuntime, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = runtime.file_read_string(&path)?;
        Ok(Self::new(path, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn is_notebook(&self) -> bool {
        self.kind == DocumentKind::Notebook
    }

    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Replace the content with a new version.
    pub fn set_content_with_version(&mut self, content: impl Into<String>, version: i32) {
        self.content = content.into();
        self.version = Some(version);
    }
}

/// In-memory store of open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, EditorDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or replace a document in the store.
    pub fn open(&mut self, uri: impl Into<String>, document: EditorDocument) {
        self.documents.insert(uri.into(), document);
    }

    /// Update a document's content. Unknown URIs are ignored.
    pub fn change(&mut self, uri: &str, content: impl Into<String>, version: i32) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.set_content_with_version(content, version);
        }
    }

    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    pub fn get(&self, uri: &str) -> Option<&EditorDocument> {
        self.documents.get(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarto_system_runtime::MemoryRuntime;

    #[test]
    fn kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("/p/analysis.ipynb")),
            DocumentKind::Notebook
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("/p/Analysis.IPYNB")),
            DocumentKind::Notebook
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("/p/index.qmd")),
            DocumentKind::Text
        );
        assert_eq!(DocumentKind::from_path(Path::new("/p/README")), DocumentKind::Text);
    }

    #[test]
    fn document_creation() {
        let doc = EditorDocument::new("/p/index.qmd", "# Hello");
        assert_eq!(doc.path(), Path::new("/p/index.qmd"));
        assert_eq!(doc.content(), "# Hello");
        assert!(!doc.is_notebook());
        assert_eq!(doc.version(), None);

        let nb = EditorDocument::with_version("/p/index.qmd", "", 3).with_kind(DocumentKind::Notebook);
        assert!(nb.is_notebook());
        assert_eq!(nb.version(), Some(3));
    }

    #[test]
    fn document_load_from_runtime() {
        let rt = MemoryRuntime::new().with_file("/p/report.qmd", "---\ntitle: R\n---\n");
        let doc = EditorDocument::load(&rt, "/p/report.qmd").unwrap();
        assert_eq!(doc.content(), "---\ntitle: R\n---\n");
        assert!(EditorDocument::load(&rt, "/p/missing.qmd").is_err());
    }

    #[test]
    fn document_store_lifecycle() {
        let mut store = DocumentStore::new();
        store.open("file:///a.qmd", EditorDocument::with_version("/a.qmd", "a", 1));
        store.open("file:///b.qmd", EditorDocument::with_version("/b.qmd", "b", 1));
        assert_eq!(store.len(), 2);

        store.change("file:///a.qmd", "updated a", 2);
        let a = store.get("file:///a.qmd").unwrap();
        assert_eq!(a.content(), "updated a");
        assert_eq!(a.version(), Some(2));

        store.close("file:///a.qmd");
        assert_eq!(store.len(), 1);
        assert!(!store.contains("file:///a.qmd"));
        assert!(store.contains("file:///b.qmd"));
    }
}
