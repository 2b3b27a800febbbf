//! Core editor integration logic for Quarto
//!
//! This crate contains the decisions an editor integration makes about
//! Quarto documents, independent of any particular editor protocol.
//!
//! # Architecture
//!
//! - [`EditorDocument`] - Snapshot of a saved document (path, text, kind)
//! - [`FrontMatter`] - Parsed YAML metadata from a document or metadata file
//! - [`ProjectRoot`] - The project or workspace folder scoping a document
//! - [`RenderOnSavePolicy`] - Whether a save should trigger a render
//! - [`HostVersionInfo`] - Host capabilities derived from its version
//!
//! Filesystem access goes through [`quarto_system_runtime::SystemRuntime`],
//! so everything here also works against an in-memory file tree.

pub mod document;
pub mod error;
pub mod front_matter;
pub mod host;
pub mod project;
pub mod render_on_save;
pub mod settings;

// Re-export commonly used types
pub use document::{DocumentKind, DocumentStore, EditorDocument};
pub use error::{QuartoError, Result};
pub use front_matter::{
    FrontMatter, document_front_matter, extract_front_matter, is_shiny_document,
    parse_front_matter_str, parse_yaml_str, yaml_to_json,
};
pub use host::{HostVersionInfo, NOTEBOOK_SAVE_EVENTS_MIN_VERSION};
pub use project::{
    ProjectConfig, ProjectRoot, WorkspaceFolders, metadata_files_for_document,
    preview_dir_for_document, project_dir_for_document, resolve_project_root,
    yaml_from_metadata_file,
};
pub use render_on_save::{
    DocumentFrontMatter, FrontMatterSource, HostConfiguration, MetadataFileEnumerator,
    MetadataFileParser, ProjectLookup, ProjectResolver, RenderOnSavePolicy, WorkspaceResolver,
};
pub use settings::SettingsConfiguration;
