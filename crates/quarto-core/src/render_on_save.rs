/*
 * render_on_save.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Decide whether saving a document should trigger a render.
 */

//! Render-on-save resolution.
//!
//! When a document is saved the editor asks whether it should be re-rendered.
//! The answer is resolved in layers, first answer wins:
//!
//! 1. Notebooks render on save exactly when the host can report notebook
//!    saves (see [`crate::HostVersionInfo`]).
//! 2. The document's own front matter (`editor: { render-on-save: bool }`).
//! 3. The metadata files of the document's project (or workspace folder),
//!    in precedence order.
//! 4. The editor setting `quarto.render.renderOnSave` (default `false`).
//!
//! The decision never fails. Unreadable or malformed inputs count as
//! "no setting" and resolution moves on to the next layer. Metadata files are
//! read one at a time and reading stops at the first file with a setting.
//!
//! # Example
//!
//! ```ignore
//! use quarto_core::{
//!     DocumentFrontMatter, EditorDocument, HostVersionInfo, ProjectLookup,
//!     RenderOnSavePolicy, SettingsConfiguration, WorkspaceFolders,
//! };
//! use quarto_system_runtime::NativeRuntime;
//!
//! let runtime = NativeRuntime::new();
//! let lookup = ProjectLookup::new(&runtime);
//! let workspace = WorkspaceFolders::new([workspace_dir]);
//! let settings = SettingsConfiguration::default();
//! let policy = RenderOnSavePolicy::new(&DocumentFrontMatter, &lookup, &workspace, &settings);
//!
//! let host = HostVersionInfo::new("1.85.0", true);
//! let document = EditorDocument::load(&runtime, "report.qmd")?;
//! let render = policy
//!     .should_render_on_save(&document, host.notebook_save_events_available())
//!     .await;
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quarto_system_runtime::SystemRuntime;

use crate::document::EditorDocument;
use crate::front_matter::{FrontMatter, document_front_matter};
use crate::project::{
    ProjectRoot, metadata_files_for_document, project_dir_for_document, yaml_from_metadata_file,
};

/// Settings section holding Quarto editor options.
pub const SETTINGS_SECTION: &str = "quarto";

/// Key of the global render-on-save option within [`SETTINGS_SECTION`].
pub const RENDER_ON_SAVE_SETTING: &str = "render.renderOnSave";

/// Supplies the parsed front matter of a document.
#[async_trait]
pub trait FrontMatterSource: Send + Sync {
    /// Parse the document's metadata block; empty on any failure.
    async fn front_matter(&self, document: &EditorDocument) -> FrontMatter;
}

/// Finds the project directory that owns a path.
pub trait ProjectResolver: Send + Sync {
    fn project_dir_for(&self, path: &Path) -> Option<PathBuf>;
}

/// Finds the editor workspace folder that contains a path.
pub trait WorkspaceResolver: Send + Sync {
    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf>;
}

/// Lists the metadata files that apply to a document, highest precedence first.
pub trait MetadataFileEnumerator: Send + Sync {
    fn metadata_files_for(&self, path: &Path, root: &ProjectRoot) -> Vec<PathBuf>;
}

/// Reads a metadata file into a front matter mapping.
#[async_trait]
pub trait MetadataFileParser: Send + Sync {
    /// Parse a metadata file; empty on any failure.
    async fn parse_metadata_file(&self, file: &Path) -> FrontMatter;
}

/// Editor-level configuration.
pub trait HostConfiguration: Send + Sync {
    /// A boolean setting, `None` when absent or not a boolean.
    fn get_bool(&self, section: &str, key: &str) -> Option<bool>;
}

/// Front matter parsed from the saved document's own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFrontMatter;

#[async_trait]
impl FrontMatterSource for DocumentFrontMatter {
    async fn front_matter(&self, document: &EditorDocument) -> FrontMatter {
        document_front_matter(document.content())
    }
}

/// Project and metadata lookups over a [`SystemRuntime`].
#[derive(Clone, Copy)]
pub struct ProjectLookup<'a> {
    runtime: &'a dyn SystemRuntime,
}

impl<'a> ProjectLookup<'a> {
    pub fn new(runtime: &'a dyn SystemRuntime) -> Self {
        Self { runtime }
    }
}

impl ProjectResolver for ProjectLookup<'_> {
    fn project_dir_for(&self, path: &Path) -> Option<PathBuf> {
        project_dir_for_document(self.runtime, path)
    }
}

impl MetadataFileEnumerator for ProjectLookup<'_> {
    fn metadata_files_for(&self, path: &Path, root: &ProjectRoot) -> Vec<PathBuf> {
        metadata_files_for_document(self.runtime, path, root)
    }
}

#[async_trait]
impl MetadataFileParser for ProjectLookup<'_> {
    async fn parse_metadata_file(&self, file: &Path) -> FrontMatter {
        yaml_from_metadata_file(self.runtime, file)
    }
}

/// Decides whether a saved document should be rendered.
///
/// Holds only borrowed collaborators; build one per save event or keep one
/// around, evaluation has no state of its own.
#[derive(Clone, Copy)]
pub struct RenderOnSavePolicy<'a> {
    pub front_matter: &'a dyn FrontMatterSource,
    pub projects: &'a dyn ProjectResolver,
    pub workspace: &'a dyn WorkspaceResolver,
    pub metadata_files: &'a dyn MetadataFileEnumerator,
    pub metadata_parser: &'a dyn MetadataFileParser,
    pub configuration: &'a dyn HostConfiguration,
}

impl<'a> RenderOnSavePolicy<'a> {
    /// Build a policy whose project, metadata enumeration and metadata
    /// parsing all come from one lookup.
    pub fn new<L>(
        front_matter: &'a dyn FrontMatterSource,
        lookup: &'a L,
        workspace: &'a dyn WorkspaceResolver,
        configuration: &'a dyn HostConfiguration,
    ) -> Self
    where
        L: ProjectResolver + MetadataFileEnumerator + MetadataFileParser + 'a,
    {
        Self {
            front_matter,
            projects: lookup,
            workspace,
            metadata_files: lookup,
            metadata_parser: lookup,
            configuration,
        }
    }

    /// Whether `document` should be rendered now that it has been saved.
    ///
    /// `notebook_save_events_available` is the host capability computed by
    /// [`crate::HostVersionInfo::notebook_save_events_available`].
    pub async fn should_render_on_save(
        &self,
        document: &EditorDocument,
        notebook_save_events_available: bool,
    ) -> bool {
        let path = document.path();

        if document.is_notebook() {
            tracing::debug!(
                document = %path.display(),
                notebook_save_events_available,
                "Notebook render-on-save follows host save events"
            );
            return notebook_save_events_available;
        }

        let front_matter = self.front_matter.front_matter(document).await;
        if let Some(setting) = front_matter.render_on_save() {
            tracing::debug!(document = %path.display(), setting, "Using document render-on-save");
            return setting;
        }

        if let Some(setting) = self.project_setting(path).await {
            return setting;
        }

        let setting = self.global_setting();
        tracing::debug!(document = %path.display(), setting, "Using editor render-on-save");
        setting
    }

    /// The first metadata file setting for a document, if any.
    pub async fn project_setting(&self, path: &Path) -> Option<bool> {
        let root = match self.projects.project_dir_for(path) {
            Some(dir) => ProjectRoot::Project(dir),
            None => ProjectRoot::Workspace(self.workspace.workspace_root_for(path)?),
        };

        for file in self.metadata_files.metadata_files_for(path, &root) {
            let metadata = self.metadata_parser.parse_metadata_file(&file).await;
            if let Some(setting) = metadata.render_on_save() {
                tracing::debug!(
                    document = %path.display(),
                    file = %file.display(),
                    root = root.kind(),
                    setting,
                    "Using metadata file render-on-save"
                );
                return Some(setting);
            }
        }
        None
    }

    /// The editor-wide default.
    pub fn global_setting(&self) -> bool {
        self.configuration
            .get_bool(SETTINGS_SECTION, RENDER_ON_SAVE_SETTING)
            .unwrap_or(false)
    }
}
