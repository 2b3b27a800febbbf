//! Per-connection editor session state.
//!
//! Everything the server learns about its client lives here: workspace
//! folders, the host version and notebook save capability, and the latest
//! settings snapshot. The server clones a snapshot before evaluating a save,
//! so decisions never hold locks across I/O.

use std::path::{Path, PathBuf};

use quarto_core::{
    DocumentFrontMatter, EditorDocument, HostVersionInfo, ProjectLookup, RenderOnSavePolicy,
    SettingsConfiguration, WorkspaceFolders, document_front_matter, is_shiny_document,
    preview_dir_for_document,
};
use quarto_system_runtime::SystemRuntime;
use serde::Deserialize;
use serde_json::Value;
use tower_lsp::lsp_types::{InitializeParams, Url};

use crate::convert::initial_workspace_folders;
use crate::protocol::RenderOnSaveParams;

/// `initializationOptions` understood by the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializationOptions {
    /// Host editor version (overrides `clientInfo.version`)
    pub host_version: Option<String>,
    /// Whether the host exposes notebook save notifications
    pub notebook_save_events: Option<bool>,
    /// Initial editor settings
    pub settings: Option<Value>,
}

impl InitializationOptions {
    pub fn from_params(params: &InitializeParams) -> Self {
        let Some(value) = params.initialization_options.clone() else {
            return Self::default();
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring malformed initializationOptions");
            Self::default()
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub workspace: WorkspaceFolders,
    pub host: HostVersionInfo,
    /// Computed once from `host` at initialization
    pub notebook_save_events_available: bool,
    pub settings: SettingsConfiguration,
}

impl Session {
    pub fn from_initialize(params: &InitializeParams) -> Self {
        let options = InitializationOptions::from_params(params);

        let version = options
            .host_version
            .or_else(|| params.client_info.as_ref().and_then(|c| c.version.clone()))
            .unwrap_or_default();
        let host = HostVersionInfo::new(version, options.notebook_save_events.unwrap_or(false));
        let notebook_save_events_available = host.notebook_save_events_available();

        let session = Self {
            workspace: WorkspaceFolders::new(initial_workspace_folders(params)),
            host,
            notebook_save_events_available,
            settings: options
                .settings
                .map(SettingsConfiguration::new)
                .unwrap_or_default(),
        };

        tracing::info!(
            host_version = %session.host.version,
            notebook_save_events = session.notebook_save_events_available,
            workspace_folders = session.workspace.folders().len(),
            "Session initialized"
        );
        session
    }

    /// Apply a workspace folder change.
    pub fn update_workspace_folders(&mut self, added: Vec<PathBuf>, removed: &[PathBuf]) {
        let mut folders: Vec<PathBuf> = self
            .workspace
            .folders()
            .iter()
            .filter(|f| !removed.contains(f))
            .cloned()
            .collect();
        for folder in added {
            if !folders.contains(&folder) {
                folders.push(folder);
            }
        }
        self.workspace = WorkspaceFolders::new(folders);
    }

    /// Replace the settings snapshot.
    pub fn update_settings(&mut self, settings: Value) {
        self.settings = SettingsConfiguration::new(settings);
    }

    /// Whether a saved document should be rendered.
    pub async fn render_on_save(
        &self,
        runtime: &dyn SystemRuntime,
        document: &EditorDocument,
    ) -> bool {
        let lookup = ProjectLookup::new(runtime);
        let policy =
            RenderOnSavePolicy::new(&DocumentFrontMatter, &lookup, &self.workspace, &self.settings);
        policy
            .should_render_on_save(document, self.notebook_save_events_available)
            .await
    }

    pub fn preview_dir(&self, runtime: &dyn SystemRuntime, path: &Path) -> Option<PathBuf> {
        preview_dir_for_document(runtime, path, &self.workspace)
    }

    /// The `quarto/renderOnSave` notification for a saved document, or
    /// `None` when the save should not trigger a render.
    pub async fn render_notification(
        &self,
        runtime: &dyn SystemRuntime,
        uri: Url,
        document: &EditorDocument,
    ) -> Option<RenderOnSaveParams> {
        let render = self.render_on_save(runtime, document).await;
        tracing::debug!(uri = %uri, render, "Evaluated render-on-save");
        if !render {
            return None;
        }

        let preview_dir = self
            .preview_dir(runtime, document.path())
            .map(|dir| dir.display().to_string());
        let is_shiny = !document.is_notebook()
            && is_shiny_document(&document_front_matter(document.content()));
        Some(RenderOnSaveParams {
            uri,
            preview_dir,
            is_shiny,
        })
    }
}
