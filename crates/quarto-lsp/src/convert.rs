//! Conversion between tower_lsp::lsp_types and quarto-core types.

use std::path::PathBuf;

use tower_lsp::lsp_types::{InitializeParams, Url, WorkspaceFolder};

/// Convert a `file://` URI to a filesystem path.
pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    if uri.scheme() != "file" {
        return None;
    }
    uri.to_file_path().ok()
}

/// Convert editor workspace folders to filesystem paths, dropping non-file URIs.
pub fn workspace_folder_paths(folders: &[WorkspaceFolder]) -> Vec<PathBuf> {
    folders
        .iter()
        .filter_map(|folder| uri_to_path(&folder.uri))
        .collect()
}

/// Workspace folders from initialize params, falling back to the root URI.
#[allow(deprecated)]
pub fn initial_workspace_folders(params: &InitializeParams) -> Vec<PathBuf> {
    match &params.workspace_folders {
        Some(folders) if !folders.is_empty() => workspace_folder_paths(folders),
        _ => params
            .root_uri
            .as_ref()
            .and_then(uri_to_path)
            .into_iter()
            .collect(),
    }
}
