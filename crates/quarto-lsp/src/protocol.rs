//! Quarto-specific LSP extensions.
//!
//! - `quarto/renderOnSave` (server → client notification): a saved document
//!   should be rendered. Shiny documents are flagged so the client can serve
//!   them instead of running a static render.
//! - `quarto/previewDir` (client → server request): the directory a preview
//!   of a document should be served from.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::Url;
use tower_lsp::lsp_types::notification::Notification;

/// Sent after `textDocument/didSave` when the document should be rendered.
#[derive(Debug)]
pub enum RenderOnSave {}

impl Notification for RenderOnSave {
    type Params = RenderOnSaveParams;
    const METHOD: &'static str = "quarto/renderOnSave";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOnSaveParams {
    /// The saved document
    pub uri: Url,
    /// Project or workspace directory to preview from, if any
    pub preview_dir: Option<String>,
    /// The document declares `server: shiny`
    pub is_shiny: bool,
}

pub const PREVIEW_DIR_METHOD: &str = "quarto/previewDir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDirParams {
    pub uri: Url,
}
