//! LSP server implementation using tower-lsp.

use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use quarto_core::{DocumentStore, EditorDocument};
use quarto_system_runtime::{NativeRuntime, SystemRuntime};

use crate::capabilities::server_capabilities;
use crate::convert::{uri_to_path, workspace_folder_paths};
use crate::protocol::{PREVIEW_DIR_METHOD, PreviewDirParams, RenderOnSave};
use crate::session::Session;

/// The Quarto language server.
pub struct QuartoLanguageServer {
    /// The LSP client for sending notifications.
    client: Client,
    /// Filesystem access for project discovery.
    runtime: Arc<dyn SystemRuntime>,
    /// Open documents.
    documents: Arc<RwLock<DocumentStore>>,
    /// What we know about the client.
    session: Arc<RwLock<Session>>,
}

impl QuartoLanguageServer {
    /// Create a new language server instance on the native filesystem.
    pub fn new(client: Client) -> Self {
        Self::with_runtime(client, Arc::new(NativeRuntime::new()))
    }

    pub fn with_runtime(client: Client, runtime: Arc<dyn SystemRuntime>) -> Self {
        Self {
            client,
            runtime,
            documents: Arc::new(RwLock::new(DocumentStore::new())),
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// The document as saved: the text sent with the save, the open buffer,
    /// or the file on disk.
    async fn saved_document(&self, uri: &Url, text: Option<String>) -> Option<EditorDocument> {
        let path = uri_to_path(uri)?;
        if let Some(text) = text {
            return Some(EditorDocument::new(path, text));
        }
        if let Some(doc) = self.documents.read().await.get(uri.as_str()) {
            return Some(doc.clone());
        }
        match EditorDocument::load(self.runtime.as_ref(), path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "Could not read saved document");
                None
            }
        }
    }

    /// Handle `quarto/previewDir`.
    pub async fn preview_dir(&self, params: PreviewDirParams) -> Result<Option<String>> {
        let Some(path) = uri_to_path(&params.uri) else {
            return Ok(None);
        };
        let session = self.session.read().await.clone();
        Ok(session
            .preview_dir(self.runtime.as_ref(), &path)
            .map(|dir| dir.display().to_string()))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for QuartoLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        *self.session.write().await = Session::from_initialize(&params);

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "quarto-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Quarto LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.session.write().await.update_settings(params.settings);
        tracing::debug!("Settings updated");
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let added = workspace_folder_paths(&params.event.added);
        let removed = workspace_folder_paths(&params.event.removed);
        self.session
            .write()
            .await
            .update_workspace_folders(added, &removed);
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(path) = uri_to_path(&uri) else {
            return;
        };
        let document =
            EditorDocument::with_version(path, params.text_document.text, params.text_document.version);

        let mut documents = self.documents.write().await;
        documents.open(uri.as_str(), document);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // We're using full document sync, so take the last change
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut documents = self.documents.write().await;
            documents.change(uri.as_str(), change.text, version);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut documents = self.documents.write().await;
        documents.close(params.text_document.uri.as_str());
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(document) = self.saved_document(&uri, params.text).await else {
            return;
        };

        let session = self.session.read().await.clone();
        if let Some(params) = session
            .render_notification(self.runtime.as_ref(), uri, &document)
            .await
        {
            self.client.send_notification::<RenderOnSave>(params).await;
        }
    }
}

/// Build the service with Quarto's custom methods registered.
pub fn build_service() -> (LspService<QuartoLanguageServer>, tower_lsp::ClientSocket) {
    LspService::build(QuartoLanguageServer::new)
        .custom_method(PREVIEW_DIR_METHOD, QuartoLanguageServer::preview_dir)
        .finish()
}

/// Run the LSP server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service();
    Server::new(stdin, stdout, socket).serve(service).await;
}
