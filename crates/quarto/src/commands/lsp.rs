//! LSP server command implementation.

use anyhow::{Context, Result};

/// Execute the LSP server.
///
/// Serves JSON-RPC over stdio until the client exits. Logging goes to
/// stderr so it never interleaves with protocol messages.
pub fn execute() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    tracing::info!(version = quarto_util::cli_version(), "Starting Quarto language server");
    runtime.block_on(quarto_lsp::run_server());
    tracing::debug!("Quarto language server stopped");

    Ok(())
}
