//! Quarto Language Server Protocol implementation.
//!
//! This crate provides the LSP server for Quarto editor integration,
//! wrapping `quarto-core` with the tower-lsp framework.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         quarto-lsp                            │
//! │   tower-lsp wrapper, JSON-RPC/stdio, `quarto lsp` command     │
//! │                                                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────────────────┐  │
//! │  │  server.rs  │  │ session.rs  │  │     protocol.rs       │  │
//! │  │LanguageServer│ │client state │  │ quarto/* extensions   │  │
//! │  └──────┬──────┘  └──────┬──────┘  └───────────────────────┘  │
//! │         │                │                                    │
//! │         └────────────────┴──────────────────┐                 │
//! │                                             │                 │
//! │  ┌──────────────────────────────────────────▼──────────────┐  │
//! │  │                      quarto-core                        │  │
//! │  │   (render-on-save policy, project and metadata lookup)  │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The LSP server is invoked via the `quarto lsp` subcommand:
//!
//! ```bash
//! quarto lsp
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! quarto_lsp::run_server().await;
//! ```

pub mod capabilities;
pub mod convert;
pub mod protocol;
pub mod server;
pub mod session;

pub use protocol::{PreviewDirParams, RenderOnSave, RenderOnSaveParams};
pub use server::{QuartoLanguageServer, build_service, run_server};
pub use session::Session;
