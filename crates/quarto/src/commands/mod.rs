//! Command implementations for Quarto CLI
//!
//! Each command module handles the CLI interface and delegates to
//! quarto-core for actual implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod front_matter;
pub mod lsp;
pub mod preview_dir;
pub mod render_on_save;

/// Make a command line path absolute without resolving symlinks.
///
/// Project and workspace lookups compare path prefixes, so every path that
/// takes part in them has to be absolute in the same way.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

pub(crate) fn absolute_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|p| absolute_path(p)).collect()
}
