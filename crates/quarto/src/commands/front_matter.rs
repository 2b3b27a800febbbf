/*
 * front_matter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Front matter command implementation
 */

//! Front matter command implementation.
//!
//! Prints the parsed front matter as JSON, or with `--shiny` whether the
//! document declares a Shiny server.

use std::path::Path;

use anyhow::{Context, Result};

use quarto_core::{EditorDocument, document_front_matter, is_shiny_document};
use quarto_system_runtime::NativeRuntime;

use super::absolute_path;

/// Execute the front-matter command
pub fn execute(file: &Path, shiny: bool) -> Result<()> {
    let runtime = NativeRuntime::new();
    let path = absolute_path(file)?;
    let document = EditorDocument::load(&runtime, path)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let front_matter = document_front_matter(document.content());
    if shiny {
        println!("{}", is_shiny_document(&front_matter));
        return Ok(());
    }
    if front_matter.is_empty() {
        tracing::debug!(document = %file.display(), "No front matter found");
    }
    println!("{}", serde_json::to_string_pretty(&front_matter)?);
    Ok(())
}
