/*
 * render_on_save.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render-on-save command implementation
 */

//! Render-on-save command implementation.
//!
//! This module implements `quarto render-on-save`, which evaluates the same
//! policy the language server applies on `textDocument/didSave` and prints
//! `true` or `false`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use quarto_core::{
    DocumentFrontMatter, EditorDocument, HostVersionInfo, ProjectLookup, RenderOnSavePolicy,
    SettingsConfiguration, WorkspaceFolders,
};
use quarto_system_runtime::{NativeRuntime, SystemRuntime};

use super::{absolute_path, absolute_paths};

/// Arguments for the render-on-save command
#[derive(Debug)]
pub struct RenderOnSaveArgs {
    pub file: PathBuf,
    pub workspaces: Vec<PathBuf>,
    pub settings: Option<PathBuf>,
    pub host_version: Option<String>,
    pub notebook_save_events: bool,
}

/// Execute the render-on-save command
pub fn execute(args: RenderOnSaveArgs) -> Result<()> {
    let runtime = NativeRuntime::new();
    let render = evaluate(&runtime, &args)?;
    println!("{}", render);
    Ok(())
}

/// Evaluate the render-on-save policy for the command's arguments.
pub fn evaluate(runtime: &dyn SystemRuntime, args: &RenderOnSaveArgs) -> Result<bool> {
    let path = absolute_path(&args.file)?;
    let document = EditorDocument::load(runtime, path.clone())
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let workspace = WorkspaceFolders::new(absolute_paths(&args.workspaces)?);
    let settings = match &args.settings {
        Some(file) => SettingsConfiguration::from_file(runtime, &absolute_path(file)?)
            .context("Failed to load editor settings")?,
        None => SettingsConfiguration::default(),
    };

    let host = HostVersionInfo::new(
        args.host_version.clone().unwrap_or_default(),
        args.notebook_save_events,
    );
    let notebook_save_events_available = host.notebook_save_events_available();
    debug!(
        document = %path.display(),
        host_version = %host.version,
        notebook_save_events_available,
        "Evaluating render-on-save"
    );

    let lookup = ProjectLookup::new(runtime);
    let policy = RenderOnSavePolicy::new(&DocumentFrontMatter, &lookup, &workspace, &settings);
    Ok(pollster::block_on(
        policy.should_render_on_save(&document, notebook_save_events_available),
    ))
}
