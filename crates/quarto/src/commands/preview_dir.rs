/*
 * preview_dir.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Preview directory command implementation
 */

//! Prints the directory a document is previewed from: its project, or the
//! workspace folder that contains it.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use quarto_core::{WorkspaceFolders, preview_dir_for_document};
use quarto_system_runtime::{NativeRuntime, SystemRuntime};

use super::{absolute_path, absolute_paths};

/// Execute the preview-dir command
pub fn execute(file: &Path, workspaces: &[PathBuf]) -> Result<()> {
    let runtime = NativeRuntime::new();
    match resolve(&runtime, file, workspaces)? {
        Some(dir) => {
            println!("{}", dir.display());
            Ok(())
        }
        None => bail!("{} is not inside a project or workspace folder", file.display()),
    }
}

pub fn resolve(
    runtime: &dyn SystemRuntime,
    file: &Path,
    workspaces: &[PathBuf],
) -> Result<Option<PathBuf>> {
    let path = absolute_path(file)?;
    let workspace = WorkspaceFolders::new(absolute_paths(workspaces)?);
    Ok(preview_dir_for_document(runtime, &path, &workspace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarto_system_runtime::MemoryRuntime;

    #[test]
    fn test_project_wins_over_workspace() {
        let rt = MemoryRuntime::new().with_file("/ws/site/_quarto.yml", "");
        let dir = resolve(
            &rt,
            Path::new("/ws/site/posts/a.qmd"),
            &[PathBuf::from("/ws")],
        )
        .unwrap();
        assert_eq!(dir, Some(PathBuf::from("/ws/site")));
    }

    #[test]
    fn test_outside_everything() {
        let rt = MemoryRuntime::new();
        let dir = resolve(&rt, Path::new("/tmp/a.qmd"), &[PathBuf::from("/ws")]).unwrap();
        assert_eq!(dir, None);
    }
}
