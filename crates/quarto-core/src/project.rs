/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Project discovery and metadata file lookup.
 */

//! Project discovery and metadata file lookup.
//!
//! A document's settings can come from the directories above it:
//!
//! - A Quarto project is the nearest ancestor directory with `_quarto.yml`
//!   (or `_quarto.yaml`).
//! - Without a project, the editor workspace folder containing the document
//!   stands in as the root.
//! - Every directory between the document and the root may carry a
//!   `_metadata.yml` that applies to the documents below it.
//!
//! [`metadata_files_for_document`] lists those files in precedence order,
//! highest first, so callers can stop at the first file that answers.

use std::path::{Path, PathBuf};

use quarto_system_runtime::SystemRuntime;
use serde_json::Value;

use crate::error::{QuartoError, Result};
use crate::front_matter::{FrontMatter, parse_front_matter_str, parse_yaml_str};
use crate::render_on_save::WorkspaceResolver;

/// Project configuration file names, in lookup order.
pub const PROJECT_CONFIG_FILES: [&str; 2] = ["_quarto.yml", "_quarto.yaml"];

/// Directory metadata file names, in lookup order.
pub const DIRECTORY_METADATA_FILES: [&str; 2] = ["_metadata.yml", "_metadata.yaml"];

/// Environment variable selecting active project profiles (comma separated).
pub const PROFILE_ENV_VAR: &str = "QUARTO_PROFILE";

/// The directory that scopes a document's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRoot {
    /// A directory containing a project configuration file
    Project(PathBuf),
    /// An editor workspace folder (no project configuration found)
    Workspace(PathBuf),
}

impl ProjectRoot {
    pub fn dir(&self) -> &Path {
        match self {
            ProjectRoot::Project(dir) | ProjectRoot::Workspace(dir) => dir,
        }
    }

    pub fn into_dir(self) -> PathBuf {
        match self {
            ProjectRoot::Project(dir) | ProjectRoot::Workspace(dir) => dir,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProjectRoot::Project(_) => "project",
            ProjectRoot::Workspace(_) => "workspace",
        }
    }
}

/// Parsed project configuration from `_quarto.yml`
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Additional metadata files (relative to the project directory)
    pub metadata_files: Vec<PathBuf>,

    /// Profiles to activate when `QUARTO_PROFILE` is not set
    pub default_profiles: Vec<String>,
}

impl ProjectConfig {
    /// Parse a project configuration file.
    pub fn parse(runtime: &dyn SystemRuntime, path: &Path) -> Result<Self> {
        let content = runtime.file_read_string(path)?;

        let value = parse_yaml_str(&content).map_err(|e| QuartoError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::from_value(value))
    }

    /// Extract the fields we care about from an already parsed value.
    pub fn from_value(value: Value) -> Self {
        let metadata_files = value
            .get("metadata-files")
            .map(string_list)
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let default_profiles = value
            .get("profile")
            .and_then(|p| p.get("default"))
            .map(string_list)
            .unwrap_or_default();

        Self {
            metadata_files,
            default_profiles,
        }
    }
}

/// A string or a list of strings, as YAML options often allow.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

/// The first file from `names` that exists in `dir`.
fn first_existing(runtime: &dyn SystemRuntime, dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| runtime.is_file(path).unwrap_or(false))
}

/// The project configuration file in `dir`, if any.
pub fn project_config_file(runtime: &dyn SystemRuntime, dir: &Path) -> Option<PathBuf> {
    first_existing(runtime, dir, &PROJECT_CONFIG_FILES)
}

/// The directory the upward search starts from: the path itself for a
/// directory, otherwise its parent.
fn search_start(runtime: &dyn SystemRuntime, path: &Path) -> Option<PathBuf> {
    if runtime.is_dir(path).unwrap_or(false) {
        Some(path.to_path_buf())
    } else {
        path.parent().map(Path::to_path_buf)
    }
}

/// Search for the project directory of a document.
///
/// Walks from the document's directory up to the filesystem root and returns
/// the first directory containing a project configuration file.
pub fn project_dir_for_document(runtime: &dyn SystemRuntime, path: &Path) -> Option<PathBuf> {
    let start = search_start(runtime, path)?;
    start
        .ancestors()
        .find(|dir| project_config_file(runtime, dir).is_some())
        .map(Path::to_path_buf)
}

/// Resolve the root that scopes a document: its project, else its workspace folder.
pub fn resolve_project_root(
    runtime: &dyn SystemRuntime,
    path: &Path,
    workspace: &dyn WorkspaceResolver,
) -> Option<ProjectRoot> {
    if let Some(dir) = project_dir_for_document(runtime, path) {
        return Some(ProjectRoot::Project(dir));
    }
    workspace.workspace_root_for(path).map(ProjectRoot::Workspace)
}

/// The directory a preview of this document should be served from.
pub fn preview_dir_for_document(
    runtime: &dyn SystemRuntime,
    path: &Path,
    workspace: &dyn WorkspaceResolver,
) -> Option<PathBuf> {
    resolve_project_root(runtime, path, workspace).map(ProjectRoot::into_dir)
}

/// Profiles that are active for a project.
///
/// `QUARTO_PROFILE` wins when set and non-empty; otherwise the config's
/// `profile.default` applies.
pub fn active_profiles(runtime: &dyn SystemRuntime, config: Option<&ProjectConfig>) -> Vec<String> {
    let from_env = runtime
        .env_get(PROFILE_ENV_VAR)
        .ok()
        .flatten()
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if !from_env.is_empty() {
        return from_env;
    }
    config.map(|c| c.default_profiles.clone()).unwrap_or_default()
}

/// Configuration files that apply at a project root, highest precedence first.
///
/// Later profiles override earlier ones, profiles override `metadata-files`,
/// later `metadata-files` override earlier ones, and all of them override the
/// base `_quarto.yml`.
fn project_root_files(runtime: &dyn SystemRuntime, dir: &Path) -> Vec<PathBuf> {
    let Some(config_file) = project_config_file(runtime, dir) else {
        return Vec::new();
    };

    let config = match ProjectConfig::parse(runtime, &config_file) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(file = %config_file.display(), error = %e, "Could not read project configuration");
            None
        }
    };

    let mut files = Vec::new();

    for profile in active_profiles(runtime, config.as_ref()).iter().rev() {
        let candidates = [
            format!("_quarto-{profile}.yml"),
            format!("_quarto-{profile}.yaml"),
        ];
        let names: Vec<&str> = candidates.iter().map(String::as_str).collect();
        if let Some(file) = first_existing(runtime, dir, &names) {
            files.push(file);
        }
    }

    if let Some(config) = &config {
        for file in config.metadata_files.iter().rev() {
            let path = dir.join(file);
            if runtime.is_file(&path).unwrap_or(false) {
                files.push(path);
            } else {
                tracing::debug!(file = %path.display(), "Listed metadata file does not exist");
            }
        }
    }

    files.push(config_file);
    files
}

/// List the metadata files that apply to a document, highest precedence first.
///
/// Directory `_metadata.yml` files come first, nearest directory first,
/// followed by the root's own files: the project configuration files for a
/// project root, or the root's `_metadata.yml` for a workspace root.
pub fn metadata_files_for_document(
    runtime: &dyn SystemRuntime,
    path: &Path,
    root: &ProjectRoot,
) -> Vec<PathBuf> {
    let root_dir = root.dir();
    let mut files = Vec::new();

    if let Some(start) = search_start(runtime, path) {
        if start.starts_with(root_dir) {
            for dir in start.ancestors().take_while(|dir| *dir != root_dir) {
                if let Some(file) = first_existing(runtime, dir, &DIRECTORY_METADATA_FILES) {
                    files.push(file);
                }
            }
        } else {
            tracing::debug!(
                document = %path.display(),
                root = %root_dir.display(),
                "Document is outside its root; skipping directory metadata"
            );
        }
    }

    match root {
        ProjectRoot::Project(dir) => files.extend(project_root_files(runtime, dir)),
        ProjectRoot::Workspace(dir) => {
            files.extend(first_existing(runtime, dir, &DIRECTORY_METADATA_FILES));
        }
    }

    files
}

/// Read a metadata file into a front matter mapping.
///
/// Missing files and malformed YAML yield an empty mapping.
pub fn yaml_from_metadata_file(runtime: &dyn SystemRuntime, path: &Path) -> FrontMatter {
    match runtime.file_read_string(path) {
        Ok(content) => parse_front_matter_str(&content),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "Could not read metadata file");
            FrontMatter::default()
        }
    }
}

/// Workspace folders reported by the editor.
///
/// Resolves a path to the deepest folder that contains it.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFolders {
    folders: Vec<PathBuf>,
}

impl WorkspaceFolders {
    pub fn new(folders: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            folders: folders.into_iter().collect(),
        }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

impl WorkspaceResolver for WorkspaceFolders {
    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf> {
        self.folders
            .iter()
            .filter(|folder| path.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarto_system_runtime::MemoryRuntime;

    #[test]
    fn test_project_dir_nearest_ancestor() {
        let rt = MemoryRuntime::new()
            .with_file("/site/_quarto.yml", "project:\n  type: website\n")
            .with_file("/site/posts/2024/post.qmd", "")
            .with_file("/site/sub/_quarto.yaml", "")
            .with_file("/site/sub/doc.qmd", "");

        assert_eq!(
            project_dir_for_document(&rt, Path::new("/site/posts/2024/post.qmd")),
            Some(PathBuf::from("/site"))
        );
        assert_eq!(
            project_dir_for_document(&rt, Path::new("/site/sub/doc.qmd")),
            Some(PathBuf::from("/site/sub"))
        );
        assert_eq!(
            project_dir_for_document(&rt, Path::new("/site/posts")),
            Some(PathBuf::from("/site"))
        );
    }

    #[test]
    fn test_project_dir_absent() {
        let rt = MemoryRuntime::new().with_file("/notes/a.qmd", "");
        assert_eq!(project_dir_for_document(&rt, Path::new("/notes/a.qmd")), None);
    }

    #[test]
    fn test_preview_dir_prefers_project_over_workspace() {
        let rt = MemoryRuntime::new()
            .with_file("/ws/book/_quarto.yml", "")
            .with_file("/ws/book/ch1.qmd", "")
            .with_file("/ws/loose.qmd", "");
        let workspace = WorkspaceFolders::new([PathBuf::from("/ws")]);

        assert_eq!(
            preview_dir_for_document(&rt, Path::new("/ws/book/ch1.qmd"), &workspace),
            Some(PathBuf::from("/ws/book"))
        );
        assert_eq!(
            preview_dir_for_document(&rt, Path::new("/ws/loose.qmd"), &workspace),
            Some(PathBuf::from("/ws"))
        );
        assert_eq!(
            preview_dir_for_document(&rt, Path::new("/elsewhere/x.qmd"), &workspace),
            None
        );
        assert_eq!(
            resolve_project_root(&rt, Path::new("/ws/loose.qmd"), &workspace),
            Some(ProjectRoot::Workspace(PathBuf::from("/ws")))
        );
    }

    #[test]
    fn test_workspace_folders_pick_deepest() {
        let workspace = WorkspaceFolders::new([PathBuf::from("/ws"), PathBuf::from("/ws/inner")]);
        assert_eq!(
            workspace.workspace_root_for(Path::new("/ws/inner/doc.qmd")),
            Some(PathBuf::from("/ws/inner"))
        );
        assert_eq!(
            workspace.workspace_root_for(Path::new("/ws/doc.qmd")),
            Some(PathBuf::from("/ws"))
        );
        // component-wise prefix, not string prefix
        assert_eq!(workspace.workspace_root_for(Path::new("/wsx/doc.qmd")), None);
    }

    #[test]
    fn test_metadata_files_nearest_first_then_project_config() {
        let rt = MemoryRuntime::new()
            .with_file("/site/_quarto.yml", "project:\n  type: website\n")
            .with_file("/site/posts/_metadata.yml", "a: 1")
            .with_file("/site/posts/2024/_metadata.yaml", "b: 2")
            .with_file("/site/posts/2024/post.qmd", "");
        let root = ProjectRoot::Project(PathBuf::from("/site"));

        let files = metadata_files_for_document(&rt, Path::new("/site/posts/2024/post.qmd"), &root);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/site/posts/2024/_metadata.yaml"),
                PathBuf::from("/site/posts/_metadata.yml"),
                PathBuf::from("/site/_quarto.yml"),
            ]
        );
    }

    #[test]
    fn test_metadata_files_with_profiles_and_listed_files() {
        let rt = MemoryRuntime::new()
            .with_file(
                "/site/_quarto.yml",
                "metadata-files:\n  - meta/one.yml\n  - meta/two.yml\n  - meta/missing.yml\n",
            )
            .with_file("/site/meta/one.yml", "")
            .with_file("/site/meta/two.yml", "")
            .with_file("/site/_quarto-preview.yml", "")
            .with_file("/site/_quarto-draft.yaml", "")
            .with_file("/site/index.qmd", "")
            .with_env(PROFILE_ENV_VAR, "preview, draft");
        let root = ProjectRoot::Project(PathBuf::from("/site"));

        let files = metadata_files_for_document(&rt, Path::new("/site/index.qmd"), &root);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/site/_quarto-draft.yaml"),
                PathBuf::from("/site/_quarto-preview.yml"),
                PathBuf::from("/site/meta/two.yml"),
                PathBuf::from("/site/meta/one.yml"),
                PathBuf::from("/site/_quarto.yml"),
            ]
        );
    }

    #[test]
    fn test_default_profile_from_config() {
        let rt = MemoryRuntime::new()
            .with_file("/p/_quarto.yml", "profile:\n  default: production\n")
            .with_file("/p/_quarto-production.yml", "");
        let config = ProjectConfig::parse(&rt, Path::new("/p/_quarto.yml")).unwrap();
        assert_eq!(active_profiles(&rt, Some(&config)), vec!["production"]);

        rt.set_env(PROFILE_ENV_VAR, "staging");
        assert_eq!(active_profiles(&rt, Some(&config)), vec!["staging"]);
    }

    #[test]
    fn test_metadata_files_for_workspace_root() {
        let rt = MemoryRuntime::new()
            .with_file("/ws/_metadata.yml", "")
            .with_file("/ws/notes/_metadata.yml", "")
            .with_file("/ws/notes/today.qmd", "");
        let root = ProjectRoot::Workspace(PathBuf::from("/ws"));

        let files = metadata_files_for_document(&rt, Path::new("/ws/notes/today.qmd"), &root);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/ws/notes/_metadata.yml"),
                PathBuf::from("/ws/_metadata.yml"),
            ]
        );
    }

    #[test]
    fn test_malformed_project_config_still_listed() {
        let rt = MemoryRuntime::new()
            .with_file("/p/_quarto.yml", "project: [oops\n")
            .with_file("/p/doc.qmd", "");
        let root = ProjectRoot::Project(PathBuf::from("/p"));

        let files = metadata_files_for_document(&rt, Path::new("/p/doc.qmd"), &root);
        assert_eq!(files, vec![PathBuf::from("/p/_quarto.yml")]);
        assert!(yaml_from_metadata_file(&rt, &files[0]).is_empty());
    }

    #[test]
    fn test_yaml_from_metadata_file() {
        let rt = MemoryRuntime::new()
            .with_file("/p/_metadata.yml", "editor:\n  render-on-save: true\n");
        let fm = yaml_from_metadata_file(&rt, Path::new("/p/_metadata.yml"));
        assert_eq!(fm.render_on_save(), Some(true));
        assert!(yaml_from_metadata_file(&rt, Path::new("/p/missing.yml")).is_empty());
    }

    #[test]
    fn test_project_config_with_tags() {
        let rt = MemoryRuntime::new().with_file(
            "/p/_quarto.yml",
            "execute:\n  freeze: !expr auto\nmetadata-files: shared.yml\nprofile:\n  default: [a, b]\n",
        );
        let config = ProjectConfig::parse(&rt, Path::new("/p/_quarto.yml")).unwrap();
        assert_eq!(config.metadata_files, vec![PathBuf::from("shared.yml")]);
        assert_eq!(config.default_profiles, vec!["a", "b"]);
    }

    #[test]
    fn test_tagged_metadata_file_keeps_setting() {
        let rt = MemoryRuntime::new().with_file(
            "/p/_metadata.yml",
            "params:\n  alpha: !expr 0.1\neditor:\n  render-on-save: false\n",
        );
        let fm = yaml_from_metadata_file(&rt, Path::new("/p/_metadata.yml"));
        assert_eq!(fm.render_on_save(), Some(false));
    }

    #[test]
    fn test_project_config_reports_bad_yaml() {
        let rt = MemoryRuntime::new().with_file("/p/_quarto.yml", "a: [\n");
        let err = ProjectConfig::parse(&rt, Path::new("/p/_quarto.yml")).unwrap_err();
        assert!(matches!(err, QuartoError::Yaml { .. }));
    }
}
