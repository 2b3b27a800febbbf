/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * MemoryRuntime implementation backed by an in-memory file tree.
 *
 * Used for editor overlays (unsaved buffers) and for exercising project
 * discovery without touching disk.
 */

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use crate::traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime};

fn not_found_error(path: &Path) -> RuntimeError {
    RuntimeError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("Path not found: {}", path.display()),
    ))
}

/// In-memory file tree.
///
/// Directories are created implicitly for every file added.
#[derive(Debug)]
struct VirtualFileSystem {
    /// File contents, keyed by normalized absolute path
    files: HashMap<PathBuf, Vec<u8>>,
    /// Directory entries (automatically includes parents of all files)
    directories: BTreeSet<PathBuf>,
    /// Working directory; relative paths resolve against it
    cwd: PathBuf,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        let mut directories = BTreeSet::new();
        directories.insert(PathBuf::from("/"));
        Self {
            files: HashMap::new(),
            directories,
            cwd: PathBuf::from("/"),
        }
    }

    /// Add a file, creating all parent directories.
    pub fn add_file(&mut self, path: &Path, contents: impl Into<Vec<u8>>) {
        let normalized = self.normalize_path(path);
        if let Some(parent) = normalized.parent() {
            self.add_directory_and_parents(parent);
        }
        self.files.insert(normalized, contents.into());
    }

    pub fn read_file(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(&self.normalize_path(path)).map(Vec::as_slice)
    }

    pub fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&self.normalize_path(path))
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        self.directories.contains(&self.normalize_path(path))
    }

    /// Make a path absolute (against the working directory) and normalize it.
    pub fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.has_root() {
            return normalize_components(path);
        }
        normalize_components(&self.cwd.join(path))
    }

    fn add_directory_and_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

/// Normalize path components (remove `.` and resolve `..`).
fn normalize_components(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("/");
                }
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push("/");
    }
    normalized
}

/// Runtime serving files from an in-memory file tree.
///
/// Environment variables are private to the runtime, so tests can set
/// `QUARTO_PROFILE` and friends without touching the process environment.
/// Every successful or failed `file_read` is recorded and can be inspected
/// with [`MemoryRuntime::reads`].
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    vfs: RwLock<VirtualFileSystem>,
    env: RwLock<HashMap<String, String>>,
    reads: RwLock<Vec<PathBuf>>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file insertion.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Builder-style environment variable.
    pub fn with_env(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_env(name, value);
        self
    }

    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut vfs) = self.vfs.write() {
            vfs.add_file(path.as_ref(), contents);
        }
    }

    pub fn set_env(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut env) = self.env.write() {
            env.insert(name.into(), value.into());
        }
    }

    /// Paths passed to `file_read`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.read().map(|r| r.clone()).unwrap_or_default()
    }

    fn poisoned() -> RuntimeError {
        RuntimeError::Io(io::Error::other("memory runtime lock poisoned"))
    }
}

impl SystemRuntime for MemoryRuntime {
    fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let vfs = self.vfs.read().map_err(|_| Self::poisoned())?;
        let normalized = vfs.normalize_path(path);
        if let Ok(mut reads) = self.reads.write() {
            reads.push(normalized.clone());
        }
        vfs.read_file(&normalized)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| not_found_error(&normalized))
    }

    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool> {
        let vfs = self.vfs.read().map_err(|_| Self::poisoned())?;
        Ok(match kind {
            None => vfs.is_file(path) || vfs.is_directory(path),
            Some(PathKind::File) => vfs.is_file(path),
            Some(PathKind::Directory) => vfs.is_directory(path),
        })
    }

    fn env_get(&self, name: &str) -> RuntimeResult<Option<String>> {
        let env = self.env.read().map_err(|_| Self::poisoned())?;
        Ok(env.get(name).cloned())
    }
}
