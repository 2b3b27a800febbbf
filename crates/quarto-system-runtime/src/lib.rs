/*
 * quarto-system-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Runtime abstraction layer for Quarto system operations.
 *
 * This crate provides a trait-based abstraction for the filesystem and
 * environment access that project discovery needs, allowing the same lookup
 * code to run in different environments:
 *
 * - NativeRuntime: Full system access using std (default)
 * - MemoryRuntime: In-memory file tree with a private environment
 */

mod memory;
mod native;
mod traits;

// Re-export core types (API surface)
pub use traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime};

// Re-export runtime implementations
pub use memory::MemoryRuntime;
pub use native::NativeRuntime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtimes_are_object_safe() {
        let runtimes: Vec<Box<dyn SystemRuntime>> = vec![
            Box::new(NativeRuntime::new()),
            Box::new(MemoryRuntime::new().with_file("/doc.qmd", "---\n---\n")),
        ];
        assert!(!runtimes[0].is_file(std::path::Path::new("/doc.qmd")).unwrap());
        assert!(runtimes[1].is_file(std::path::Path::new("/doc.qmd")).unwrap());
    }
}
