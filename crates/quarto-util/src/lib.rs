//! Shared utilities for Quarto

pub mod version;

pub use version::{VersionError, cargo_version, cli_version, version_at_least};
