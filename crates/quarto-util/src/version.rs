//! Version handling for Quarto
//!
//! This module implements the versioning strategy where:
//! - Cargo.toml version: 0.x.y (idiomatic Rust, signals instability)
//! - CLI reported version: 99.9.9-dev (for extension compatibility)
//!
//! When the crate version is 2.x.y or higher, the CLI will report the actual version.
//!
//! It also hosts the semantic-version comparison used to gate editor host
//! features on the host's reported version.

use semver::Version;
use thiserror::Error;

/// Development version used for compatibility with extensions
const DEV_VERSION: &str = "99.9.9-dev";

/// A version string that could not be interpreted as semver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version '{version}': {reason}")]
pub struct VersionError {
    pub version: String,
    pub reason: String,
}

/// Get the version string that should be reported by the CLI
///
/// During development (version 0.x.y), this returns "99.9.9-dev" to ensure
/// compatibility with all existing Quarto extensions while clearly indicating
/// this is a development build.
///
/// Once released as 2.0.0+, this will return the actual version.
pub fn cli_version() -> &'static str {
    let cargo_version = env!("CARGO_PKG_VERSION");

    if cargo_version.starts_with("0.") {
        DEV_VERSION
    } else {
        cargo_version
    }
}

/// Get the Cargo package version (for internal use)
pub fn cargo_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Check whether `version` is greater than or equal to `minimum`.
///
/// Both strings are parsed as semver after trimming surrounding whitespace.
/// Pre-release versions sort before their release (`1.67.0-insider < 1.67.0`).
pub fn version_at_least(version: &str, minimum: &str) -> Result<bool, VersionError> {
    let parse = |v: &str| {
        Version::parse(v.trim()).map_err(|e| VersionError {
            version: v.to_string(),
            reason: e.to_string(),
        })
    };
    Ok(parse(version)? >= parse(minimum)?)
}
