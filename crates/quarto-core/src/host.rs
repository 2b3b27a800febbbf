/*
 * host.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Editor host capabilities.
 */

//! Editor host capabilities.
//!
//! Some behavior depends on what the editor hosting us can report. Notebook
//! save notifications only exist from VS Code 1.67.0 onward, and only when the
//! host actually exposes the hook. The gate is computed once per session and
//! handed to the render-on-save policy as a plain boolean.

use quarto_util::version_at_least;

/// First host version that delivers save notifications for notebooks.
pub const NOTEBOOK_SAVE_EVENTS_MIN_VERSION: &str = "1.67.0";

/// What the host told us about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostVersionInfo {
    /// Host version string, e.g. `1.85.2`
    pub version: String,
    /// Whether the host exposes a notebook save notification
    pub has_notebook_save_hook: bool,
}

impl HostVersionInfo {
    pub fn new(version: impl Into<String>, has_notebook_save_hook: bool) -> Self {
        Self {
            version: version.into(),
            has_notebook_save_hook,
        }
    }

    /// Whether notebook saves can be observed on this host.
    ///
    /// Requires the hook to be present and the version to be at least
    /// [`NOTEBOOK_SAVE_EVENTS_MIN_VERSION`]. An unparseable version counts as
    /// too old.
    pub fn notebook_save_events_available(&self) -> bool {
        if !self.has_notebook_save_hook {
            return false;
        }
        match version_at_least(&self.version, NOTEBOOK_SAVE_EVENTS_MIN_VERSION) {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!(error = %e, "Could not compare host version; notebook saves unavailable");
                false
            }
        }
    }
}
