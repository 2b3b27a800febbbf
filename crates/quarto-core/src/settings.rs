/*
 * settings.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Editor settings lookup.
 */

//! Editor settings lookup.
//!
//! Editors send their settings as JSON in several shapes. All of these
//! resolve `quarto` / `render.renderOnSave` to `true`:
//!
//! ```json
//! { "quarto": { "render": { "renderOnSave": true } } }
//! { "quarto": { "render.renderOnSave": true } }
//! { "quarto.render.renderOnSave": true }
//! ```

use std::path::Path;

use quarto_system_runtime::SystemRuntime;
use serde_json::Value;

use crate::error::{QuartoError, Result};
use crate::render_on_save::HostConfiguration;

/// Host configuration backed by a JSON settings object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsConfiguration {
    settings: Value,
}

impl SettingsConfiguration {
    pub fn new(settings: Value) -> Self {
        Self { settings }
    }

    /// Load settings from a JSON file.
    pub fn from_file(runtime: &dyn SystemRuntime, path: &Path) -> Result<Self> {
        let content = runtime.file_read_string(path)?;
        let settings: Value = serde_json::from_str(&content).map_err(|e| {
            QuartoError::Settings(format!("{}: {}", path.display(), e))
        })?;
        if !settings.is_object() {
            return Err(QuartoError::Settings(format!(
                "{}: expected a JSON object",
                path.display()
            )));
        }
        Ok(Self::new(settings))
    }

    /// Look up a setting value in any of the supported shapes.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.candidates(section, key).into_iter().next()
    }

    /// Values stored for a setting, in shape order: nested, dotted key
    /// inside the section, fully flat key.
    fn candidates(&self, section: &str, key: &str) -> Vec<&Value> {
        let mut found = Vec::new();
        if let Some(section_value) = self.settings.get(section) {
            found.extend(
                key.split('.')
                    .try_fold(section_value, |value, segment| value.get(segment)),
            );
            found.extend(section_value.get(key));
        }
        found.extend(self.settings.get(format!("{section}.{key}")));
        found
    }
}

impl HostConfiguration for SettingsConfiguration {
    /// The first boolean among the supported shapes; other values are skipped.
    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.candidates(section, key)
            .into_iter()
            .find_map(Value::as_bool)
    }
}
