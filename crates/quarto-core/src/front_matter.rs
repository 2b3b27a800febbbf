/*
 * front_matter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document front matter extraction and lookup.
 */

//! Document front matter.
//!
//! Front matter is the YAML block at the top of a document:
//!
//! ```text
//! ---
//! title: "Report"
//! editor:
//!   render-on-save: true
//! ---
//! ```
//!
//! Parsing never fails. A missing block, malformed YAML, or YAML whose top
//! level is not a mapping all produce an empty [`FrontMatter`]. Metadata
//! files (`_quarto.yml`, `_metadata.yml`) share the same shape and go through
//! [`parse_front_matter_str`] as well.

use serde::Serialize;
use serde_json::{Map, Value};

/// Key of the editor options object.
pub const EDITOR_KEY: &str = "editor";

/// Key of the render-on-save flag inside the editor options.
pub const RENDER_ON_SAVE_KEY: &str = "render-on-save";

/// A parsed metadata mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(Map<String, Value>);

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `editor.render-on-save` flag, if present and boolean.
    ///
    /// A non-object `editor` value or a non-boolean flag are both treated as
    /// absent.
    pub fn render_on_save(&self) -> Option<bool> {
        self.get(EDITOR_KEY)?
            .as_object()?
            .get(RENDER_ON_SAVE_KEY)?
            .as_bool()
    }

    /// The `server` type, either `server: shiny` or `server: { type: shiny }`.
    pub fn server_type(&self) -> Option<&str> {
        match self.get("server")? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj.get("type")?.as_str(),
            _ => None,
        }
    }
}

impl From<Value> for FrontMatter {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => FrontMatter(map),
            _ => FrontMatter::default(),
        }
    }
}

impl From<Map<String, Value>> for FrontMatter {
    fn from(map: Map<String, Value>) -> Self {
        FrontMatter(map)
    }
}

/// Locate the YAML front matter block of a document.
///
/// The block must open with a `---` line (only blank lines may precede it)
/// that is not immediately followed by a blank line, and closes at the next
/// `---` or `...` line. Returns the text between the delimiters.
pub fn extract_front_matter(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let mut offset = 0;
    let opening = loop {
        let line = lines.next()?;
        if line.trim().is_empty() {
            offset += line.len();
            continue;
        }
        break line;
    };
    if opening.trim_end() != "---" {
        return None;
    }

    let start = offset + opening.len();
    let mut end = start;
    for (index, line) in lines.enumerate() {
        let trimmed = line.trim_end();
        if index == 0 && trimmed.is_empty() {
            // `---` followed by a blank line is a horizontal rule
            return None;
        }
        if trimmed == "---" || trimmed == "..." {
            return Some(&content[start..end]);
        }
        end += line.len();
    }
    None
}

/// Parse YAML text into a JSON value.
///
/// Quarto metadata routinely carries YAML tags (`!expr`, `!ruby/regexp`).
/// A tag only changes how a value is interpreted later, so the tagged value
/// is kept as if it were untagged.
pub fn parse_yaml_str(yaml: &str) -> std::result::Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<serde_yaml::Value>(yaml).map(yaml_to_json)
}

/// Convert a YAML tree to JSON, dropping tags.
///
/// Scalar mapping keys are stringified. Sequence or mapping keys have no
/// JSON counterpart and their entries are skipped.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                let Some(key) = mapping_key(key) else {
                    tracing::debug!("Skipping YAML entry with a non-scalar key");
                    continue;
                };
                map.insert(key, yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn mapping_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Some(s),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Null => Some("null".to_string()),
        Yaml::Tagged(tagged) => mapping_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => None,
    }
}

/// Parse a YAML string into a front matter mapping.
pub fn parse_front_matter_str(yaml: &str) -> FrontMatter {
    match parse_yaml_str(yaml) {
        Ok(value) => FrontMatter::from(value),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed front matter");
            FrontMatter::default()
        }
    }
}

/// Parse the front matter of a document's text.
pub fn document_front_matter(content: &str) -> FrontMatter {
    extract_front_matter(content)
        .map(parse_front_matter_str)
        .unwrap_or_default()
}

/// Whether the front matter declares a Shiny server document.
pub fn is_shiny_document(front_matter: &FrontMatter) -> bool {
    front_matter.server_type() == Some("shiny")
}
