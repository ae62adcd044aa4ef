//! Snippet data model.
//!
//! - Snippet: prefix + body lines + description (persisted shape). Unknown fields
//!   are carried in `extra` and written back unchanged.
//! - Body: body as supplied by a caller (single text or lines); normalized to lines.
//! - Partition: name -> Snippet, insertion-ordered (matches key order in the file).
//! - Snapshot: language -> Partition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One persisted snippet. The name is the key of the owning partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub prefix: String,
    #[serde(default, deserialize_with = "deserialize_body_lines")]
    pub body: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    /// Fields this crate does not interpret (e.g. "scope").
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snippet {
    pub fn new<P, D>(prefix: P, body: Body, description: D) -> Self
    where
        P: Into<String>,
        D: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            body: body.into_lines(),
            description: description.into(),
            extra: Map::new(),
        }
    }

    /// Body joined with '\n' (presentation/insertion form).
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }
}

/// Body as it arrives from a caller: a single string or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    Lines(Vec<String>),
    Text(String),
}

impl Body {
    /// Single text is split at '\n'; lines are kept as is.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Body::Lines(lines) => lines,
            Body::Text(text) => split_lines(&text),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Lines(Vec::new())
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<Vec<String>> for Body {
    fn from(lines: Vec<String>) -> Self {
        Body::Lines(lines)
    }
}

/// Split at '\n' boundaries. "" yields a single empty line, like String.split.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

// Тело в файле бывает массивом строк, одной строкой или null.
fn deserialize_body_lines<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Null => Vec::new(),
        Value::String(text) => split_lines(&text),
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        other => vec![other.to_string()],
    })
}

// null встречается в файлах, записанных без описания; числа приводим к строке.
fn deserialize_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(de).map(value_to_text)
}

fn value_to_text(v: Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Decode one record. Anything that is not a JSON object is not a snippet.
pub fn snippet_from_value(v: Value) -> Option<Snippet> {
    if !v.is_object() {
        return None;
    }
    serde_json::from_value(v).ok()
}

/// Snippets of one language, keyed by name.
pub type Partition = IndexMap<String, Snippet>;

/// Full in-memory view: language -> partition.
pub type Snapshot = BTreeMap<String, Partition>;
