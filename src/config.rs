//! Site configuration: loading `config.json` and cloning it per page.
//!
//! ## Config File
//!
//! The source directory holds a single `config.json` whose top level is an
//! object. Every value must have one of three shapes:
//!
//! ```json
//! {
//!   "title": "My Site",
//!   "links": { "home": "/", "about": "/about.html" },
//!   "tags": ["rust", "notes"]
//! }
//! ```
//!
//! ## Two Lifecycles
//!
//! - [`BaseStore`]: the document as loaded. Built once per run, never mutated,
//!   borrowed by every page.
//! - [`PageStore`]: a typed deep copy made by [`clone_store`] for one page.
//!   Directives write into it, the page processor adds `name` and `content`,
//!   and it is dropped once the page is rendered.
//!
//! Loading only checks that the document is an object. Value shapes are
//! enforced by [`clone_store`], which is the one place a bad value turns into
//! [`ConfigError::TypeMismatch`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::naming::CONFIG_FILE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config.json: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error in config.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config.json must contain a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),
    #[error("config key '{key}' has unsupported value ({found}); expected string, object of strings, or array of strings")]
    TypeMismatch { key: String, found: String },
}

/// A configuration value after normalization.
///
/// Serialized untagged, so templates see a plain string, object, or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Scalar(String),
    StringMap(BTreeMap<String, String>),
    StringList(Vec<String>),
}

impl ConfigValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Scalar(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Scalar(s)
    }
}

/// The configuration document exactly as loaded.
#[derive(Debug, Clone, Default)]
pub struct BaseStore {
    values: serde_json::Map<String, Value>,
}

impl BaseStore {
    /// Parse a JSON document. The top level must be an object.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str(text)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ConfigError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-page working copy of the configuration.
pub type PageStore = BTreeMap<String, ConfigValue>;

/// Load `config.json` from the source directory.
pub fn load_config(dir: &Path) -> Result<BaseStore, ConfigError> {
    let text = fs::read_to_string(dir.join(CONFIG_FILE))?;
    BaseStore::from_json(&text)
}

/// Deep-copy a base store into a typed page store.
///
/// Fails on the first value that is not a string, an object of strings, or an
/// array of strings. Nothing is returned on failure.
pub fn clone_store(base: &BaseStore) -> Result<PageStore, ConfigError> {
    base.values
        .iter()
        .map(|(key, value)| Ok((key.clone(), normalize(key, value)?)))
        .collect()
}

fn normalize(key: &str, value: &Value) -> Result<ConfigValue, ConfigError> {
    let mismatch = |found: String| ConfigError::TypeMismatch {
        key: key.to_string(),
        found,
    };

    match value {
        Value::String(s) => Ok(ConfigValue::Scalar(s.clone())),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Err(mismatch(format!(
                    "object entry '{k}' is {}",
                    json_kind(other)
                ))),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(ConfigValue::StringMap),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(mismatch(format!("array element {i} is {}", json_kind(other)))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ConfigValue::StringList),
        other => Err(mismatch(json_kind(other).to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
