//! # Charm Descriptor
//!
//! The charm's `metadata.yaml`, parsed once at the start of an audit and
//! immutable afterwards.
//!
//! The YAML tree is converted into a `serde_json::Value` tree so rules
//! work against one uniform value model. Mapping keys that are not
//! strings (numbers, booleans, null) are rendered to their textual form;
//! YAML tags are stripped.
//!
//! Charm descriptors are written against YAML 1.1, where `yes`, `no`,
//! `on` and `off` are booleans. The YAML 1.2 parser hands those back as
//! strings, so scalar values spelled as a 1.1 boolean are converted to
//! [`Value::Bool`]. The parser does not expose scalar style, so a quoted
//! `"yes"` converts as well. Mapping keys are left alone.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ProofError, ProofResult};
use crate::source::CharmSource;

/// File name of the descriptor at the charm root.
pub const DESCRIPTOR_FILE: &str = "metadata.yaml";

/// Parsed top-level mapping of a charm descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CharmDescriptor {
    fields: Map<String, Value>,
}

impl CharmDescriptor {
    /// Read and parse the descriptor of `source`.
    ///
    /// # Errors
    ///
    /// - [`ProofError::DescriptorNotFound`] if the file does not exist.
    /// - [`ProofError::DescriptorParse`] / [`ProofError::DescriptorShape`]
    ///   if it is not a YAML mapping.
    /// - [`ProofError::Io`] for any other read failure.
    pub fn load(source: &dyn CharmSource) -> ProofResult<Self> {
        let rel = Path::new(DESCRIPTOR_FILE);
        let path = source.path_of(rel);
        let text = source.read_text(rel).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProofError::DescriptorNotFound { path: path.clone() }
            } else {
                ProofError::Io(e)
            }
        })?;
        Self::parse(&text, &path)
    }

    /// Parse descriptor text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> ProofResult<Self> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ProofError::DescriptorParse {
                path: origin.to_path_buf(),
                source: e,
            })?;
        match yaml_to_value(yaml) {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ProofError::DescriptorShape {
                path: origin.to_path_buf(),
                detail: format!("top level is {}, not a mapping", kind_of(&other)),
            }),
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether a top-level field is present (even if null).
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// A top-level field, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Short description of a value's kind, for messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Render a scalar the way it would read in the descriptor.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn yaml_to_value(yaml: serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => match yaml11_bool(&s) {
            Some(b) => Value::Bool(b),
            None => Value::String(s),
        },
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut obj = Map::new();
            for (k, v) in map {
                obj.insert(yaml_key(k), yaml_to_value(v));
            }
            Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

/// Boolean spellings of the YAML 1.1 core schema.
fn yaml11_bool(s: &str) -> Option<bool> {
    match s {
        "yes" | "Yes" | "YES" | "on" | "On" | "ON" | "true" | "True" | "TRUE" => Some(true),
        "no" | "No" | "NO" | "off" | "Off" | "OFF" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => display_value(&yaml_to_value(other)),
    }
}
