//! # Values and Template Rendering
//!
//! Skeleton files carrying the template suffix are rendered instead of
//! copied verbatim. Rendering is plain variable substitution over a single
//! merged namespace: the skeleton's declared values, layered under any
//! user-supplied overrides, plus the reserved `project` identifiers.
//!
//! This module owns the [`Values`] document type and the one central
//! deep-merge rule ([`merge_values`]) used everywhere values are combined:
//! later wins, nested mappings merge key-by-key, everything else is
//! replaced wholesale. Keeping the rule in one place keeps it centrally
//! testable.
//!
//! Rendering runs handlebars in strict mode with HTML escaping disabled,
//! so an unresolved variable fails the materialization instead of silently
//! producing an empty string.

use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Arbitrarily nested key/value document declared by skeletons and user
/// configuration.
pub type Values = Mapping;

/// Reserved template identifiers describing the project being created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub host: String,
    pub owner: String,
}

impl ProjectInfo {
    /// URL of the project's repository, derived from host, owner and name.
    pub fn url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }
}

/// Deep-merge `source` into `target` with last-wins semantics.
///
/// For each key present in `source` its value replaces the one in
/// `target`; nested mappings are merged key-by-key recursively, while
/// scalars and sequences are replaced wholesale. Order of application is
/// significant.
pub fn merge_values(target: &mut Values, source: &Values) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                merge_values(existing, incoming);
            }
            (Some(existing), _) => *existing = value.clone(),
            (None, _) => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Load values from a YAML file. An empty document yields empty values.
pub fn load_values(path: &Path) -> Result<Values> {
    let raw = std::fs::read_to_string(path)?;
    parse_values(&raw).map_err(|err| Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Parse a YAML document into values. `null` (e.g. an empty file) is
/// treated as empty values; any other non-mapping top level is rejected.
pub fn parse_values(raw: &str) -> Result<Values> {
    match serde_yaml::from_str::<Value>(raw)? {
        Value::Null => Ok(Values::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::ValueParse {
            expr: format!("{:?}", other),
            message: "top level must be a mapping".to_string(),
        }),
    }
}

/// Apply a single `key=value` assignment to `values`.
///
/// The key may be a dotted path (`deeply.nested.key=value`); intermediate
/// mappings are created as needed and non-mapping intermediates are
/// replaced. The value is parsed as a YAML scalar so `true`, `42` and
/// quoted strings keep their types.
pub fn set_value(values: &mut Values, expr: &str) -> Result<()> {
    let (key_path, raw_value) = expr.split_once('=').ok_or_else(|| Error::ValueParse {
        expr: expr.to_string(),
        message: "expected key=value".to_string(),
    })?;

    let segments: Vec<&str> = key_path.split('.').collect();
    if key_path.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::ValueParse {
            expr: expr.to_string(),
            message: "empty key segment".to_string(),
        });
    }

    let mut current = values;
    for segment in &segments[..segments.len() - 1] {
        let key = Value::String(segment.to_string());
        let is_mapping = matches!(current.get(&key), Some(Value::Mapping(_)));
        if !is_mapping {
            current.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        current = current.get_mut(&key).and_then(Value::as_mapping_mut).unwrap();
    }

    let leaf = segments[segments.len() - 1];
    current.insert(Value::String(leaf.to_string()), parse_scalar(raw_value));

    Ok(())
}

fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Template renderer over a fixed context, constructed once per
/// materialization so every file sees the same namespace.
pub struct Renderer {
    handlebars: Handlebars<'static>,
    context: serde_json::Value,
}

impl Renderer {
    pub fn new(project: &ProjectInfo, values: &Values) -> Renderer {
        let mut handlebars = Handlebars::new();

        // Generated files are code and config, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);
        // An unresolved variable is an error, not an empty string.
        handlebars.set_strict_mode(true);

        let context = json!({
            "project": {
                "name": project.name,
                "host": project.host,
                "owner": project.owner,
                "url": project.url(),
            },
            "values": yaml_to_json(&Value::Mapping(values.clone())),
        });

        Renderer { handlebars, context }
    }

    /// Render a template read from `path`. The path is only used for error
    /// context.
    pub fn render(&self, path: &str, template: &str) -> Result<String> {
        self.handlebars
            .render_template(template, &self.context)
            .map_err(|err| Error::TemplateRender {
                path: path.to_string(),
                message: err.to_string(),
            })
    }
}

/// Convert a YAML value into its JSON counterpart for the handlebars
/// context. Mapping keys are stringified; numbers that JSON cannot
/// represent (NaN, infinities) degrade to null.
fn yaml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(seq) => serde_json::Value::Array(seq.iter().map(yaml_to_json).collect()),
        Value::Mapping(mapping) => {
            let mut object = serde_json::Map::new();
            for (key, value) in mapping {
                let key = match key {
                    Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_default(),
                };
                object.insert(key, yaml_to_json(value));
            }
            serde_json::Value::Object(object)
        }
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
