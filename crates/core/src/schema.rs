//! Configuration schema documents for app templates.
//!
//! Every template carries a JSON-Schema-like document describing the fields
//! an administrator fills in before deploying an app. This module provides
//! the three operations the API builds on:
//!
//! - [`default_values`] collects declared defaults into a ready-to-render
//!   configuration-values object,
//! - [`widgets`] maps the schema to generic input-control descriptors that a
//!   frontend form renderer consumes,
//! - [`validate_values`] type-checks submitted values before they are stored
//!   on a deployed app.
//!
//! Widget and validation paths use the same dotted notation as template
//! markers, so a form field binds directly to the marker it feeds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// A node in a template's configuration schema, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldSchema {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
        /// Allowed values; presence turns the input into a select control.
        #[serde(
            rename = "enum",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        options: Option<Vec<String>>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Child field schemas, keyed by field name. BTreeMap keeps widget
        /// order stable across serialization round trips.
        #[serde(default)]
        properties: BTreeMap<String, FieldSchema>,
    },
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        items: Box<FieldSchema>,
    },
}

/// An input-control descriptor for the dynamic form renderer.
///
/// `path` is the dotted location in the configuration-values object this
/// control reads from and writes to.
#[derive(Debug, Clone, Serialize)]
pub struct FieldWidget {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub control: Control,
}

/// The concrete input control for a field, tagged by `control`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Text,
    Select { options: Vec<String> },
    NumberInput,
    Checkbox,
    Group { children: Vec<FieldWidget> },
    List { item: Box<FieldWidget> },
}

/// Collect a schema's declared defaults into a configuration-values object.
///
/// Fields without a declared default get their type's zero value (empty
/// string, `0`, `false`, empty array); object nodes recurse.
pub fn default_values(schema: &FieldSchema) -> Value {
    match schema {
        FieldSchema::String { default, .. } => {
            Value::String(default.clone().unwrap_or_default())
        }
        FieldSchema::Number { default, .. } => serde_json::json!(default.unwrap_or(0.0)),
        FieldSchema::Boolean { default, .. } => Value::Bool(default.unwrap_or(false)),
        FieldSchema::Object { properties, .. } => {
            let mut map = Map::new();
            for (name, child) in properties {
                map.insert(name.clone(), default_values(child));
            }
            Value::Object(map)
        }
        FieldSchema::Array { .. } => Value::Array(Vec::new()),
    }
}

/// Map a schema to form widgets.
///
/// A top-level object schema produces one widget per property; any other
/// top-level schema produces a single widget bound to the root path.
pub fn widgets(schema: &FieldSchema) -> Vec<FieldWidget> {
    match schema {
        FieldSchema::Object { properties, .. } => properties
            .iter()
            .map(|(name, child)| build_widget(name, name, child))
            .collect(),
        other => vec![build_widget("", "value", other)],
    }
}

fn build_widget(path: &str, name: &str, schema: &FieldSchema) -> FieldWidget {
    let (title, description) = meta(schema);
    let label = title.unwrap_or_else(|| name.to_string());

    let control = match schema {
        FieldSchema::String { options: Some(options), .. } => Control::Select {
            options: options.clone(),
        },
        FieldSchema::String { .. } => Control::Text,
        FieldSchema::Number { .. } => Control::NumberInput,
        FieldSchema::Boolean { .. } => Control::Checkbox,
        FieldSchema::Object { properties, .. } => Control::Group {
            children: properties
                .iter()
                .map(|(child_name, child)| {
                    build_widget(&join_path(path, child_name), child_name, child)
                })
                .collect(),
        },
        FieldSchema::Array { items, .. } => Control::List {
            item: Box::new(build_widget(path, "item", items)),
        },
    };

    FieldWidget {
        path: path.to_string(),
        label,
        description,
        control,
    }
}

fn meta(schema: &FieldSchema) -> (Option<String>, Option<String>) {
    match schema {
        FieldSchema::String { title, description, .. }
        | FieldSchema::Number { title, description, .. }
        | FieldSchema::Boolean { title, description, .. }
        | FieldSchema::Object { title, description, .. }
        | FieldSchema::Array { title, description, .. } => {
            (title.clone(), description.clone())
        }
    }
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

/// Type-check configuration values against a schema.
///
/// Missing object keys are allowed (defaults fill them at render time);
/// unknown keys and type mismatches are rejected with the offending dotted
/// path in the message.
pub fn validate_values(schema: &FieldSchema, values: &Value) -> Result<(), CoreError> {
    check_node(schema, values, "")
}

fn check_node(schema: &FieldSchema, value: &Value, path: &str) -> Result<(), CoreError> {
    match schema {
        FieldSchema::String { options, .. } => {
            let Value::String(s) = value else {
                return Err(type_mismatch(path, "string", value));
            };
            if let Some(options) = options {
                if !options.iter().any(|o| o == s) {
                    return Err(CoreError::Validation(format!(
                        "{}: '{s}' is not one of the allowed values",
                        display_path(path)
                    )));
                }
            }
            Ok(())
        }
        FieldSchema::Number { .. } => match value {
            Value::Number(_) => Ok(()),
            other => Err(type_mismatch(path, "number", other)),
        },
        FieldSchema::Boolean { .. } => match value {
            Value::Bool(_) => Ok(()),
            other => Err(type_mismatch(path, "boolean", other)),
        },
        FieldSchema::Object { properties, .. } => {
            let Value::Object(map) = value else {
                return Err(type_mismatch(path, "object", value));
            };
            for key in map.keys() {
                if !properties.contains_key(key) {
                    return Err(CoreError::Validation(format!(
                        "{}: unknown field '{key}'",
                        display_path(path)
                    )));
                }
            }
            for (name, child) in properties {
                if let Some(child_value) = map.get(name) {
                    check_node(child, child_value, &join_path(path, name))?;
                }
            }
            Ok(())
        }
        FieldSchema::Array { items, .. } => {
            let Value::Array(entries) = value else {
                return Err(type_mismatch(path, "array", value));
            };
            for (index, entry) in entries.iter().enumerate() {
                check_node(items, entry, &join_path(path, &index.to_string()))?;
            }
            Ok(())
        }
    }
}

fn type_mismatch(path: &str, expected: &str, got: &Value) -> CoreError {
    let got_type = match got {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    CoreError::Validation(format!(
        "{}: expected {expected}, got {got_type}",
        display_path(path)
    ))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}
