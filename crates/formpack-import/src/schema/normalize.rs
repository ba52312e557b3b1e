use serde_json::{Map, Value};

use super::{properties, required};
use crate::path::is_safe_segment;

/// Keywords dropped from every schema node by [`lenient_schema`].
const LENIENT_DROPPED_KEYWORDS: &[&str] = &["required", "minLength"];

/// Copy of `schema` with every `required` list and `minLength` bound removed,
/// at every nesting level. Types, properties, enums and formats are kept.
pub fn lenient_schema(schema: &Value) -> Value {
    let Some(node) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (keyword, value) in node {
        if LENIENT_DROPPED_KEYWORDS.contains(&keyword.as_str()) {
            continue;
        }
        let relaxed = match keyword.as_str() {
            "properties" => match value.as_object() {
                Some(props) => Value::Object(
                    props
                        .iter()
                        .map(|(name, prop)| (name.clone(), lenient_schema(prop)))
                        .collect(),
                ),
                None => value.clone(),
            },
            "items" => match value {
                Value::Array(tuple) => Value::Array(tuple.iter().map(lenient_schema).collect()),
                other => lenient_schema(other),
            },
            "additionalProperties" => lenient_schema(value),
            _ => value.clone(),
        };
        out.insert(keyword.clone(), relaxed);
    }
    Value::Object(out)
}

/// Value to insert for a missing required property.
///
/// An explicit `default` always wins. Enum fields never get an implicit
/// default: the user has to pick one. Otherwise strings, arrays and objects
/// start empty and every other type stays absent.
pub fn resolve_default(property_schema: &Value) -> Option<Value> {
    if let Some(default) = property_schema.get("default") {
        return Some(default.clone());
    }
    if property_schema.get("enum").is_some() {
        return None;
    }
    match property_schema.get("type").and_then(Value::as_str) {
        Some("string") => Some(Value::String(String::new())),
        Some("array") => Some(Value::Array(Vec::new())),
        Some("object") => Some(Value::Object(Map::new())),
        _ => None,
    }
}

/// Insert defaults for required properties missing from `data`, then descend
/// into nested objects (and arrays of objects) that are present.
///
/// Read-only properties are never defaulted.
///
/// Applying this twice yields the same result as applying it once.
pub fn fill_required_defaults(schema: &Value, data: &Value) -> Value {
    let Some(obj) = data.as_object() else {
        return data.clone();
    };
    let mut out = obj.clone();
    let props = properties(schema);

    for name in required(schema) {
        if out.contains_key(name) || !is_safe_segment(name) {
            continue;
        }
        let Some(prop) = props.and_then(|p| p.get(name)) else {
            continue;
        };
        if is_read_only(prop) {
            continue;
        }
        if let Some(default) = resolve_default(prop) {
            out.insert(name.to_string(), default);
        }
    }

    if let Some(props) = props {
        for (name, prop_schema) in props {
            if let Some(value) = out.get_mut(name) {
                *value = fill_nested(prop_schema, value);
            }
        }
    }

    Value::Object(out)
}

fn fill_nested(schema: &Value, value: &Value) -> Value {
    match value {
        Value::Object(_) => fill_required_defaults(schema, value),
        Value::Array(items) => match schema.get("items") {
            Some(item_schema) if item_schema.is_object() => Value::Array(
                items
                    .iter()
                    .map(|item| fill_nested(item_schema, item))
                    .collect(),
            ),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Remove every property whose schema is marked `readOnly: true`.
///
/// Read-only fields are computed locally and are never taken from a file.
pub fn strip_read_only(schema: &Value, data: &Value) -> Value {
    match data {
        Value::Object(obj) => {
            let Some(props) = properties(schema) else {
                return data.clone();
            };
            let mut out = Map::new();
            for (name, value) in obj {
                match props.get(name) {
                    Some(prop) if is_read_only(prop) => continue,
                    Some(prop) => {
                        out.insert(name.clone(), strip_read_only(prop, value));
                    }
                    None => {
                        out.insert(name.clone(), value.clone());
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => match schema.get("items") {
            Some(item_schema) if item_schema.is_object() => Value::Array(
                items
                    .iter()
                    .map(|item| strip_read_only(item_schema, item))
                    .collect(),
            ),
            _ => data.clone(),
        },
        _ => data.clone(),
    }
}

fn is_read_only(schema: &Value) -> bool {
    schema.get("readOnly").and_then(Value::as_bool) == Some(true)
}
