use serde_json::{Map, Value};
use thiserror::Error;

use super::{properties, required};

/// First point at which data failed its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// JSON Pointer to the offending value (`/` for the root).
    pub path: String,
    pub reason: String,
}

/// Validate `data` against the formpack JSON Schema subset.
///
/// Supported keywords: `type` (single or list), `enum`, `const`,
/// `properties`, `required`, `additionalProperties`, `items` (single or
/// tuple), `minLength`, `maxLength`, `minItems`, `maxItems`, `minimum`,
/// `maximum`. Annotations such as `format`, `title` or `default` are ignored.
pub fn validate_against_schema(schema: &Value, data: &Value) -> Result<(), SchemaViolation> {
    check(schema, data, "")
}

fn violation(path: &str, reason: impl Into<String>) -> SchemaViolation {
    SchemaViolation {
        path: if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        },
        reason: reason.into(),
    }
}

fn child_path(path: &str, segment: &str) -> String {
    // RFC 6901 escaping
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

fn check(schema: &Value, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let node = match schema {
        Value::Bool(true) => return Ok(()),
        Value::Bool(false) => return Err(violation(path, "no value is allowed here")),
        Value::Object(node) => node,
        _ => return Ok(()),
    };

    if let Some(expected) = node.get("type") {
        check_type(expected, value, path)?;
    }

    if let Some(options) = node.get("enum").and_then(Value::as_array) {
        if !options.contains(value) {
            return Err(violation(path, "value is not one of the allowed options"));
        }
    }

    if let Some(constant) = node.get("const") {
        if constant != value {
            return Err(violation(path, "value does not match the expected constant"));
        }
    }

    match value {
        Value::String(s) => check_string(node, s, path),
        Value::Number(_) => check_number(node, value, path),
        Value::Array(items) => check_array(node, items, path),
        Value::Object(obj) => check_object(schema, node, obj, path),
        _ => Ok(()),
    }
}

fn check_type(expected: &Value, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let ok = match expected {
        Value::String(name) => matches_type(name, value),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| matches_type(name, value)),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(violation(path, format!("expected type {expected}")))
    }
}

fn matches_type(name: &str, value: &Value) -> bool {
    match name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn bound(node: &Map<String, Value>, keyword: &str) -> Option<u64> {
    node.get(keyword).and_then(Value::as_u64)
}

fn check_string(node: &Map<String, Value>, s: &str, path: &str) -> Result<(), SchemaViolation> {
    let len = s.chars().count() as u64;
    if let Some(min) = bound(node, "minLength") {
        if len < min {
            return Err(violation(path, format!("must be at least {min} characters")));
        }
    }
    if let Some(max) = bound(node, "maxLength") {
        if len > max {
            return Err(violation(path, format!("must be at most {max} characters")));
        }
    }
    Ok(())
}

fn check_number(
    node: &Map<String, Value>,
    value: &Value,
    path: &str,
) -> Result<(), SchemaViolation> {
    let Some(n) = value.as_f64() else {
        return Ok(());
    };
    if let Some(min) = node.get("minimum").and_then(Value::as_f64) {
        if n < min {
            return Err(violation(path, format!("must be >= {min}")));
        }
    }
    if let Some(max) = node.get("maximum").and_then(Value::as_f64) {
        if n > max {
            return Err(violation(path, format!("must be <= {max}")));
        }
    }
    Ok(())
}

fn check_array(
    node: &Map<String, Value>,
    items: &[Value],
    path: &str,
) -> Result<(), SchemaViolation> {
    let len = items.len() as u64;
    if let Some(min) = bound(node, "minItems") {
        if len < min {
            return Err(violation(path, format!("must have at least {min} items")));
        }
    }
    if let Some(max) = bound(node, "maxItems") {
        if len > max {
            return Err(violation(path, format!("must have at most {max} items")));
        }
    }
    match node.get("items") {
        Some(Value::Array(tuple)) => {
            for (i, (item_schema, item)) in tuple.iter().zip(items).enumerate() {
                check(item_schema, item, &child_path(path, &i.to_string()))?;
            }
        }
        Some(item_schema) => {
            for (i, item) in items.iter().enumerate() {
                check(item_schema, item, &child_path(path, &i.to_string()))?;
            }
        }
        None => {}
    }
    Ok(())
}

fn check_object(
    schema: &Value,
    node: &Map<String, Value>,
    obj: &Map<String, Value>,
    path: &str,
) -> Result<(), SchemaViolation> {
    for name in required(schema) {
        if !obj.contains_key(name) {
            return Err(violation(&child_path(path, name), "required property is missing"));
        }
    }

    let props = properties(schema);
    let additional = node.get("additionalProperties");
    for (name, value) in obj {
        let child = child_path(path, name);
        match props.and_then(|p| p.get(name)) {
            Some(prop_schema) => check(prop_schema, value, &child)?,
            None => match additional {
                Some(Value::Bool(false)) => {
                    return Err(violation(&child, "unexpected property"));
                }
                Some(extra_schema @ Value::Object(_)) => check(extra_schema, value, &child)?,
                _ => {}
            },
        }
    }
    Ok(())
}
