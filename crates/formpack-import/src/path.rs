//! Dotted-path access into JSON form data.
//!
//! `"contacts.0.name"` addresses `data["contacts"][0]["name"]`. Numeric
//! segments index arrays; any other segment addresses an object key.
//!
//! Writes refuse paths containing `__proto__`, `constructor` or `prototype`.
//! The data ends up as plain JavaScript objects in the browser, so these
//! segments must never be written no matter where the path came from.

use serde_json::{Map, Value};

/// Path segments that would pollute Object.prototype.
const BANNED_SEGMENTS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Largest gap of `null`s a single write may open up in an array.
const MAX_ARRAY_GAP: usize = 1024;

pub fn is_safe_segment(segment: &str) -> bool {
    !BANNED_SEGMENTS.contains(&segment)
}

fn split_path(path: &str) -> Vec<&str> {
    if path.trim().is_empty() {
        return Vec::new();
    }
    path.split('.').filter(|s| !s.is_empty()).collect()
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn empty_container_for(segment: &str) -> Value {
    if parse_index(segment).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Read the value at `path`. Returns `None` for any traversal that does not
/// resolve, including an empty path.
pub fn get_path_value<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = split_path(path);
    if segments.is_empty() || !segments.iter().all(|s| is_safe_segment(s)) {
        return None;
    }
    segments
        .iter()
        .try_fold(source, |current, segment| match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Write `value` at `path`, creating missing containers on the way.
///
/// A missing container becomes an array when the segment that indexes into it
/// is numeric, otherwise an object. Paths with banned segments, paths that
/// would name a property on an existing array, and writes into a primitive
/// root leave `target` untouched.
pub fn set_path_value(target: &mut Value, path: &str, value: Value) {
    let segments = split_path(path);
    if segments.is_empty() || !segments.iter().all(|s| is_safe_segment(s)) {
        return;
    }
    if !can_write(target, &segments) {
        return;
    }
    write_segments(target, &segments, value);
}

/// Like [`set_path_value`] but returns an updated copy, leaving `source` as is.
pub fn set_path_value_immutable(source: &Value, path: &str, value: Value) -> Value {
    let mut next = source.clone();
    set_path_value(&mut next, path, value);
    next
}

/// Dry run over the existing structure so a rejected write never leaves
/// half-created containers behind.
fn can_write(target: &Value, segments: &[&str]) -> bool {
    if !target.is_object() && !target.is_array() {
        return false;
    }
    let mut current = Some(target);
    for segment in segments {
        let index = parse_index(segment);
        match current {
            Some(Value::Object(map)) => current = map.get(*segment),
            Some(Value::Array(items)) => match index {
                Some(i) if i <= items.len() + MAX_ARRAY_GAP => current = items.get(i),
                _ => return false,
            },
            // Missing or primitive: a fresh container is created here.
            _ => {
                if index.is_some_and(|i| i > MAX_ARRAY_GAP) {
                    return false;
                }
                current = None;
            }
        }
    }
    true
}

fn write_segments(current: &mut Value, segments: &[&str], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *current = value;
        return;
    };

    let slot = match current {
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        Value::Array(items) => {
            let Some(index) = parse_index(segment) else {
                return;
            };
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        _ => return,
    };

    if let Some(next) = rest.first() {
        if !slot.is_object() && !slot.is_array() {
            *slot = empty_container_for(next);
        }
    }
    write_segments(slot, rest, value);
}
