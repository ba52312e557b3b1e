//! JSON Schema handling for imported form data.
//!
//! Formpack schemas use a small subset of JSON Schema (objects, arrays,
//! strings, enums and a few numeric and length bounds). Imports are checked
//! against a *lenient* variant of the schema so records written under older,
//! looser form definitions still load.

mod normalize;
mod validate;

pub use normalize::{fill_required_defaults, lenient_schema, resolve_default, strip_read_only};
pub use validate::{validate_against_schema, SchemaViolation};

use serde_json::{Map, Value};

fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

fn required(schema: &Value) -> impl Iterator<Item = &str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
