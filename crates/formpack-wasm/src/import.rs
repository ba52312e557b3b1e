//! WASM bindings for formpack-import.

use crate::error::{from_js_value, to_js_value};
use formpack_import::{
    get_path_value, is_supported_locale, set_path_value_immutable, validate_json_import,
    FORMPACK_IDS,
};
use wasm_bindgen::prelude::*;

/// Validate a plain export. Always resolves to `{ payload, error }`; import
/// problems are data, not exceptions.
#[wasm_bindgen(js_name = "validateJsonImport")]
pub fn wasm_validate_json_import(
    raw: &str,
    schema: JsValue,
    expected_formpack_id: &str,
) -> Result<JsValue, JsValue> {
    let schema = from_js_value(schema)?;
    to_js_value(&validate_json_import(raw, &schema, expected_formpack_id))
}

#[wasm_bindgen(js_name = "formpackIds")]
pub fn wasm_formpack_ids() -> Vec<String> {
    FORMPACK_IDS.iter().map(|id| id.to_string()).collect()
}

#[wasm_bindgen(js_name = "isSupportedLocale")]
pub fn wasm_is_supported_locale(code: &str) -> bool {
    is_supported_locale(code)
}

// --- Path access ---

/// Value at `path`, or `undefined`.
#[wasm_bindgen(js_name = "getPathValue")]
pub fn wasm_get_path_value(source: JsValue, path: &str) -> Result<JsValue, JsValue> {
    let source = from_js_value(source)?;
    match get_path_value(&source, path) {
        Some(value) => to_js_value(value),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Copy of `source` with `value` written at `path`.
#[wasm_bindgen(js_name = "setPathValue")]
pub fn wasm_set_path_value(
    source: JsValue,
    path: &str,
    value: JsValue,
) -> Result<JsValue, JsValue> {
    let source = from_js_value(source)?;
    let value = from_js_value(value)?;
    to_js_value(&set_path_value_immutable(&source, path, value))
}
