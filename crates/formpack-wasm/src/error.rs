//! Error conversion for WASM boundary.

use formpack_crypto::EnvelopeError;
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Convert any error with Display into a JsValue error.
pub fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Convert an envelope failure into a JS `Error` carrying a stable `code`
/// property, so callers branch on `err.code` instead of the message.
pub fn envelope_error(e: EnvelopeError) -> JsValue {
    let error = js_sys::Error::new(&e.to_string());
    error.set_name("JsonEncryptionError");
    // Reflect::set on a fresh Error object cannot fail.
    js_sys::Reflect::set(&error, &"code".into(), &JsValue::from_str(e.code())).unwrap();
    error.into()
}

/// Serialize a Rust value to a JS value, using plain objects instead of Maps.
pub fn to_js_value(value: &impl Serialize) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(to_js_error)
}

/// Read an arbitrary JS value as JSON.
pub fn from_js_value(value: JsValue) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}
