//! WASM bindings for formpack data portability.
//!
//! Exposes export encryption, envelope detection, import validation and
//! dotted-path access via wasm-bindgen for the browser UI.

pub mod crypto;
mod error;
pub mod import;

use wasm_bindgen::prelude::*;

/// Install the panic hook so Rust panics show up in the browser console.
#[wasm_bindgen(js_name = "init")]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
}
