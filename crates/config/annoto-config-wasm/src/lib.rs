//! annoto-config-wasm: JS bindings for annoto-config.
//!
//! ```js
//! import { normalizeConfig } from "annoto-config-wasm";
//!
//! try {
//!   const { config, warnings } = normalizeConfig({
//!     clientId: "my-client",
//!     demoMode: false,
//!     widgets: [{ player: { type: "html5", element: videoElement } }],
//!     ux: { ssoAuthRequestHandle: () => login() },
//!   });
//!   warnings.forEach((w) => console.warn(w.path, w.message));
//! } catch (errors) {
//!   // [{ path: "clientId", message: "clientId: required field is missing" }]
//! }
//! ```

use annoto_config::{
    normalize_json_with, ConfigError, ConfigErrors, DiagnosticRecord, NormalizeOptions,
    Normalized,
};
use js_sys::{Object, Reflect};
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

mod host_values;

use host_values::HostValues;

fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Blocking errors are thrown as an array of `{ path, message }`.
fn errors_to_js(errors: &ConfigErrors) -> JsValue {
    let records: Vec<DiagnosticRecord> = errors.iter().map(DiagnosticRecord::from).collect();
    to_js(&records).unwrap_or_else(|_| JsValue::from_str(&errors.to_string()))
}

fn parse_options(options: JsValue) -> Result<NormalizeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(NormalizeOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("invalid normalize options: {e}")))
}

fn run(value: &JsonValue, options: JsValue) -> Result<Normalized, JsValue> {
    let options = parse_options(options)?;
    normalize_json_with(value, &options).map_err(|errs| errors_to_js(&errs))
}

fn output(normalized: &Normalized, hosts: Option<&HostValues>) -> Result<JsValue, JsValue> {
    let config_json = normalized
        .config
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = to_js(&config_json)?;
    if let Some(hosts) = hosts {
        hosts.reattach(&config)?;
    }
    let warnings: Vec<DiagnosticRecord> = normalized
        .warnings
        .iter()
        .map(DiagnosticRecord::from)
        .collect();

    let out = Object::new();
    Reflect::set(&out, &JsValue::from_str("config"), &config)?;
    Reflect::set(&out, &JsValue::from_str("warnings"), &to_js(&warnings)?)?;
    Ok(out.into())
}

/// Normalize a configuration object as passed to `Annoto.boot`.
///
/// Functions and host objects (elements, player adaptors) are carried through
/// to the returned `config` at the same field paths.
///
/// # Returns
/// `{ config, warnings }`; throws an array of `{ path, message }` on blocking errors.
#[wasm_bindgen(js_name = "normalizeConfig")]
pub fn normalize_config(cfg: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let mut hosts = HostValues::default();
    let value = hosts
        .config_to_json(&cfg)
        .map_err(|err| errors_to_js(&ConfigErrors::single(err)))?;
    let normalized = run(&value, options)?;
    output(&normalized, Some(&hosts))
}

/// Normalize a configuration given as JSON text.
#[wasm_bindgen(js_name = "normalizeConfigJson")]
pub fn normalize_config_json(json: &str, options: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let value: JsonValue = serde_json::from_str(json).map_err(|e| {
        errors_to_js(&ConfigErrors::single(ConfigError::InvalidValue {
            path: annoto_config::FieldPath::root(),
            reason: format!("config json parse error: {e}"),
        }))
    })?;
    let normalized = run(&value, options)?;
    output(&normalized, None)
}

/// Get the ABI version for compatibility checks
#[wasm_bindgen(js_name = "abiVersion")]
pub fn abi_version() -> u32 {
    1
}
