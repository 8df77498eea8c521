//! Moves a JS configuration object in and out of JSON.
//!
//! Functions and non-plain objects (DOM elements, player adaptors) cannot be
//! represented as JSON. They are kept aside by field path while the tree is
//! normalized and put back into the resolved object afterwards. Callbacks in
//! their documented slots are simply omitted from the JSON; every other host
//! value is replaced by `{ "handle": n }`, the wire form of an element handle.

use annoto_config::path::{FieldPath, Segment};
use annoto_config::raw::is_callback_slot;
use annoto_config::ConfigError;
use js_sys::{Array, Object, Reflect};
use serde_json::{Map, Number, Value as JsonValue};
use wasm_bindgen::{JsCast, JsValue};

enum Stashed {
    Callback(JsValue),
    Opaque { handle: u32, value: JsValue },
}

#[derive(Default)]
pub(crate) struct HostValues {
    entries: Vec<(FieldPath, Stashed)>,
    next_handle: u32,
}

impl HostValues {
    /// Convert the root configuration object. The root is always walked as a
    /// plain object so class instances are accepted as configs.
    pub(crate) fn config_to_json(&mut self, cfg: &JsValue) -> Result<JsonValue, ConfigError> {
        let root = FieldPath::root();
        if cfg.is_object() && !cfg.is_function() && !Array::is_array(cfg) {
            return self.object_to_json(cfg, &root);
        }
        Ok(self.to_json(cfg, &root)?.unwrap_or(JsonValue::Null))
    }

    /// `None` means the key is left out of the JSON object.
    fn to_json(&mut self, value: &JsValue, path: &FieldPath) -> Result<Option<JsonValue>, ConfigError> {
        if value.is_undefined() {
            return Ok(None);
        }
        if value.is_null() {
            return Ok(Some(JsonValue::Null));
        }
        if let Some(b) = value.as_bool() {
            return Ok(Some(JsonValue::Bool(b)));
        }
        if let Some(f) = value.as_f64() {
            return number(f, path).map(Some);
        }
        if let Some(s) = value.as_string() {
            return Ok(Some(JsonValue::String(s)));
        }
        if value.is_function() {
            if is_callback_slot(path) {
                self.entries
                    .push((path.clone(), Stashed::Callback(value.clone())));
                return Ok(None);
            }
            return Ok(Some(self.opaque(value, path)));
        }
        if Array::is_array(value) {
            let arr: &Array = value.unchecked_ref();
            let mut items = Vec::with_capacity(arr.length() as usize);
            for (i, item) in arr.iter().enumerate() {
                items.push(self.to_json(&item, &path.index(i))?.unwrap_or(JsonValue::Null));
            }
            return Ok(Some(JsonValue::Array(items)));
        }
        if value.is_object() {
            if is_plain_object(value) {
                return self.object_to_json(value, path).map(Some);
            }
            return Ok(Some(self.opaque(value, path)));
        }
        Err(ConfigError::InvalidValue {
            path: path.clone(),
            reason: "unsupported JavaScript value".to_string(),
        })
    }

    fn object_to_json(&mut self, value: &JsValue, path: &FieldPath) -> Result<JsonValue, ConfigError> {
        let obj: &Object = value.unchecked_ref();
        let mut map = Map::new();
        for key in Object::keys(obj).iter() {
            let Some(key) = key.as_string() else {
                continue;
            };
            let child = path.key(key.as_str());
            let item = Reflect::get(obj, &JsValue::from_str(&key)).map_err(|e| js_failure(&child, &e))?;
            if let Some(json) = self.to_json(&item, &child)? {
                map.insert(key, json);
            }
        }
        Ok(JsonValue::Object(map))
    }

    fn opaque(&mut self, value: &JsValue, path: &FieldPath) -> JsonValue {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.entries.push((
            path.clone(),
            Stashed::Opaque {
                handle,
                value: value.clone(),
            },
        ));
        serde_json::json!({ "handle": handle })
    }

    /// Put host values back into the JS form of the resolved configuration.
    /// Values whose field did not survive normalization are dropped.
    pub(crate) fn reattach(&self, target: &JsValue) -> Result<(), JsValue> {
        for (path, stashed) in &self.entries {
            let Some((leaf, parents)) = path.segments().split_last() else {
                continue;
            };
            let Some(parent) = descend(target, parents)? else {
                continue;
            };
            let leaf = segment_key(leaf);
            match stashed {
                Stashed::Callback(f) => {
                    Reflect::set(&parent, &leaf, f)?;
                }
                Stashed::Opaque { handle, value } => {
                    if holds_handle(&Reflect::get(&parent, &leaf)?, *handle)? {
                        Reflect::set(&parent, &leaf, value)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Plain objects are created by literals or `Object.create(null)`; anything
/// with a longer prototype chain belongs to the host.
fn is_plain_object(value: &JsValue) -> bool {
    let proto = Object::get_prototype_of(value);
    proto.is_null() || Object::get_prototype_of(&proto).is_null()
}

fn number(f: f64, path: &FieldPath) -> Result<JsonValue, ConfigError> {
    if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
        return Ok(JsonValue::Number(Number::from(f as i64)));
    }
    Number::from_f64(f)
        .map(JsonValue::Number)
        .ok_or_else(|| ConfigError::InvalidValue {
            path: path.clone(),
            reason: format!("{f} is not a finite number"),
        })
}

fn js_failure(path: &FieldPath, err: &JsValue) -> ConfigError {
    ConfigError::InvalidValue {
        path: path.clone(),
        reason: err
            .as_string()
            .unwrap_or_else(|| "property could not be read".to_string()),
    }
}

fn segment_key(segment: &Segment) -> JsValue {
    match segment {
        Segment::Key(k) => JsValue::from_str(k),
        Segment::Index(i) => JsValue::from_f64(*i as f64),
    }
}

fn descend(root: &JsValue, segments: &[Segment]) -> Result<Option<JsValue>, JsValue> {
    let mut current = root.clone();
    for segment in segments {
        if !current.is_object() {
            return Ok(None);
        }
        current = Reflect::get(&current, &segment_key(segment))?;
    }
    Ok(current.is_object().then_some(current))
}

fn holds_handle(value: &JsValue, handle: u32) -> Result<bool, JsValue> {
    if !value.is_object() {
        return Ok(false);
    }
    let found = Reflect::get(value, &JsValue::from_str("handle"))?;
    Ok(found.as_f64() == Some(f64::from(handle)))
}
