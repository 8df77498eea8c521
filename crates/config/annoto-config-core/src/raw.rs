//! Partially specified configuration as supplied by the host, and the decoder
//! that builds it from untrusted JSON.
//!
//! Every field is optional here, including the ones the contract requires;
//! presence is enforced by [`normalize`](crate::normalize::normalize) so that a
//! Rust caller and a JSON caller get the same diagnostics.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::callbacks::{AuthHandler, InviteFn, MediaDetailsFn, MediaSrcFn};
use crate::diagnostics::{ConfigError, ConfigErrors, ConfigWarning, Diagnostics};
use crate::features::{Feature, RawFeatures};
use crate::path::{FieldPath, Segment};
use crate::types::{
    ElementRef, HorizontalAlign, LaunchSource, Margins, Position, SortBy, Theme, VerticalAlign,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    pub client_id: Option<String>,
    pub position: Option<Position>,
    pub phone_position: Option<Position>,
    pub relative_position_element: Option<ElementRef>,
    pub align: Option<RawAlign>,
    /// Deprecated, superseded by `ux.maxWidth`.
    pub width: Option<RawWidth>,
    pub margins: Option<Margins>,
    pub ux: Option<RawUx>,
    pub locale: Option<String>,
    pub widgets: Option<Vec<RawWidget>>,
    pub thread: Option<RawThread>,
    pub demo_mode: Option<bool>,
    pub launch_source: Option<LaunchSource>,
    pub features: Option<RawFeatures>,
    pub help_url: Option<String>,
    pub z_index: Option<i32>,
    pub fs_z_index: Option<i32>,
    /// Deprecated, superseded by `ux.openOnLoad`.
    pub open_on_load: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawAlign {
    pub vertical: Option<VerticalAlign>,
    pub horizontal: Option<HorizontalAlign>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawWidth {
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawUx {
    pub comments_top_to_bottom: Option<bool>,
    pub draggable_disabled: Option<bool>,
    pub side_panel_layout: Option<bool>,
    pub side_panel_full_screen: Option<bool>,
    pub side_panel_full_screen_width: Option<f64>,
    pub side_panel_overlay: Option<bool>,
    pub side_panel_overlay_width: Option<f64>,
    pub open_on_load: Option<bool>,
    pub max_width: Option<f64>,
    pub pause_triggers: Option<RawPauseTriggers>,
    pub theme: Option<Theme>,
    pub sso_auth_request_handle: Option<AuthHandler>,
    pub logout_request_handle: Option<AuthHandler>,
    pub get_one_on_one_session_invite: Option<InviteFn>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPauseTriggers {
    pub form_open: Option<bool>,
    pub auth_trigger: Option<bool>,
    pub widget_open_on_phone: Option<bool>,
    pub cta: Option<bool>,
    pub timeline_ugc_tap: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawThread {
    pub show_replies: Option<bool>,
    pub sort: Option<SortBy>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWidget {
    pub player: Option<RawPlayer>,
    pub timeline: Option<RawTimeline>,
    /// Deprecated, superseded by `ux.openOnLoad`.
    pub open_on_load: Option<bool>,
    pub demo_discussion: Option<String>,
    pub host: Option<ElementRef>,
    pub stats: Option<RawStats>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlayer {
    /// `player.type`
    pub kind: Option<String>,
    pub element: Option<ElementRef>,
    pub api: Option<JsonValue>,
    pub wide: Option<bool>,
    pub params: Option<JsonValue>,
    pub media_src: Option<MediaSrcFn>,
    pub media_details: Option<MediaDetailsFn>,
}

impl RawPlayer {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTimeline {
    /// Obsolete; read and discarded.
    pub embedded: Option<bool>,
    pub height: Option<f64>,
    pub overlay_video: Option<bool>,
    pub disable_dock_padding: Option<bool>,
    pub position_top_in_full_screen: Option<bool>,
    pub scrubber_always_on: Option<bool>,
    pub scrubber_height: Option<f64>,
    pub scrubber_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStats {
    pub host: Option<ElementRef>,
}

/// Result of decoding JSON: the raw record plus warnings about fields that
/// were not understood.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub config: RawConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl RawConfig {
    /// Minimal record with the three required fields and a single widget.
    pub fn new(client_id: impl Into<String>, player_type: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            demo_mode: Some(false),
            widgets: Some(vec![RawWidget {
                player: Some(RawPlayer::of_type(player_type)),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    /// Decode an untrusted JSON value. Type mismatches are blocking errors;
    /// unrecognized keys are reported as warnings. `null` counts as absent.
    pub fn from_json(value: &JsonValue) -> Result<Decoded, ConfigErrors> {
        let mut diag = Diagnostics::default();
        let config = {
            let mut dec = Decoder { diag: &mut diag };
            dec.config(value)
        };
        if let Some(errors) = diag.take_errors() {
            return Err(errors);
        }
        Ok(Decoded {
            config,
            warnings: diag.warnings,
        })
    }

    /// Parse and decode a JSON document.
    pub fn from_json_str(json: &str) -> Result<Decoded, ConfigErrors> {
        let value: JsonValue = serde_json::from_str(json).map_err(|e| {
            ConfigErrors::single(ConfigError::InvalidValue {
                path: FieldPath::root(),
                reason: format!("config json parse error: {e}"),
            })
        })?;
        Self::from_json(&value)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

const CONFIG_KEYS: &[&str] = &[
    "clientId",
    "position",
    "phonePosition",
    "relativePositionElement",
    "align",
    "width",
    "margins",
    "ux",
    "locale",
    "widgets",
    "thread",
    "demoMode",
    "launchSource",
    "features",
    "helpUrl",
    "zIndex",
    "fsZIndex",
    "openOnLoad",
];
const ALIGN_KEYS: &[&str] = &["vertical", "horizontal"];
const WIDTH_KEYS: &[&str] = &["max"];
const MARGIN_KEYS: &[&str] = &["left", "right", "top", "bottom"];
const UX_KEYS: &[&str] = &[
    "commentsTopToBottom",
    "draggableDisabled",
    "sidePanelLayout",
    "sidePanelFullScreen",
    "sidePanelFullScreenWidth",
    "sidePanelOverlay",
    "sidePanelOverlayWidth",
    "openOnLoad",
    "maxWidth",
    "pauseTriggers",
    "theme",
    "ssoAuthRequestHandle",
    "logoutRequestHandle",
    "getOneOnOneSessionInvite",
];
const PAUSE_KEYS: &[&str] = &[
    "formOpen",
    "authTrigger",
    "widgetOpenOnPhone",
    "cta",
    "timelineUgcTap",
];
const THREAD_KEYS: &[&str] = &["showReplies", "sort"];
const LAUNCH_KEYS: &[&str] = &["accessToken", "consumerKey", "origin"];
const WIDGET_KEYS: &[&str] = &[
    "player",
    "timeline",
    "openOnLoad",
    "demoDiscussion",
    "host",
    "stats",
];
const PLAYER_KEYS: &[&str] = &[
    "type",
    "element",
    "api",
    "wide",
    "params",
    "mediaSrc",
    "mediaDetails",
];
const TIMELINE_KEYS: &[&str] = &[
    "embedded",
    "height",
    "overlayVideo",
    "disableDockPadding",
    "positionTopInFullScreen",
    "scrubberAlwaysOn",
    "scrubberHeight",
    "scrubberColor",
];
const STATS_KEYS: &[&str] = &["host"];
const UX_CALLBACKS: &[&str] = &[
    "ssoAuthRequestHandle",
    "logoutRequestHandle",
    "getOneOnOneSessionInvite",
];
const PLAYER_CALLBACKS: &[&str] = &["mediaSrc", "mediaDetails"];

/// True for the fields that hold host functions (`ux.ssoAuthRequestHandle`,
/// `widgets[i].player.mediaSrc`, ...). Bindings that see host values use this
/// to keep functions out of the JSON tree.
pub fn is_callback_slot(path: &FieldPath) -> bool {
    match path.segments() {
        [Segment::Key(ux), Segment::Key(key)] => ux == "ux" && UX_CALLBACKS.contains(&key.as_str()),
        [Segment::Key(widgets), Segment::Index(_), Segment::Key(player), Segment::Key(key)] => {
            widgets == "widgets" && player == "player" && PLAYER_CALLBACKS.contains(&key.as_str())
        }
        _ => false,
    }
}

/// Walks a JSON tree, recording type problems against their field paths.
struct Decoder<'d> {
    diag: &'d mut Diagnostics,
}

impl Decoder<'_> {
    fn config(&mut self, value: &JsonValue) -> RawConfig {
        let root = FieldPath::root();
        let Some(obj) = value.as_object() else {
            self.diag.error(ConfigError::NotAnObject { path: root });
            return RawConfig::default();
        };
        self.unknown_keys(obj, CONFIG_KEYS, &root);

        RawConfig {
            client_id: self.string(obj, "clientId", &root),
            position: self.keyword(obj, "position", &root),
            phone_position: self.keyword(obj, "phonePosition", &root),
            relative_position_element: self.element(obj, "relativePositionElement", &root),
            align: self.nested(obj, "align", &root, |d, o, p| {
                d.unknown_keys(o, ALIGN_KEYS, p);
                RawAlign {
                    vertical: d.keyword(o, "vertical", p),
                    horizontal: d.keyword(o, "horizontal", p),
                }
            }),
            width: self.nested(obj, "width", &root, |d, o, p| {
                d.unknown_keys(o, WIDTH_KEYS, p);
                RawWidth {
                    max: d.number(o, "max", p),
                }
            }),
            margins: self.nested(obj, "margins", &root, |d, o, p| {
                d.unknown_keys(o, MARGIN_KEYS, p);
                Margins {
                    left: d.number(o, "left", p),
                    right: d.number(o, "right", p),
                    top: d.number(o, "top", p),
                    bottom: d.number(o, "bottom", p),
                }
            }),
            ux: self.nested(obj, "ux", &root, |d, o, p| d.ux(o, p)),
            locale: self.string(obj, "locale", &root),
            widgets: self.widgets(obj, &root),
            thread: self.nested(obj, "thread", &root, |d, o, p| {
                d.unknown_keys(o, THREAD_KEYS, p);
                RawThread {
                    show_replies: d.bool(o, "showReplies", p),
                    sort: d.keyword(o, "sort", p),
                }
            }),
            demo_mode: self.bool(obj, "demoMode", &root),
            launch_source: self.nested(obj, "launchSource", &root, |d, o, p| {
                d.unknown_keys(o, LAUNCH_KEYS, p);
                LaunchSource {
                    access_token: d.string(o, "accessToken", p),
                    consumer_key: d.string(o, "consumerKey", p),
                    origin: d.string(o, "origin", p),
                }
            }),
            features: self.nested(obj, "features", &root, |d, o, p| d.features(o, p)),
            help_url: self.string(obj, "helpUrl", &root),
            z_index: self.integer(obj, "zIndex", &root),
            fs_z_index: self.integer(obj, "fsZIndex", &root),
            open_on_load: self.bool(obj, "openOnLoad", &root),
        }
    }

    fn ux(&mut self, o: &Map<String, JsonValue>, p: &FieldPath) -> RawUx {
        self.unknown_keys(o, UX_KEYS, p);
        for key in UX_CALLBACKS {
            self.callback_as_data(o, key, p);
        }
        RawUx {
            comments_top_to_bottom: self.bool(o, "commentsTopToBottom", p),
            draggable_disabled: self.bool(o, "draggableDisabled", p),
            side_panel_layout: self.bool(o, "sidePanelLayout", p),
            side_panel_full_screen: self.bool(o, "sidePanelFullScreen", p),
            side_panel_full_screen_width: self.number(o, "sidePanelFullScreenWidth", p),
            side_panel_overlay: self.bool(o, "sidePanelOverlay", p),
            side_panel_overlay_width: self.number(o, "sidePanelOverlayWidth", p),
            open_on_load: self.bool(o, "openOnLoad", p),
            max_width: self.number(o, "maxWidth", p),
            pause_triggers: self.nested(o, "pauseTriggers", p, |d, o, p| {
                d.unknown_keys(o, PAUSE_KEYS, p);
                RawPauseTriggers {
                    form_open: d.bool(o, "formOpen", p),
                    auth_trigger: d.bool(o, "authTrigger", p),
                    widget_open_on_phone: d.bool(o, "widgetOpenOnPhone", p),
                    cta: d.bool(o, "cta", p),
                    timeline_ugc_tap: d.bool(o, "timelineUgcTap", p),
                }
            }),
            theme: self.keyword(o, "theme", p),
            sso_auth_request_handle: None,
            logout_request_handle: None,
            get_one_on_one_session_invite: None,
        }
    }

    fn features(&mut self, o: &Map<String, JsonValue>, p: &FieldPath) -> RawFeatures {
        let mut features = RawFeatures::default();
        for key in o.keys() {
            match Feature::from_key(key) {
                Some(feature) => {
                    if let Some(enabled) = self.bool(o, key, p) {
                        features.set(feature, enabled);
                    }
                }
                None => self
                    .diag
                    .warn(ConfigWarning::UnknownField { path: p.key(key) }),
            }
        }
        features
    }

    fn widgets(&mut self, obj: &Map<String, JsonValue>, root: &FieldPath) -> Option<Vec<RawWidget>> {
        let path = root.key("widgets");
        let value = present(obj, "widgets")?;
        let Some(items) = value.as_array() else {
            self.type_error(&path, "array", value);
            return None;
        };
        let mut widgets = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let p = path.index(i);
            let Some(o) = item.as_object() else {
                self.type_error(&p, "object", item);
                continue;
            };
            widgets.push(self.widget(o, &p));
        }
        Some(widgets)
    }

    fn widget(&mut self, o: &Map<String, JsonValue>, p: &FieldPath) -> RawWidget {
        self.unknown_keys(o, WIDGET_KEYS, p);
        RawWidget {
            player: self.nested(o, "player", p, |d, o, p| {
                d.unknown_keys(o, PLAYER_KEYS, p);
                for key in PLAYER_CALLBACKS {
                    d.callback_as_data(o, key, p);
                }
                RawPlayer {
                    kind: d.string(o, "type", p),
                    element: d.element(o, "element", p),
                    api: present(o, "api").cloned(),
                    wide: d.bool(o, "wide", p),
                    params: present(o, "params").cloned(),
                    media_src: None,
                    media_details: None,
                }
            }),
            timeline: self.nested(o, "timeline", p, |d, o, p| {
                d.unknown_keys(o, TIMELINE_KEYS, p);
                RawTimeline {
                    embedded: d.bool(o, "embedded", p),
                    height: d.number(o, "height", p),
                    overlay_video: d.bool(o, "overlayVideo", p),
                    disable_dock_padding: d.bool(o, "disableDockPadding", p),
                    position_top_in_full_screen: d.bool(o, "positionTopInFullScreen", p),
                    scrubber_always_on: d.bool(o, "scrubberAlwaysOn", p),
                    scrubber_height: d.number(o, "scrubberHeight", p),
                    scrubber_color: d.string(o, "scrubberColor", p),
                }
            }),
            open_on_load: self.bool(o, "openOnLoad", p),
            demo_discussion: self.string(o, "demoDiscussion", p),
            host: self.element(o, "host", p),
            stats: self.nested(o, "stats", p, |d, o, p| {
                d.unknown_keys(o, STATS_KEYS, p);
                RawStats {
                    host: d.element(o, "host", p),
                }
            }),
        }
    }

    fn nested<T>(
        &mut self,
        obj: &Map<String, JsonValue>,
        key: &str,
        parent: &FieldPath,
        decode: impl FnOnce(&mut Self, &Map<String, JsonValue>, &FieldPath) -> T,
    ) -> Option<T> {
        let value = present(obj, key)?;
        let path = parent.key(key);
        match value.as_object() {
            Some(o) => Some(decode(self, o, &path)),
            None => {
                self.type_error(&path, "object", value);
                None
            }
        }
    }

    fn bool(&mut self, obj: &Map<String, JsonValue>, key: &str, parent: &FieldPath) -> Option<bool> {
        let value = present(obj, key)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.type_error(&parent.key(key), "boolean", value);
                None
            }
        }
    }

    fn number(&mut self, obj: &Map<String, JsonValue>, key: &str, parent: &FieldPath) -> Option<f64> {
        let value = present(obj, key)?;
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.type_error(&parent.key(key), "number", value);
                None
            }
        }
    }

    fn integer(&mut self, obj: &Map<String, JsonValue>, key: &str, parent: &FieldPath) -> Option<i32> {
        let value = present(obj, key)?;
        let path = parent.key(key);
        if let Some(i) = value.as_i64() {
            return match i32::try_from(i) {
                Ok(i) => Some(i),
                Err(_) => {
                    self.diag.error(ConfigError::InvalidValue {
                        path,
                        reason: format!("{i} is out of range"),
                    });
                    None
                }
            };
        }
        // 100.0 is accepted as 100
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
                Some(f as i32)
            }
            Some(f) => {
                self.diag.error(ConfigError::InvalidValue {
                    path,
                    reason: format!("expected an integer, found {f}"),
                });
                None
            }
            None => {
                self.type_error(&path, "integer", value);
                None
            }
        }
    }

    fn string(&mut self, obj: &Map<String, JsonValue>, key: &str, parent: &FieldPath) -> Option<String> {
        let value = present(obj, key)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.type_error(&parent.key(key), "string", value);
                None
            }
        }
    }

    fn keyword<T: DeserializeOwned>(
        &mut self,
        obj: &Map<String, JsonValue>,
        key: &str,
        parent: &FieldPath,
    ) -> Option<T> {
        let value = present(obj, key)?;
        let path = parent.key(key);
        if !value.is_string() {
            self.type_error(&path, "string", value);
            return None;
        }
        match serde_json::from_value::<T>(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                self.diag.error(ConfigError::InvalidValue {
                    path,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn element(
        &mut self,
        obj: &Map<String, JsonValue>,
        key: &str,
        parent: &FieldPath,
    ) -> Option<ElementRef> {
        let value = present(obj, key)?;
        let path = parent.key(key);
        match value {
            JsonValue::String(_) | JsonValue::Object(_) => {
                match serde_json::from_value::<ElementRef>(value.clone()) {
                    Ok(element) if element.is_valid() => Some(element),
                    Ok(_) => {
                        self.diag.error(ConfigError::InvalidValue {
                            path,
                            reason: "selector must not be blank".to_string(),
                        });
                        None
                    }
                    Err(_) => {
                        self.diag.error(ConfigError::InvalidValue {
                            path,
                            reason: "expected a selector string or {\"handle\": <u32>}".to_string(),
                        });
                        None
                    }
                }
            }
            other => {
                self.type_error(&path, "element reference", other);
                None
            }
        }
    }

    /// Callbacks can only be attached from code; data in their slot is dropped.
    fn callback_as_data(&mut self, obj: &Map<String, JsonValue>, key: &str, parent: &FieldPath) {
        if present(obj, key).is_some() {
            self.diag.warn(ConfigWarning::IgnoredField {
                path: parent.key(key),
                reason: "callbacks cannot be supplied as data".to_string(),
            });
        }
    }

    fn unknown_keys(&mut self, obj: &Map<String, JsonValue>, known: &[&str], parent: &FieldPath) {
        for key in obj.keys() {
            if !known.contains(&key.as_str()) {
                self.diag.warn(ConfigWarning::UnknownField {
                    path: parent.key(key),
                });
            }
        }
    }

    fn type_error(&mut self, path: &FieldPath, expected: &'static str, found: &JsonValue) {
        self.diag.error(ConfigError::InvalidType {
            path: path.clone(),
            expected,
            found: json_kind(found),
        });
    }
}

fn present<'a>(obj: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    obj.get(key).filter(|v| !v.is_null())
}
