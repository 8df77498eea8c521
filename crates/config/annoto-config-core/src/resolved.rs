//! Fully resolved configuration handed to the widget runtime.
//!
//! Every field with a documented default holds a concrete value. Fields the
//! contract leaves without a default stay `Option`. The serialized form uses
//! the same field names as the input, so a resolved configuration is itself a
//! valid input.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::callbacks::{AuthHandler, InviteFn, MediaDetailsFn, MediaSrcFn};
use crate::features::Features;
use crate::raw::{
    RawAlign, RawConfig, RawPauseTriggers, RawPlayer, RawStats, RawThread, RawTimeline, RawUx,
    RawWidget,
};
use crate::types::{
    ElementRef, HorizontalAlign, LaunchSource, LayoutMode, Margins, Position, SortBy, Theme,
    VerticalAlign,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub client_id: String,
    pub position: Position,
    pub phone_position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_position_element: Option<ElementRef>,
    pub align: AlignConfig,
    pub margins: Margins,
    pub ux: UxConfig,
    pub locale: String,
    pub widgets: Vec<WidgetConfig>,
    pub thread: ThreadConfig,
    pub demo_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_source: Option<LaunchSource>,
    pub features: Features,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    pub z_index: i32,
    pub fs_z_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignConfig {
    pub vertical: VerticalAlign,
    pub horizontal: HorizontalAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UxConfig {
    pub comments_top_to_bottom: bool,
    pub draggable_disabled: bool,
    pub side_panel_layout: bool,
    pub side_panel_full_screen: bool,
    pub side_panel_full_screen_width: f64,
    pub side_panel_overlay: bool,
    pub side_panel_overlay_width: f64,
    pub open_on_load: bool,
    pub max_width: f64,
    pub pause_triggers: PauseTriggers,
    pub theme: Theme,
    /// Effective windowed layout, derived from the side panel flags.
    #[serde(skip)]
    pub layout_mode: LayoutMode,
    #[serde(skip)]
    pub sso_auth_request_handle: Option<AuthHandler>,
    #[serde(skip)]
    pub logout_request_handle: Option<AuthHandler>,
    #[serde(skip)]
    pub get_one_on_one_session_invite: Option<InviteFn>,
}

/// Triggers that pause the player. Never applied to live video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseTriggers {
    pub form_open: bool,
    pub auth_trigger: bool,
    pub widget_open_on_phone: bool,
    pub cta: bool,
    pub timeline_ugc_tap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadConfig {
    pub show_replies: bool,
    pub sort: SortBy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub player: PlayerConfig,
    pub timeline: TimelineConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_discussion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<ElementRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    #[serde(rename = "type")]
    pub kind: String,
    /// Selector strings are resolved by the runtime at mount time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<JsonValue>,
    pub wide: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonValue>,
    #[serde(skip)]
    pub media_src: Option<MediaSrcFn>,
    #[serde(skip)]
    pub media_details: Option<MediaDetailsFn>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_video: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_dock_padding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_top_in_full_screen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrubber_always_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrubber_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrubber_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsConfig {
    pub host: ElementRef,
}

/// Player/device state at the moment the runtime consumes the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutContext {
    pub player_fullscreen: bool,
    pub is_phone: bool,
}

impl ResolvedConfig {
    /// The behaviorally significant widget.
    pub fn primary_widget(&self) -> Option<&WidgetConfig> {
        self.widgets.first()
    }

    /// Side of the player to attach to on this device.
    pub fn effective_position(&self, ctx: LayoutContext) -> Position {
        if ctx.is_phone {
            self.phone_position
        } else {
            self.position
        }
    }

    /// True when the primary widget is mounted inside a host element.
    pub fn is_hosted(&self) -> bool {
        self.primary_widget().is_some_and(|w| w.host.is_some())
    }

    /// True when the widget is drawn on top of the player in this context.
    pub fn is_overlay(&self, ctx: LayoutContext) -> bool {
        if ctx.player_fullscreen {
            return !self.ux.side_panel_full_screen;
        }
        // a hosted widget lives in its host element, never over the player
        if self.is_hosted() {
            return false;
        }
        self.ux.layout_mode == LayoutMode::SidePanelOverlay
            || self.align.horizontal == HorizontalAlign::Inner
    }

    /// Margins apply only to a windowed, non-overlay, non side panel widget.
    pub fn effective_margins(&self, ctx: LayoutContext) -> Option<Margins> {
        if ctx.player_fullscreen || self.is_overlay(ctx) || self.ux.layout_mode.is_side_panel() {
            None
        } else {
            Some(self.margins)
        }
    }

    /// `ux.maxWidth` limits the widget only when it sits outside the player.
    pub fn effective_max_width(&self, ctx: LayoutContext) -> Option<f64> {
        if ctx.player_fullscreen || self.is_overlay(ctx) {
            None
        } else {
            Some(self.ux.max_width)
        }
    }

    pub fn effective_z_index(&self, ctx: LayoutContext) -> i32 {
        if ctx.player_fullscreen {
            self.fs_z_index
        } else {
            self.z_index
        }
    }

    /// Serialize to the camelCase JSON shape accepted as input.
    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }
}

/// Feed a resolved configuration back into the normalizer. Every value is
/// explicit and callbacks are kept, so normalizing the result reproduces `cfg`.
impl From<&ResolvedConfig> for RawConfig {
    fn from(cfg: &ResolvedConfig) -> Self {
        let ux = &cfg.ux;
        let triggers = ux.pause_triggers;
        RawConfig {
            client_id: Some(cfg.client_id.clone()),
            position: Some(cfg.position),
            phone_position: Some(cfg.phone_position),
            relative_position_element: cfg.relative_position_element.clone(),
            align: Some(RawAlign {
                vertical: Some(cfg.align.vertical),
                horizontal: Some(cfg.align.horizontal),
            }),
            width: None,
            margins: Some(cfg.margins),
            ux: Some(RawUx {
                comments_top_to_bottom: Some(ux.comments_top_to_bottom),
                draggable_disabled: Some(ux.draggable_disabled),
                side_panel_layout: Some(ux.side_panel_layout),
                side_panel_full_screen: Some(ux.side_panel_full_screen),
                side_panel_full_screen_width: Some(ux.side_panel_full_screen_width),
                side_panel_overlay: Some(ux.side_panel_overlay),
                side_panel_overlay_width: Some(ux.side_panel_overlay_width),
                open_on_load: Some(ux.open_on_load),
                max_width: Some(ux.max_width),
                pause_triggers: Some(RawPauseTriggers {
                    form_open: Some(triggers.form_open),
                    auth_trigger: Some(triggers.auth_trigger),
                    widget_open_on_phone: Some(triggers.widget_open_on_phone),
                    cta: Some(triggers.cta),
                    timeline_ugc_tap: Some(triggers.timeline_ugc_tap),
                }),
                theme: Some(ux.theme),
                sso_auth_request_handle: ux.sso_auth_request_handle.clone(),
                logout_request_handle: ux.logout_request_handle.clone(),
                get_one_on_one_session_invite: ux.get_one_on_one_session_invite.clone(),
            }),
            locale: Some(cfg.locale.clone()),
            widgets: Some(cfg.widgets.iter().map(RawWidget::from).collect()),
            thread: Some(RawThread {
                show_replies: Some(cfg.thread.show_replies),
                sort: Some(cfg.thread.sort),
            }),
            demo_mode: Some(cfg.demo_mode),
            launch_source: cfg.launch_source.clone(),
            features: Some(cfg.features.into()),
            help_url: cfg.help_url.clone(),
            z_index: Some(cfg.z_index),
            fs_z_index: Some(cfg.fs_z_index),
            open_on_load: None,
        }
    }
}

impl From<&WidgetConfig> for RawWidget {
    fn from(widget: &WidgetConfig) -> Self {
        let player = &widget.player;
        let timeline = &widget.timeline;
        RawWidget {
            player: Some(RawPlayer {
                kind: Some(player.kind.clone()),
                element: player.element.clone(),
                api: player.api.clone(),
                wide: Some(player.wide),
                params: player.params.clone(),
                media_src: player.media_src.clone(),
                media_details: player.media_details.clone(),
            }),
            timeline: Some(RawTimeline {
                embedded: None,
                height: timeline.height,
                overlay_video: timeline.overlay_video,
                disable_dock_padding: timeline.disable_dock_padding,
                position_top_in_full_screen: timeline.position_top_in_full_screen,
                scrubber_always_on: timeline.scrubber_always_on,
                scrubber_height: timeline.scrubber_height,
                scrubber_color: timeline.scrubber_color.clone(),
            }),
            open_on_load: None,
            demo_discussion: widget.demo_discussion.clone(),
            host: widget.host.clone(),
            stats: widget.stats.as_ref().map(|s| RawStats {
                host: Some(s.host.clone()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_json;
    use serde_json::json;

    fn resolve(extra: JsonValue) -> ResolvedConfig {
        let mut cfg = json!({
            "clientId": "c",
            "demoMode": false,
            "align": { "horizontal": "inner" },
            "margins": { "top": 8 },
            "widgets": [{ "player": { "type": "html5" } }]
        });
        for (k, v) in extra.as_object().unwrap() {
            cfg[k.as_str()] = v.clone();
        }
        normalize_json(&cfg).unwrap().config
    }

    #[test]
    fn hosted_widget_is_not_an_overlay() {
        let windowed = LayoutContext::default();
        let inner = resolve(json!({}));
        assert!(inner.is_overlay(windowed));
        assert_eq!(inner.effective_max_width(windowed), None);

        let hosted = resolve(json!({
            "widgets": [{ "player": { "type": "html5" }, "host": "#discussion" }]
        }));
        assert!(hosted.is_hosted());
        assert!(!hosted.is_overlay(windowed));
        assert_eq!(hosted.effective_max_width(windowed), Some(460.0));
        assert_eq!(hosted.effective_margins(windowed).unwrap().top, Some(8.0));
    }

    #[test]
    fn raw_round_trip_is_fully_explicit() {
        let cfg = resolve(json!({ "features": { "cta": true } }));
        let raw = RawConfig::from(&cfg);
        assert_eq!(raw.ux.as_ref().unwrap().max_width, Some(460.0));
        assert_eq!(raw.features.unwrap().cta, Some(true));
        assert_eq!(raw.open_on_load, None);
        assert_eq!(raw.width, None);
    }
}
