//! The normalization pipeline: raw configuration in, resolved configuration
//! plus warnings out.
//!
//! Stages, in order:
//!  1. required fields (`clientId`, `widgets`, `demoMode`), fail fast
//!  2. deprecated alias reconciliation
//!  3. documented defaults, applied on absence only
//!  4. side panel mode resolution (mode dependent `openOnLoad` default)
//!  5. cross-field dependencies (`features.stats` needs `widgets[0].stats.host`)
//!  6. player binding validation
//!
//! Stages 5 and 6 report every problem they find before failing.

use serde_json::Value as JsonValue;

use crate::deprecations;
use crate::diagnostics::{ConfigError, ConfigErrors, ConfigWarning, Diagnostics};
use crate::features::{Feature, Features};
use crate::options::{
    NormalizeOptions, SidePanelPrecedence, DEFAULT_FS_Z_INDEX, DEFAULT_HORIZONTAL_ALIGN,
    DEFAULT_LOCALE, DEFAULT_MAX_WIDTH, DEFAULT_PAUSE_TRIGGER, DEFAULT_POSITION,
    DEFAULT_SIDE_PANEL_WIDTH, DEFAULT_SORT, DEFAULT_THEME, DEFAULT_VERTICAL_ALIGN, DEFAULT_Z_INDEX,
};
use crate::path::FieldPath;
use crate::raw::{Decoded, RawConfig, RawPlayer, RawUx, RawWidget};
use crate::resolved::{
    AlignConfig, PauseTriggers, PlayerConfig, ResolvedConfig, StatsConfig, ThreadConfig,
    TimelineConfig, UxConfig, WidgetConfig,
};
use crate::types::LayoutMode;

/// A resolved configuration and the warnings produced while resolving it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub config: ResolvedConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Normalize with the default [`NormalizeOptions`].
pub fn normalize(raw: &RawConfig) -> Result<Normalized, ConfigErrors> {
    normalize_with(raw, &NormalizeOptions::default())
}

/// Decode untrusted JSON and normalize it.
pub fn normalize_json(value: &JsonValue) -> Result<Normalized, ConfigErrors> {
    normalize_json_with(value, &NormalizeOptions::default())
}

/// Parse a JSON document and normalize it.
pub fn normalize_str(json: &str) -> Result<Normalized, ConfigErrors> {
    normalize_decoded(RawConfig::from_json_str(json)?, &NormalizeOptions::default())
}

pub fn normalize_json_with(
    value: &JsonValue,
    opts: &NormalizeOptions,
) -> Result<Normalized, ConfigErrors> {
    normalize_decoded(RawConfig::from_json(value)?, opts)
}

fn normalize_decoded(decoded: Decoded, opts: &NormalizeOptions) -> Result<Normalized, ConfigErrors> {
    let mut normalized = normalize_with(&decoded.config, opts)?;
    let decode_warnings = decoded
        .warnings
        .into_iter()
        .filter(|w| opts.warn_unknown_fields || !matches!(w, ConfigWarning::UnknownField { .. }));
    // decode warnings come first, they describe the input as written
    let mut warnings: Vec<ConfigWarning> = decode_warnings.collect();
    warnings.append(&mut normalized.warnings);
    normalized.warnings = warnings;
    Ok(normalized)
}

/// Run the full pipeline. The input is not modified.
pub fn normalize_with(raw: &RawConfig, opts: &NormalizeOptions) -> Result<Normalized, ConfigErrors> {
    let mut diag = Diagnostics::default();

    log::debug!("normalize: checking required fields");
    let required = check_required(raw, &mut diag).ok_or_else(|| fail(&mut diag))?;

    log::debug!("normalize: reconciling deprecated fields");
    let mut work = raw.clone();
    deprecations::reconcile(&mut work, &mut diag);

    log::debug!("normalize: applying defaults");
    let features = opts.feature_defaults.resolve(&work.features.unwrap_or_default());
    let ux_raw = work.ux.clone().unwrap_or_default();

    log::debug!("normalize: resolving side panel mode");
    let ux = resolve_ux(&ux_raw, opts.side_panel_precedence, &mut diag);

    log::debug!("normalize: checking dependencies");
    let widgets_raw = work.widgets.as_deref().unwrap_or_default();
    check_stats_dependency(widgets_raw, &features, &mut diag);

    log::debug!("normalize: validating player bindings");
    for (i, widget) in widgets_raw.iter().enumerate() {
        validate_player(widget, &FieldPath::root().key("widgets").index(i), &mut diag);
    }
    if diag.has_errors() {
        return Err(fail(&mut diag));
    }

    let widgets = widgets_raw
        .iter()
        .enumerate()
        .map(|(i, w)| resolve_widget(w, i, &mut diag))
        .collect();

    let position = work.position.unwrap_or(DEFAULT_POSITION);
    let align = work.align.unwrap_or_default();
    let thread = work.thread.unwrap_or_default();
    let config = ResolvedConfig {
        client_id: required.client_id,
        position,
        phone_position: work.phone_position.unwrap_or(position),
        relative_position_element: work.relative_position_element,
        align: AlignConfig {
            vertical: align.vertical.unwrap_or(DEFAULT_VERTICAL_ALIGN),
            horizontal: align.horizontal.unwrap_or(DEFAULT_HORIZONTAL_ALIGN),
        },
        margins: work.margins.unwrap_or_default(),
        ux,
        locale: work.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        widgets,
        thread: ThreadConfig {
            show_replies: thread.show_replies.unwrap_or(false),
            sort: thread.sort.unwrap_or(DEFAULT_SORT),
        },
        demo_mode: required.demo_mode,
        launch_source: work.launch_source,
        features,
        help_url: work.help_url,
        z_index: work.z_index.unwrap_or(DEFAULT_Z_INDEX),
        fs_z_index: work.fs_z_index.unwrap_or(DEFAULT_FS_Z_INDEX),
    };

    log::debug!(
        "normalize: resolved config for client {} with {} warning(s)",
        config.client_id,
        diag.warnings.len()
    );
    Ok(Normalized {
        config,
        warnings: diag.warnings,
    })
}

struct Required {
    client_id: String,
    demo_mode: bool,
}

fn fail(diag: &mut Diagnostics) -> ConfigErrors {
    diag.take_errors().unwrap_or_else(|| {
        ConfigErrors::single(ConfigError::InvalidValue {
            path: FieldPath::root(),
            reason: "normalization failed without a diagnostic".to_string(),
        })
    })
}

fn check_required(raw: &RawConfig, diag: &mut Diagnostics) -> Option<Required> {
    let root = FieldPath::root();
    match raw.client_id.as_deref() {
        None => diag.error(ConfigError::MissingField {
            path: root.key("clientId"),
        }),
        Some(id) if id.trim().is_empty() => diag.error(ConfigError::EmptyField {
            path: root.key("clientId"),
        }),
        Some(_) => {}
    }
    match raw.widgets.as_deref() {
        None => diag.error(ConfigError::MissingField {
            path: root.key("widgets"),
        }),
        Some([]) => diag.error(ConfigError::EmptyField {
            path: root.key("widgets"),
        }),
        Some(_) => {}
    }
    if raw.demo_mode.is_none() {
        diag.error(ConfigError::MissingField {
            path: root.key("demoMode"),
        });
    }
    if diag.has_errors() {
        return None;
    }
    Some(Required {
        client_id: raw.client_id.clone()?,
        demo_mode: raw.demo_mode?,
    })
}

fn resolve_ux(raw: &RawUx, precedence: SidePanelPrecedence, diag: &mut Diagnostics) -> UxConfig {
    let overlay = raw.side_panel_overlay.unwrap_or(false);
    let layout = raw.side_panel_layout.unwrap_or(false);

    let layout_mode = match (overlay, layout) {
        (true, true) => {
            let kept = match precedence {
                SidePanelPrecedence::OverlayWins => LayoutMode::SidePanelOverlay,
                SidePanelPrecedence::LayoutWins => LayoutMode::SidePanel,
            };
            diag.warn(ConfigWarning::AmbiguousSidePanelMode { kept });
            kept
        }
        (true, false) => LayoutMode::SidePanelOverlay,
        (false, true) => LayoutMode::SidePanel,
        (false, false) => LayoutMode::Floating,
    };
    // a side panel next to the player opens on load, an overlay does not
    let open_on_load_default = layout_mode == LayoutMode::SidePanel;

    let triggers = raw.pause_triggers.unwrap_or_default();
    UxConfig {
        comments_top_to_bottom: raw.comments_top_to_bottom.unwrap_or(false),
        draggable_disabled: raw.draggable_disabled.unwrap_or(false),
        side_panel_layout: layout_mode == LayoutMode::SidePanel,
        side_panel_full_screen: raw.side_panel_full_screen.unwrap_or(false),
        side_panel_full_screen_width: raw
            .side_panel_full_screen_width
            .unwrap_or(DEFAULT_SIDE_PANEL_WIDTH),
        side_panel_overlay: layout_mode == LayoutMode::SidePanelOverlay,
        side_panel_overlay_width: raw
            .side_panel_overlay_width
            .unwrap_or(DEFAULT_SIDE_PANEL_WIDTH),
        open_on_load: raw.open_on_load.unwrap_or(open_on_load_default),
        max_width: raw.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
        pause_triggers: PauseTriggers {
            form_open: triggers.form_open.unwrap_or(DEFAULT_PAUSE_TRIGGER),
            auth_trigger: triggers.auth_trigger.unwrap_or(DEFAULT_PAUSE_TRIGGER),
            widget_open_on_phone: triggers.widget_open_on_phone.unwrap_or(DEFAULT_PAUSE_TRIGGER),
            cta: triggers.cta.unwrap_or(DEFAULT_PAUSE_TRIGGER),
            timeline_ugc_tap: triggers.timeline_ugc_tap.unwrap_or(DEFAULT_PAUSE_TRIGGER),
        },
        theme: raw.theme.unwrap_or(DEFAULT_THEME),
        layout_mode,
        sso_auth_request_handle: raw.sso_auth_request_handle.clone(),
        logout_request_handle: raw.logout_request_handle.clone(),
        get_one_on_one_session_invite: raw.get_one_on_one_session_invite.clone(),
    }
}

fn check_stats_dependency(widgets: &[RawWidget], features: &Features, diag: &mut Diagnostics) {
    if !features.is_enabled(Feature::Stats) {
        return;
    }
    let host_path = FieldPath::root()
        .key("widgets")
        .index(0)
        .key("stats")
        .key("host");
    let has_host = widgets
        .first()
        .and_then(|w| w.stats.as_ref())
        .and_then(|s| s.host.as_ref())
        .is_some_and(|h| h.is_valid());
    if !has_host {
        diag.error(ConfigError::MissingDependency {
            path: host_path,
            required_by: FieldPath::root().key("features").key(Feature::Stats.key()),
        });
    }
}

fn validate_player(widget: &RawWidget, path: &FieldPath, diag: &mut Diagnostics) {
    let player_path = path.key("player");
    match widget.player.as_ref() {
        None => diag.error(ConfigError::MissingField { path: player_path }),
        Some(RawPlayer { kind: None, .. }) => diag.error(ConfigError::MissingField {
            path: player_path.key("type"),
        }),
        Some(RawPlayer {
            kind: Some(kind), ..
        }) if kind.trim().is_empty() => diag.error(ConfigError::EmptyField {
            path: player_path.key("type"),
        }),
        Some(_) => {}
    }
}

/// Build a resolved widget. Only called after [`validate_player`] passed.
fn resolve_widget(raw: &RawWidget, index: usize, diag: &mut Diagnostics) -> WidgetConfig {
    let player = raw.player.clone().unwrap_or_default();
    let timeline = raw.timeline.clone().unwrap_or_default();

    let widget_path = FieldPath::root().key("widgets").index(index);
    // widgets[0].openOnLoad was already moved to ux.openOnLoad
    if raw.open_on_load.is_some() {
        diag.warn(ConfigWarning::IgnoredField {
            path: widget_path.key("openOnLoad"),
            reason: "only the first widget's openOnLoad is honored, use ux.openOnLoad".to_string(),
        });
    }

    let stats = match raw.stats.as_ref() {
        Some(stats) => match stats.host.clone() {
            Some(host) => Some(StatsConfig { host }),
            None => {
                diag.warn(ConfigWarning::IgnoredField {
                    path: widget_path.key("stats"),
                    reason: "stats.host is missing".to_string(),
                });
                None
            }
        },
        None => None,
    };

    WidgetConfig {
        player: PlayerConfig {
            kind: player.kind.unwrap_or_default(),
            element: player.element,
            api: player.api,
            wide: player.wide.unwrap_or(false),
            params: player.params,
            media_src: player.media_src,
            media_details: player.media_details,
        },
        timeline: TimelineConfig {
            height: timeline.height,
            overlay_video: timeline.overlay_video,
            disable_dock_padding: timeline.disable_dock_padding,
            position_top_in_full_screen: timeline.position_top_in_full_screen,
            scrubber_always_on: timeline.scrubber_always_on,
            scrubber_height: timeline.scrubber_height,
            scrubber_color: timeline.scrubber_color,
        },
        demo_discussion: raw.demo_discussion.clone(),
        host: raw.host.clone(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawStats, RawUx};
    use crate::types::ElementRef;

    #[test]
    fn required_fields_fail_fast() {
        let errs = normalize(&RawConfig::default()).unwrap_err();
        let paths: Vec<String> = errs.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["clientId", "widgets", "demoMode"]);
    }

    #[test]
    fn blank_client_id_is_empty_field() {
        let mut raw = RawConfig::new("   ", "html5");
        raw.demo_mode = Some(true);
        let errs = normalize(&raw).unwrap_err();
        assert!(matches!(errs[0], ConfigError::EmptyField { .. }));
    }

    #[test]
    fn input_is_not_modified() {
        let mut raw = RawConfig::new("c", "html5");
        raw.open_on_load = Some(true);
        let before = raw.clone();
        normalize(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn layout_wins_when_configured() {
        let mut raw = RawConfig::new("c", "html5");
        raw.ux = Some(RawUx {
            side_panel_layout: Some(true),
            side_panel_overlay: Some(true),
            ..Default::default()
        });
        let opts = NormalizeOptions {
            side_panel_precedence: SidePanelPrecedence::LayoutWins,
            ..Default::default()
        };
        let out = normalize_with(&raw, &opts).unwrap();
        assert_eq!(out.config.ux.layout_mode, LayoutMode::SidePanel);
        assert!(out.config.ux.open_on_load);
        assert!(!out.config.ux.side_panel_overlay);
        assert_eq!(
            out.warnings,
            vec![ConfigWarning::AmbiguousSidePanelMode {
                kept: LayoutMode::SidePanel
            }]
        );
    }

    #[test]
    fn stats_default_from_options_requires_host() {
        let raw = RawConfig::new("c", "html5");
        let mut opts = NormalizeOptions::default();
        opts.feature_defaults.stats = true;
        let errs = normalize_with(&raw, &opts).unwrap_err();
        assert!(errs.mentions("widgets[0].stats.host"));
    }

    #[test]
    fn stats_block_without_host_is_dropped_when_disabled() {
        let mut raw = RawConfig::new("c", "html5");
        raw.widgets.as_mut().unwrap()[0].stats = Some(RawStats { host: None });
        let out = normalize(&raw).unwrap();
        assert!(out.config.widgets[0].stats.is_none());
        assert!(matches!(out.warnings[..], [ConfigWarning::IgnoredField { .. }]));
    }

    #[test]
    fn stats_host_is_carried() {
        let mut raw = RawConfig::new("c", "html5");
        let mut features = crate::features::RawFeatures::default();
        features.set(Feature::Stats, true);
        raw.features = Some(features);
        raw.widgets.as_mut().unwrap()[0].stats = Some(RawStats {
            host: Some(ElementRef::selector("#stats")),
        });
        let out = normalize(&raw).unwrap();
        assert_eq!(
            out.config.widgets[0].stats,
            Some(StatsConfig {
                host: ElementRef::selector("#stats")
            })
        );
    }

    #[test]
    fn every_widget_needs_a_player_type() {
        let mut raw = RawConfig::new("c", "html5");
        let widgets = raw.widgets.as_mut().unwrap();
        widgets.push(RawWidget::default());
        widgets.push(RawWidget {
            player: Some(RawPlayer::of_type("")),
            ..Default::default()
        });
        let errs = normalize(&raw).unwrap_err();
        assert!(errs.mentions("widgets[1].player"));
        assert!(errs.mentions("widgets[2].player.type"));
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn text_input_shares_the_decoder() {
        let errs = normalize_str("{ \"clientId\": ").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].path().is_root());
        assert!(errs[0].to_string().contains("config json parse error"));

        let out = normalize_str(r#"{ "clientId": "c", "demoMode": true, "extra": 1,
            "widgets": [{ "player": { "type": "html5" } }] }"#)
        .unwrap();
        assert!(matches!(out.warnings[0], ConfigWarning::UnknownField { .. }));
    }
}
