use annoto_config::{normalize_json, LayoutContext, Margins, Position, ResolvedConfig};
use serde_json::json;

fn resolve(ux: serde_json::Value, extra: serde_json::Value) -> ResolvedConfig {
    let mut cfg = json!({
        "clientId": "c",
        "demoMode": false,
        "position": "left",
        "phonePosition": "right",
        "margins": { "left": 16 },
        "zIndex": 10,
        "fsZIndex": 20,
        "ux": ux,
        "widgets": [{ "player": { "type": "html5" } }]
    });
    for (k, v) in extra.as_object().unwrap() {
        cfg[k.as_str()] = v.clone();
    }
    normalize_json(&cfg).unwrap().config
}

const WINDOWED: LayoutContext = LayoutContext {
    player_fullscreen: false,
    is_phone: false,
};
const FULLSCREEN: LayoutContext = LayoutContext {
    player_fullscreen: true,
    is_phone: false,
};

#[test]
fn margins_apply_to_floating_windowed_widget_only() {
    let floating = resolve(json!({}), json!({}));
    assert_eq!(
        floating.effective_margins(WINDOWED),
        Some(Margins {
            left: Some(16.0),
            ..Default::default()
        })
    );
    assert_eq!(floating.effective_margins(FULLSCREEN), None);

    let side_panel = resolve(json!({ "sidePanelLayout": true }), json!({}));
    assert_eq!(side_panel.effective_margins(WINDOWED), None);

    let inner = resolve(json!({}), json!({ "align": { "horizontal": "inner" } }));
    assert_eq!(inner.effective_margins(WINDOWED), None);
    // the resolved record itself is untouched
    assert_eq!(inner.margins.left, Some(16.0));
}

#[test]
fn max_width_ignored_for_overlay_and_fullscreen() {
    let floating = resolve(json!({ "maxWidth": 400 }), json!({}));
    assert_eq!(floating.effective_max_width(WINDOWED), Some(400.0));
    assert_eq!(floating.effective_max_width(FULLSCREEN), None);

    let overlay = resolve(json!({ "sidePanelOverlay": true }), json!({}));
    assert_eq!(overlay.effective_max_width(WINDOWED), None);

    let fs_panel = resolve(json!({ "sidePanelFullScreen": true }), json!({}));
    assert_eq!(fs_panel.effective_max_width(WINDOWED), Some(460.0));
    assert!(!fs_panel.is_overlay(FULLSCREEN));
    assert!(floating.is_overlay(FULLSCREEN));
}

#[test]
fn z_index_and_position_follow_context() {
    let cfg = resolve(json!({}), json!({}));
    assert_eq!(cfg.effective_z_index(WINDOWED), 10);
    assert_eq!(cfg.effective_z_index(FULLSCREEN), 20);
    assert_eq!(cfg.effective_position(WINDOWED), Position::Left);
    assert_eq!(
        cfg.effective_position(LayoutContext {
            is_phone: true,
            ..WINDOWED
        }),
        Position::Right
    );
}
