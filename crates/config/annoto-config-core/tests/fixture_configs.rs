use annoto_config::{
    normalize_json, normalize_str, ConfigWarning, ElementRef, HorizontalAlign, LayoutMode,
    Position, SortBy, Theme,
};
use annoto_test_fixtures::{configs, rejected};

#[test]
fn every_accepted_fixture_normalizes() {
    for name in configs::keys() {
        let value = configs::value(&name).expect("fixture loads");
        if let Err(errs) = normalize_json(&value) {
            panic!("fixture {name} was rejected: {errs}");
        }
    }
}

#[test]
fn every_rejected_fixture_names_its_fields() {
    for name in rejected::keys() {
        let value = rejected::value(&name).expect("fixture loads");
        let errs = match normalize_json(&value) {
            Ok(_) => panic!("fixture {name} was accepted"),
            Err(errs) => errs,
        };
        for path in rejected::expected_errors(&name).unwrap() {
            assert!(errs.mentions(&path), "{name}: expected error at {path}, got {errs}");
        }
    }
}

#[test]
fn full_fixture_keeps_explicit_values() {
    let text = configs::json("full").unwrap();
    let out = normalize_str(&text).unwrap();
    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    let cfg = out.config;

    assert_eq!(cfg.position, Position::Left);
    assert_eq!(cfg.phone_position, Position::Right);
    assert_eq!(cfg.align.horizontal, HorizontalAlign::ScreenEdge);
    assert_eq!(cfg.margins.bottom, Some(24.5));
    assert_eq!(cfg.margins.right, None);
    assert_eq!(cfg.ux.theme, Theme::Dark);
    assert_eq!(cfg.ux.max_width, 380.0);
    assert_eq!(cfg.ux.side_panel_full_screen_width, 420.0);
    assert!(!cfg.ux.pause_triggers.form_open);
    assert!(cfg.ux.pause_triggers.auth_trigger);
    assert_eq!(cfg.locale, "he");
    assert_eq!(cfg.thread.sort, SortBy::TopRated);
    assert!(cfg.thread.show_replies);
    assert!(cfg.features.stats && cfg.features.cta && !cfg.features.private_notes);
    assert_eq!(cfg.fs_z_index, i32::MAX);

    let widget = cfg.primary_widget().unwrap();
    assert_eq!(widget.player.element, Some(ElementRef::handle(1)));
    assert_eq!(widget.player.params.as_ref().unwrap()["entryId"], "1_abcd");
    assert_eq!(widget.timeline.height, Some(48.0));
    assert_eq!(widget.stats.as_ref().unwrap().host, ElementRef::selector("#stats-panel"));
    assert_eq!(
        cfg.launch_source.as_ref().unwrap().origin.as_deref(),
        Some("https://lms.example.edu")
    );
}

#[test]
fn overlay_fixture_uses_its_width() {
    let out = normalize_json(&configs::value("side-panel-overlay").unwrap()).unwrap();
    assert_eq!(out.config.ux.layout_mode, LayoutMode::SidePanelOverlay);
    assert_eq!(out.config.ux.side_panel_overlay_width, 300.0);
    assert!(!out.config.ux.open_on_load);
}

#[test]
fn deprecated_fixture_reports_each_alias_once() {
    let out = normalize_json(&configs::value("deprecated-aliases").unwrap()).unwrap();
    assert!(out.config.ux.open_on_load);
    assert_eq!(out.config.ux.max_width, 520.0);
    assert_eq!(out.config.widgets[0].timeline.height, Some(32.0));

    let rendered: Vec<String> = out.warnings.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "openOnLoad is deprecated, its value was moved to ux.openOnLoad",
            "width.max is deprecated, its value was moved to ux.maxWidth",
            "widgets[0].timeline.embedded is obsolete and its value is ignored",
        ]
    );
    assert!(out
        .warnings
        .iter()
        .all(|w| !matches!(w, ConfigWarning::UnknownField { .. })));
}
