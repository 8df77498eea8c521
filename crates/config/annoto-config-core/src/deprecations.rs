//! Deprecated field reconciliation.
//!
//! Each deprecated field is one row in a table. Adding a deprecation means
//! adding a row, the reconciliation loop stays the same.

use crate::diagnostics::{ConfigWarning, Diagnostics};
use crate::path::FieldPath;
use crate::raw::{RawConfig, RawUx};

/// A deprecated field whose value moves to a replacement field.
pub struct Alias<T: 'static> {
    pub old: &'static str,
    pub new: &'static str,
    /// Remove the deprecated value from the record.
    pub take_old: fn(&mut RawConfig) -> Option<T>,
    /// Slot of the replacement field, created if its parent is missing.
    pub new_slot: fn(&mut RawConfig) -> &mut Option<T>,
}

/// A deprecated field whose value is dropped.
pub struct Obsolete {
    pub path: &'static str,
    /// Remove every occurrence, returning its concrete path and whether the
    /// value differed from the field's historical default.
    pub take: fn(&mut RawConfig) -> Vec<(FieldPath, bool)>,
}

fn ux_slot(cfg: &mut RawConfig) -> &mut RawUx {
    cfg.ux.get_or_insert_with(RawUx::default)
}

pub const BOOL_ALIASES: &[Alias<bool>] = &[
    Alias {
        old: "openOnLoad",
        new: "ux.openOnLoad",
        take_old: take_top_level_open_on_load,
        new_slot: ux_open_on_load,
    },
    Alias {
        old: "widgets[0].openOnLoad",
        new: "ux.openOnLoad",
        take_old: take_widget_open_on_load,
        new_slot: ux_open_on_load,
    },
];

pub const NUMBER_ALIASES: &[Alias<f64>] = &[Alias {
    old: "width.max",
    new: "ux.maxWidth",
    take_old: take_width_max,
    new_slot: ux_max_width,
}];

pub const OBSOLETE: &[Obsolete] = &[Obsolete {
    path: "widgets[*].timeline.embedded",
    take: take_timeline_embedded,
}];

fn take_top_level_open_on_load(cfg: &mut RawConfig) -> Option<bool> {
    cfg.open_on_load.take()
}

fn take_widget_open_on_load(cfg: &mut RawConfig) -> Option<bool> {
    cfg.widgets
        .as_mut()
        .and_then(|w| w.first_mut())
        .and_then(|w| w.open_on_load.take())
}

fn ux_open_on_load(cfg: &mut RawConfig) -> &mut Option<bool> {
    &mut ux_slot(cfg).open_on_load
}

fn take_width_max(cfg: &mut RawConfig) -> Option<f64> {
    let max = cfg.width.as_mut().and_then(|w| w.max.take());
    // the width block has no other field
    cfg.width = None;
    max
}

fn ux_max_width(cfg: &mut RawConfig) -> &mut Option<f64> {
    &mut ux_slot(cfg).max_width
}

fn take_timeline_embedded(cfg: &mut RawConfig) -> Vec<(FieldPath, bool)> {
    let mut found = Vec::new();
    let Some(widgets) = cfg.widgets.as_mut() else {
        return found;
    };
    for (i, widget) in widgets.iter_mut().enumerate() {
        let embedded = widget.timeline.as_mut().and_then(|t| t.embedded.take());
        if let Some(embedded) = embedded {
            let path = FieldPath::root()
                .key("widgets")
                .index(i)
                .key("timeline")
                .key("embedded");
            found.push((path, embedded));
        }
    }
    found
}

fn reconcile_alias<T: 'static>(cfg: &mut RawConfig, alias: &Alias<T>, diag: &mut Diagnostics) {
    let Some(old_value) = (alias.take_old)(cfg) else {
        return;
    };
    let slot = (alias.new_slot)(cfg);
    let old = FieldPath::from(alias.old);
    let replacement = FieldPath::from(alias.new);
    if slot.is_some() {
        diag.warn(ConfigWarning::DeprecatedFieldIgnored { old, replacement });
    } else {
        *slot = Some(old_value);
        diag.warn(ConfigWarning::DeprecatedField { old, replacement });
    }
}

/// Move deprecated values to their replacements and drop obsolete fields.
///
/// Once this runs no deprecated field is left in `cfg`, so running it again
/// produces no warnings.
pub(crate) fn reconcile(cfg: &mut RawConfig, diag: &mut Diagnostics) {
    for alias in BOOL_ALIASES {
        reconcile_alias(cfg, alias, diag);
    }
    for alias in NUMBER_ALIASES {
        reconcile_alias(cfg, alias, diag);
    }
    for obsolete in OBSOLETE {
        for (path, non_default) in (obsolete.take)(cfg) {
            if non_default {
                diag.warn(ConfigWarning::ObsoleteField { path });
            } else {
                log::debug!("dropping {} (default value)", obsolete.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{RawTimeline, RawWidth};

    fn run(cfg: &mut RawConfig) -> Vec<ConfigWarning> {
        let mut diag = Diagnostics::default();
        reconcile(cfg, &mut diag);
        diag.warnings
    }

    #[test]
    fn old_value_moves_when_new_is_absent() {
        let mut cfg = RawConfig::new("c", "html5");
        cfg.width = Some(RawWidth { max: Some(500.0) });
        let warnings = run(&mut cfg);
        assert_eq!(cfg.ux.as_ref().unwrap().max_width, Some(500.0));
        assert!(cfg.width.is_none());
        assert_eq!(
            warnings,
            vec![ConfigWarning::DeprecatedField {
                old: "width.max".into(),
                replacement: "ux.maxWidth".into(),
            }]
        );
    }

    #[test]
    fn new_value_wins_when_both_present() {
        let mut cfg = RawConfig::new("c", "html5");
        cfg.open_on_load = Some(true);
        cfg.ux = Some(RawUx {
            open_on_load: Some(false),
            ..Default::default()
        });
        let warnings = run(&mut cfg);
        assert_eq!(cfg.ux.as_ref().unwrap().open_on_load, Some(false));
        assert!(matches!(warnings[..], [ConfigWarning::DeprecatedFieldIgnored { .. }]));
    }

    #[test]
    fn widget_level_alias_yields_to_top_level() {
        let mut cfg = RawConfig::new("c", "html5");
        cfg.open_on_load = Some(true);
        cfg.widgets.as_mut().unwrap()[0].open_on_load = Some(false);
        let warnings = run(&mut cfg);
        assert_eq!(cfg.ux.as_ref().unwrap().open_on_load, Some(true));
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[1], ConfigWarning::DeprecatedFieldIgnored { .. }));
    }

    #[test]
    fn embedded_timeline_is_dropped() {
        let mut cfg = RawConfig::new("c", "html5");
        cfg.widgets.as_mut().unwrap()[0].timeline = Some(RawTimeline {
            embedded: Some(true),
            height: Some(40.0),
            ..Default::default()
        });
        let warnings = run(&mut cfg);
        let timeline = cfg.widgets.as_ref().unwrap()[0].timeline.clone().unwrap();
        assert_eq!(timeline.embedded, None);
        assert_eq!(timeline.height, Some(40.0));
        assert_eq!(
            warnings,
            vec![ConfigWarning::ObsoleteField {
                path: "widgets[0].timeline.embedded".into()
            }]
        );
    }

    #[test]
    fn embedded_false_is_dropped_silently() {
        let mut cfg = RawConfig::new("c", "html5");
        cfg.widgets.as_mut().unwrap()[0].timeline = Some(RawTimeline {
            embedded: Some(false),
            ..Default::default()
        });
        assert!(run(&mut cfg).is_empty());
    }

    #[test]
    fn nothing_deprecated_leaves_ux_untouched() {
        let mut cfg = RawConfig::new("c", "html5");
        assert!(run(&mut cfg).is_empty());
        // the replacement slot is only created when an old value exists
        assert!(cfg.ux.is_none());
    }
}
