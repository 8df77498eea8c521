//! Normalizer options and documented default values.

use serde::{Deserialize, Serialize};

use crate::features::Features;
use crate::types::{HorizontalAlign, Position, SortBy, Theme, VerticalAlign};

pub const DEFAULT_POSITION: Position = Position::Right;
pub const DEFAULT_VERTICAL_ALIGN: VerticalAlign = VerticalAlign::Center;
pub const DEFAULT_HORIZONTAL_ALIGN: HorizontalAlign = HorizontalAlign::ElementEdge;
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_Z_INDEX: i32 = 100;
pub const DEFAULT_FS_Z_INDEX: i32 = 100;
/// Pixels.
pub const DEFAULT_MAX_WIDTH: f64 = 460.0;
/// Pixels, shared by the full screen and overlay side panels.
pub const DEFAULT_SIDE_PANEL_WIDTH: f64 = 370.0;
pub const DEFAULT_THEME: Theme = Theme::Default;
pub const DEFAULT_SORT: SortBy = SortBy::MostRecent;
pub const DEFAULT_PAUSE_TRIGGER: bool = true;

/// Which side panel mode wins when both `ux.sidePanelOverlay` and
/// `ux.sidePanelLayout` are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePanelPrecedence {
    /// Overlay is always full height and never falls back, so it overrides layout.
    #[default]
    OverlayWins,
    LayoutWins,
}

/// Knobs for [`normalize_with`](crate::normalize::normalize_with).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub side_panel_precedence: SidePanelPrecedence,
    /// Values used for toggles the host leaves unset.
    pub feature_defaults: Features,
    /// Report keys the decoder does not recognize.
    pub warn_unknown_fields: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            side_panel_precedence: SidePanelPrecedence::default(),
            feature_defaults: Features::default(),
            warn_unknown_fields: true,
        }
    }
}
