use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Side of the player (or screen) the widget is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// - `ElementEdge`: outside the player, right next to it
/// - `Inner`: overlay inside the player on its edge
/// - `ScreenEdge`: fixed on the screen edge instead of relative to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    ElementEdge,
    Inner,
    ScreenEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    MostRecent,
    TopRated,
    ByTimetag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Default,
    Dark,
}

/// How the widget is laid out relative to the player outside of full screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Draggable widget floating next to or over the player.
    #[default]
    Floating,
    /// Full player height, side by side with the player.
    SidePanel,
    /// Full player height on top of the player, never falls back to draggable.
    SidePanelOverlay,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Floating => "floating",
            LayoutMode::SidePanel => "side_panel",
            LayoutMode::SidePanelOverlay => "side_panel_overlay",
        }
    }

    pub fn is_side_panel(&self) -> bool {
        !matches!(self, LayoutMode::Floating)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a DOM element owned by the host page.
///
/// Selectors are resolved by the widget runtime at mount time; handles index
/// into a host-side element table (see the wasm binding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementRef {
    Selector(String),
    Handle { handle: u32 },
}

impl ElementRef {
    pub fn selector(s: impl Into<String>) -> Self {
        ElementRef::Selector(s.into())
    }

    pub fn handle(id: u32) -> Self {
        ElementRef::Handle { handle: id }
    }

    /// A selector must contain something other than whitespace.
    pub fn is_valid(&self) -> bool {
        match self {
            ElementRef::Selector(s) => !s.trim().is_empty(),
            ElementRef::Handle { .. } => true,
        }
    }
}

/// Offsets from the page edges. Only honored when the player is windowed, the
/// widget is not an overlay and the layout is not a side panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

impl Margins {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Media metadata exchanged with the `player.mediaDetails` callback.
///
/// Well known fields are typed; anything else the host adds is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl MediaDetails {
    /// Overlay the fields set in `other` on top of `self`.
    pub fn merged_with(mut self, other: MediaDetails) -> MediaDetails {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.thumbnail.is_some() {
            self.thumbnail = other.thumbnail;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
        self.extra.extend(other.extra);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_documented_keywords() {
        assert_eq!(json!(HorizontalAlign::ElementEdge), json!("element_edge"));
        assert_eq!(json!(SortBy::ByTimetag), json!("by_timetag"));
        let p: Position = serde_json::from_value(json!("left")).unwrap();
        assert_eq!(p, Position::Left);
        assert!(serde_json::from_value::<Theme>(json!("light")).is_err());
    }

    #[test]
    fn element_ref_json_forms() {
        let sel: ElementRef = serde_json::from_value(json!("#player")).unwrap();
        assert_eq!(sel, ElementRef::selector("#player"));
        let h: ElementRef = serde_json::from_value(json!({ "handle": 3 })).unwrap();
        assert_eq!(h, ElementRef::handle(3));
        assert_eq!(json!(ElementRef::handle(7)), json!({ "handle": 7 }));
        assert!(!ElementRef::selector("  ").is_valid());
    }

    #[test]
    fn media_details_merge_prefers_incoming_fields() {
        let base = MediaDetails {
            title: Some("Lecture 1".into()),
            author: Some("Dana".into()),
            ..Default::default()
        };
        let update: MediaDetails =
            serde_json::from_value(json!({ "title": "Lecture 1 (edited)", "group": "cs101" }))
                .unwrap();
        let merged = base.merged_with(update);
        assert_eq!(merged.title.as_deref(), Some("Lecture 1 (edited)"));
        assert_eq!(merged.author.as_deref(), Some("Dana"));
        assert_eq!(merged.extra.get("group"), Some(&json!("cs101")));
    }
}
