//! annoto-config: the configuration contract of the embeddable Annoto widget.
//!
//! Hosts hand the widget an `AnnotoConfig` at boot. This crate decodes that
//! value ([`RawConfig`]), validates it, reconciles deprecated fields, applies
//! the documented defaults and produces an immutable [`ResolvedConfig`] plus
//! warnings, or a list of blocking [`ConfigError`]s.
//!
//! ```
//! use annoto_config::{normalize_json, Theme};
//!
//! let out = normalize_json(&serde_json::json!({
//!     "clientId": "my-client",
//!     "demoMode": false,
//!     "widgets": [{ "player": { "type": "html5", "element": "#video" } }]
//! }))
//! .unwrap();
//! assert_eq!(out.config.ux.theme, Theme::Default);
//! assert_eq!(out.config.z_index, 100);
//! assert!(out.warnings.is_empty());
//! ```

pub mod callbacks;
pub mod deprecations;
pub mod diagnostics;
pub mod events;
pub mod features;
pub mod harness;
pub mod normalize;
pub mod options;
pub mod path;
pub mod raw;
pub mod resolved;
pub mod types;

pub use callbacks::{Callback, CallbackError, Completion};
pub use diagnostics::{ConfigError, ConfigErrors, ConfigWarning, DiagnosticRecord};
pub use events::{AnnotoEvent, AnnotoEventType};
pub use features::{Feature, Features, RawFeatures};
pub use harness::{HarnessError, MockWidget};
pub use normalize::{
    normalize, normalize_json, normalize_json_with, normalize_str, normalize_with, Normalized,
};
pub use options::{NormalizeOptions, SidePanelPrecedence};
pub use path::FieldPath;
pub use raw::{Decoded, RawConfig};
pub use resolved::{LayoutContext, ResolvedConfig};
pub use types::{
    ElementRef, HorizontalAlign, LayoutMode, Margins, MediaDetails, Position, SortBy, Theme,
    VerticalAlign,
};
