//! Events the widget runtime emits to host callbacks.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotoEventType {
    /// Widget booted; payload is the runtime API handle.
    Ready,
    Metadata,
    Ux,
    StatsEvents,
    VideoBenchmark,
}

impl AnnotoEventType {
    pub const ALL: [AnnotoEventType; 5] = [
        AnnotoEventType::Ready,
        AnnotoEventType::Metadata,
        AnnotoEventType::Ux,
        AnnotoEventType::StatsEvents,
        AnnotoEventType::VideoBenchmark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotoEventType::Ready => "ready",
            AnnotoEventType::Metadata => "metadata",
            AnnotoEventType::Ux => "ux",
            AnnotoEventType::StatsEvents => "stats_events",
            AnnotoEventType::VideoBenchmark => "video_benchmark",
        }
    }
}

impl fmt::Display for AnnotoEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotoEventType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnnotoEventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event type '{s}'"))
    }
}

/// An emitted event. Payload shapes belong to the runtime and are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotoEvent {
    pub kind: AnnotoEventType,
    #[serde(default)]
    pub payload: JsonValue,
}

impl AnnotoEvent {
    pub fn new(kind: AnnotoEventType, payload: JsonValue) -> Self {
        Self { kind, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in AnnotoEventType::ALL {
            assert_eq!(kind.as_str().parse::<AnnotoEventType>(), Ok(kind));
            assert_eq!(serde_json::json!(kind), serde_json::json!(kind.as_str()));
        }
        assert!("click".parse::<AnnotoEventType>().is_err());
    }

    #[test]
    fn event_payload_defaults_to_null() {
        let ev: AnnotoEvent = serde_json::from_str(r#"{ "kind": "ux" }"#).unwrap();
        assert_eq!(ev.kind, AnnotoEventType::Ux);
        assert!(ev.payload.is_null());
    }
}
