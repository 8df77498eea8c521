//! FieldPath parsing and formatting.
//!
//! Grammar (mirrors how the widget documentation names fields):
//!   key(.key | [index])*
//! - '.' separates object keys
//! - `[n]` selects an element of an ordered sequence
//!   Examples:
//!   "clientId" -> [Key("clientId")]
//!   "ux.pauseTriggers.formOpen" -> [Key("ux"), Key("pauseTriggers"), Key("formOpen")]
//!   "widgets[0].stats.host" -> [Key("widgets"), Index(0), Key("stats"), Key("host")]
//!
//! Every diagnostic produced by the normalizer carries one of these so hosts
//! can point operators at the offending field.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty field path")]
    Empty,
    #[error("invalid field path '{path}': {reason}")]
    Invalid { path: String, reason: &'static str },
}

impl FieldPath {
    /// The path of the configuration root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a new path with an object key appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// Return a new path with a sequence index appended.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Last object key on the path, if the path ends in one.
    pub fn leaf_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Key(k)) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let invalid = |reason| PathError::Invalid {
            path: s.to_string(),
            reason,
        };
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }

        let mut segments = Vec::new();
        for part in s.split('.') {
            // "widgets[0][1]" splits into the key and its index selectors
            let (key, mut rest) = match part.find('[') {
                Some(i) => (&part[..i], &part[i..]),
                None => (part, ""),
            };
            if key.is_empty() {
                return Err(invalid("empty key segment"));
            }
            segments.push(Segment::Key(key.to_string()));
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed index"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("index is not a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after index"));
                }
            }
        }
        Ok(Self { segments })
    }

    /// Look up the value at this path inside a JSON document.
    pub fn lookup<'a>(&self, root: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match segment {
                Segment::Key(k) => node.get(k.as_str()),
                Segment::Index(i) => node.get(*i),
            })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => f.write_str(k)?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl From<&str> for FieldPath {
    /// Build a path from a literal known to be well formed.
    ///
    /// Falls back to a single key segment holding the raw text when parsing fails.
    fn from(s: &str) -> Self {
        FieldPath::parse(s).unwrap_or_else(|_| FieldPath {
            segments: vec![Segment::Key(s.to_string())],
        })
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D>(deserializer: D) -> Result<FieldPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FieldPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_with_index() {
        let p = FieldPath::parse("widgets[0].stats.host").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("widgets".into()),
                Segment::Index(0),
                Segment::Key("stats".into()),
                Segment::Key("host".into()),
            ]
        );
        assert_eq!(p.to_string(), "widgets[0].stats.host");
        assert_eq!(p.leaf_key(), Some("host"));
    }

    #[test]
    fn builders_match_parse() {
        let built = FieldPath::root().key("ux").key("pauseTriggers").key("cta");
        assert_eq!(built, FieldPath::parse("ux.pauseTriggers.cta").unwrap());
        assert_eq!(FieldPath::root().key("widgets").index(2).to_string(), "widgets[2]");
    }

    #[test]
    fn root_displays_marker() {
        assert!(FieldPath::root().is_root());
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(FieldPath::parse(""), Err(PathError::Empty));
        assert!(FieldPath::parse("ux..theme").is_err());
        assert!(FieldPath::parse("widgets[x]").is_err());
        assert!(FieldPath::parse("widgets[0").is_err());
        assert!(FieldPath::parse("widgets[0]x").is_err());
        assert!(FieldPath::parse("client id").is_err());
    }

    #[test]
    fn lookup_walks_json() {
        let doc = serde_json::json!({ "widgets": [{ "player": { "type": "html5" } }] });
        let p = FieldPath::parse("widgets[0].player.type").unwrap();
        assert_eq!(p.lookup(&doc), Some(&serde_json::json!("html5")));
        assert!(FieldPath::parse("widgets[1]").unwrap().lookup(&doc).is_none());
    }
}
