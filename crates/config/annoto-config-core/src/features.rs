//! Feature toggles (`features.*`).
//!
//! The declarations leave each toggle's default to the widget runtime, so the
//! defaults live in a table ([`Features`]) supplied through
//! [`NormalizeOptions`](crate::options::NormalizeOptions).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! feature_table {
    ($( $variant:ident, $field:ident, $key:literal, $default:literal; )+) => {
        /// One toggle of the `features` block.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Feature {
            $( $variant, )+
        }

        impl Feature {
            pub const ALL: &'static [Feature] = &[ $( Feature::$variant, )+ ];

            /// Key of the toggle inside the `features` object.
            pub fn key(&self) -> &'static str {
                match self {
                    $( Feature::$variant => $key, )+
                }
            }

            pub fn from_key(key: &str) -> Option<Feature> {
                match key {
                    $( $key => Some(Feature::$variant), )+
                    _ => None,
                }
            }
        }

        /// Partially specified toggles as supplied by the host.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct RawFeatures {
            $( pub $field: Option<bool>, )+
        }

        impl RawFeatures {
            pub fn get(&self, feature: Feature) -> Option<bool> {
                match feature {
                    $( Feature::$variant => self.$field, )+
                }
            }

            pub fn set(&mut self, feature: Feature, enabled: bool) {
                match feature {
                    $( Feature::$variant => self.$field = Some(enabled), )+
                }
            }
        }

        /// Fully resolved toggles.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct Features {
            $( pub $field: bool, )+
        }

        impl Features {
            pub fn is_enabled(&self, feature: Feature) -> bool {
                match feature {
                    $( Feature::$variant => self.$field, )+
                }
            }

            pub fn set(&mut self, feature: Feature, enabled: bool) {
                match feature {
                    $( Feature::$variant => self.$field = enabled, )+
                }
            }

            /// Fill every toggle missing from `raw` with the value in `self`.
            pub fn resolve(&self, raw: &RawFeatures) -> Features {
                Features {
                    $( $field: raw.$field.unwrap_or(self.$field), )+
                }
            }
        }

        impl From<Features> for RawFeatures {
            fn from(features: Features) -> Self {
                RawFeatures {
                    $( $field: Some(features.$field), )+
                }
            }
        }

        impl Default for Features {
            fn default() -> Self {
                Features {
                    $( $field: $default, )+
                }
            }
        }
    };
}

feature_table! {
    Comments, comments, "comments", true;
    PrivateNotes, private_notes, "privateNotes", true;
    Tabs, tabs, "tabs", true;
    CommentsSubmit, comments_submit, "commentsSubmit", true;
    PrivateNotesSubmit, private_notes_submit, "privateNotesSubmit", true;
    UserPreferences, user_preferences, "userPreferences", true;
    DarkTheme, dark_theme, "darkTheme", false;
    Cta, cta, "cta", false;
    ThreadVote, thread_vote, "threadVote", true;
    VoteEmotions, vote_emotions, "voteEmotions", true;
    CommentSentiment, comment_sentiment, "commentSentiment", true;
    Minibar, minibar, "minibar", true;
    Timeline, timeline, "timeline", true;
    Stats, stats, "stats", false;
    Popout, popout, "popout", false;
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_key(feature.key()), Some(*feature));
        }
        assert_eq!(Feature::ALL.len(), 15);
        assert_eq!(Feature::from_key("unknown"), None);
    }

    #[test]
    fn resolve_keeps_explicit_false() {
        let mut raw = RawFeatures::default();
        raw.set(Feature::Comments, false);
        let resolved = Features::default().resolve(&raw);
        assert!(!resolved.comments);
        assert!(resolved.private_notes);
        assert!(!resolved.stats);
    }

    #[test]
    fn serde_names_match_keys() {
        let json = serde_json::to_value(Features::default()).unwrap();
        let obj = json.as_object().unwrap();
        for feature in Feature::ALL {
            assert!(obj.contains_key(feature.key()), "missing {}", feature.key());
        }
    }
}
