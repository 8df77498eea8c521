//! Host-supplied callbacks carried by the configuration.
//!
//! The normalizer never calls these; it only moves them from the raw record
//! into the resolved one. The widget runtime decides when to invoke them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::types::MediaDetails;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, CallbackError>> + Send + 'static>>;

/// Failure reported by a deferred callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CallbackError(pub String);

/// Result of a host callback: either available immediately or completed later.
pub enum Completion<T> {
    Ready(T),
    Deferred(BoxFuture<T>),
}

impl<T: Send + 'static> Completion<T> {
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T, CallbackError>> + Send + 'static,
    {
        Completion::Deferred(Box::pin(fut))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Completion::Ready(_))
    }

    /// Await the value regardless of which variant was returned.
    pub async fn resolve(self) -> Result<T, CallbackError> {
        match self {
            Completion::Ready(v) => Ok(v),
            Completion::Deferred(fut) => fut.await,
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Ready(_) => f.write_str("Completion::Ready(..)"),
            Completion::Deferred(_) => f.write_str("Completion::Deferred(..)"),
        }
    }
}

/// Shared handle to a host function. Equality is identity of the function.
pub struct Callback<A, R> {
    inner: Arc<dyn Fn(A) -> R + Send + Sync>,
}

impl<A, R> Callback<A, R> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, arg: A) -> R {
        (self.inner)(arg)
    }
}

impl<A, R> Clone for Callback<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> PartialEq for Callback<A, R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, R> fmt::Debug for Callback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// `ux.ssoAuthRequestHandle` / `ux.logoutRequestHandle`.
pub type AuthHandler = Callback<(), Completion<()>>;
/// `player.mediaSrc`: current media source of the player.
pub type MediaSrcFn = Callback<(), String>;
/// `player.mediaDetails`: returns details, optionally merged with the ones passed in.
pub type MediaDetailsFn = Callback<Option<MediaDetails>, Completion<MediaDetails>>;
/// `ux.getOneOnOneSessionInvite`.
pub type InviteFn = Callback<OneOnOneSessionInviteParams, Completion<OneOnOneSessionInvite>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOnOneSessionInviteParams {
    pub author_id: String,
    pub invited_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOnOneSessionInvite {
    pub invite_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_button: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_compare_by_identity() {
        let a: MediaSrcFn = Callback::new(|_| "https://cdn/v.mp4".to_string());
        let b = a.clone();
        let c: MediaSrcFn = Callback::new(|_| "https://cdn/v.mp4".to_string());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.call(()), "https://cdn/v.mp4");
    }

    #[test]
    fn media_details_handler_can_answer_synchronously() {
        let handler: MediaDetailsFn = Callback::new(|incoming: Option<MediaDetails>| {
            let own = MediaDetails {
                title: Some("Intro".into()),
                ..Default::default()
            };
            Completion::Ready(incoming.unwrap_or_default().merged_with(own))
        });
        match handler.call(None) {
            Completion::Ready(details) => assert_eq!(details.title.as_deref(), Some("Intro")),
            other => panic!("expected ready completion, got {other:?}"),
        }
    }

    #[test]
    fn deferred_completion_is_not_ready() {
        let handler: AuthHandler = Callback::new(|_| Completion::deferred(async { Ok(()) }));
        assert!(!handler.call(()).is_ready());
    }

    #[test]
    fn invite_result_uses_camel_case() {
        let invite: OneOnOneSessionInvite = serde_json::from_value(serde_json::json!({
            "inviteUrl": "https://meet/abc",
            "inviteButton": "Join"
        }))
        .unwrap();
        assert_eq!(invite.invite_button.as_deref(), Some("Join"));
        assert!(invite.title.is_none());
    }
}
