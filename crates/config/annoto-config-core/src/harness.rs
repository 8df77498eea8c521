//! In-process stand-in for the widget runtime.
//!
//! `MockWidget` follows the public `Annoto` interface (`on`, `boot`) so host
//! integrations can be exercised without the real widget: booting normalizes
//! the configuration exactly as the runtime would and then emits `ready`.

use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::diagnostics::ConfigErrors;
use crate::events::{AnnotoEvent, AnnotoEventType};
use crate::normalize::{normalize_json_with, normalize_with, Normalized};
use crate::options::NormalizeOptions;
use crate::raw::RawConfig;

pub type Listener = Box<dyn FnMut(&AnnotoEvent) + Send>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigErrors),
    #[error("widget is already booted")]
    AlreadyBooted,
    #[error("widget is not booted")]
    NotBooted,
}

#[derive(Default)]
pub struct MockWidget {
    options: NormalizeOptions,
    listeners: Vec<(AnnotoEventType, Listener)>,
    booted: Option<Normalized>,
    emitted: Vec<AnnotoEvent>,
}

impl MockWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Register a callback for one event type. Callbacks run in registration order.
    pub fn on<F>(&mut self, kind: AnnotoEventType, listener: F)
    where
        F: FnMut(&AnnotoEvent) + Send + 'static,
    {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn boot(&mut self, raw: &RawConfig) -> Result<&Normalized, HarnessError> {
        if self.booted.is_some() {
            return Err(HarnessError::AlreadyBooted);
        }
        let normalized = normalize_with(raw, &self.options)?;
        Ok(self.finish_boot(normalized))
    }

    pub fn boot_json(&mut self, value: &JsonValue) -> Result<&Normalized, HarnessError> {
        if self.booted.is_some() {
            return Err(HarnessError::AlreadyBooted);
        }
        let normalized = normalize_json_with(value, &self.options)?;
        Ok(self.finish_boot(normalized))
    }

    fn finish_boot(&mut self, normalized: Normalized) -> &Normalized {
        log::debug!(
            "mock widget booted for client {}",
            normalized.config.client_id
        );
        let payload = json!({
            "clientId": normalized.config.client_id,
            "demoMode": normalized.config.demo_mode,
        });
        self.dispatch(AnnotoEvent::new(AnnotoEventType::Ready, payload));
        self.booted.insert(normalized)
    }

    /// Emit an event as the runtime would. Only valid after boot.
    pub fn emit(&mut self, kind: AnnotoEventType, payload: JsonValue) -> Result<(), HarnessError> {
        if self.booted.is_none() {
            return Err(HarnessError::NotBooted);
        }
        self.dispatch(AnnotoEvent::new(kind, payload));
        Ok(())
    }

    fn dispatch(&mut self, event: AnnotoEvent) {
        for (kind, listener) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(&event);
            }
        }
        self.emitted.push(event);
    }

    pub fn config(&self) -> Option<&Normalized> {
        self.booted.as_ref()
    }

    pub fn is_booted(&self) -> bool {
        self.booted.is_some()
    }

    /// Every event emitted so far, in order.
    pub fn emitted(&self) -> &[AnnotoEvent] {
        &self.emitted
    }
}
