//! Diagnostics produced by decoding and normalization.
//!
//! Two tiers: [`ConfigError`] blocks boot, [`ConfigWarning`] is informational
//! and travels alongside a resolved configuration.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::path::FieldPath;
use crate::types::LayoutMode;

/// Blocking problem with a configuration. Normalization yields no result when
/// any of these is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{path}: required field is missing")]
    MissingField { path: FieldPath },
    #[error("{path}: must not be empty")]
    EmptyField { path: FieldPath },
    #[error("{path}: expected {expected}, found {found}")]
    InvalidType {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{path}: {reason}")]
    InvalidValue { path: FieldPath, reason: String },
    #[error("{path}: required when {required_by} is enabled")]
    MissingDependency {
        path: FieldPath,
        required_by: FieldPath,
    },
    #[error("{path}: configuration must be an object")]
    NotAnObject { path: FieldPath },
}

impl ConfigError {
    pub fn path(&self) -> &FieldPath {
        match self {
            ConfigError::MissingField { path }
            | ConfigError::EmptyField { path }
            | ConfigError::InvalidType { path, .. }
            | ConfigError::InvalidValue { path, .. }
            | ConfigError::MissingDependency { path, .. }
            | ConfigError::NotAnObject { path } => path,
        }
    }
}

/// Non-blocking notice about a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    #[error("{old} is deprecated, its value was moved to {replacement}")]
    DeprecatedField {
        old: FieldPath,
        replacement: FieldPath,
    },
    #[error("{old} is deprecated and ignored because {replacement} is set")]
    DeprecatedFieldIgnored {
        old: FieldPath,
        replacement: FieldPath,
    },
    #[error("{path} is obsolete and its value is ignored")]
    ObsoleteField { path: FieldPath },
    #[error("ux.sidePanelOverlay and ux.sidePanelLayout are both enabled, using {kept}")]
    AmbiguousSidePanelMode { kept: LayoutMode },
    #[error("{path} is not a known configuration field")]
    UnknownField { path: FieldPath },
    #[error("{path} is ignored: {reason}")]
    IgnoredField { path: FieldPath, reason: String },
}

impl ConfigWarning {
    /// Field the warning is about, if it concerns a single field.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            ConfigWarning::DeprecatedField { old, .. }
            | ConfigWarning::DeprecatedFieldIgnored { old, .. } => Some(old),
            ConfigWarning::ObsoleteField { path }
            | ConfigWarning::UnknownField { path }
            | ConfigWarning::IgnoredField { path, .. } => Some(path),
            ConfigWarning::AmbiguousSidePanelMode { .. } => None,
        }
    }
}

/// Non-empty ordered list of blocking errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// Wrap a list of errors. Returns `None` for an empty list.
    pub fn new(errors: Vec<ConfigError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn single(error: ConfigError) -> Self {
        Self(vec![error])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when some error names exactly `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path().to_string() == path)
    }

    pub fn into_vec(self) -> Vec<ConfigError> {
        self.0
    }
}

impl std::ops::Deref for ConfigErrors {
    type Target = [ConfigError];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for ConfigErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration ({} error", self.0.len())?;
        if self.0.len() != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Flat, serializable form of a diagnostic for hosts that log or display them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub path: Option<String>,
    pub message: String,
}

impl From<&ConfigError> for DiagnosticRecord {
    fn from(err: &ConfigError) -> Self {
        Self {
            path: Some(err.path().to_string()),
            message: err.to_string(),
        }
    }
}

impl From<&ConfigWarning> for DiagnosticRecord {
    fn from(warning: &ConfigWarning) -> Self {
        Self {
            path: warning.path().map(ToString::to_string),
            message: warning.to_string(),
        }
    }
}

/// Accumulates diagnostics while a configuration is decoded or normalized.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<ConfigWarning>,
}

impl Diagnostics {
    pub fn error(&mut self, error: ConfigError) {
        log::debug!("config error: {error}");
        self.errors.push(error);
    }

    pub fn warn(&mut self, warning: ConfigWarning) {
        log::debug!("config warning: {warning}");
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drain collected errors, if any.
    pub fn take_errors(&mut self) -> Option<ConfigErrors> {
        ConfigErrors::new(std::mem::take(&mut self.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_path() {
        let err = ConfigError::MissingDependency {
            path: FieldPath::parse("widgets[0].stats.host").unwrap(),
            required_by: FieldPath::parse("features.stats").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "widgets[0].stats.host: required when features.stats is enabled"
        );
    }

    #[test]
    fn errors_list_renders_every_entry() {
        let errs = ConfigErrors::new(vec![
            ConfigError::MissingField {
                path: "clientId".into(),
            },
            ConfigError::EmptyField {
                path: "widgets".into(),
            },
        ])
        .unwrap();
        let text = errs.to_string();
        assert!(text.starts_with("invalid configuration (2 errors)"));
        assert!(text.contains("clientId: required field is missing"));
        assert!(errs.mentions("widgets"));
        assert!(!errs.mentions("demoMode"));
    }

    #[test]
    fn empty_error_list_is_not_a_failure() {
        assert!(ConfigErrors::new(Vec::new()).is_none());
    }
}
