use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, ConfigEntry>,
    rejected: HashMap<String, RejectedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Path(String),
    Detailed { path: String },
}

impl ConfigEntry {
    fn as_path(&self) -> &str {
        match self {
            ConfigEntry::Path(path) => path,
            ConfigEntry::Detailed { path } => path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RejectedEntry {
    path: String,
    /// Field paths the normalizer is expected to report.
    errors: Vec<String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Configurations that normalize successfully.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.configs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(entry.as_path())
    }

    pub fn value(name: &str) -> Result<serde_json::Value> {
        load(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.configs, "config", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.configs, "config", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

/// Configurations the normalizer must reject, with the paths it must name.
pub mod rejected {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.rejected.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn value(name: &str) -> Result<serde_json::Value> {
        let entry = lookup(&MANIFEST.rejected, "rejected config", name)?;
        super::load_json(&entry.path)
    }

    pub fn expected_errors(name: &str) -> Result<Vec<String>> {
        let entry = lookup(&MANIFEST.rejected, "rejected config", name)?;
        Ok(entry.errors.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_loads() {
        for name in configs::keys() {
            configs::value(&name).unwrap_or_else(|e| panic!("{name}: {e:#}"));
        }
        for name in rejected::keys() {
            rejected::value(&name).unwrap_or_else(|e| panic!("{name}: {e:#}"));
            assert!(!rejected::expected_errors(&name).unwrap().is_empty());
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = configs::json("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("unknown config fixture"));
    }
}
