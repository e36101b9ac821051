//! Overridable tool descriptions.
//!
//! Every user-facing description goes through [`Translator::translate`] with a
//! key and an English default. Lookup order:
//!
//! 1. Environment variable `K8S_MCP_<KEY>`
//! 2. `k8s-mcp-server-config.json` in the working directory (flat `{"KEY": "text"}`)
//! 3. The default
//!
//! Resolved values are recorded so `--export-translations` can write a complete
//! file for operators to edit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

/// File read at startup and written by `--export-translations`.
pub const TRANSLATIONS_FILE: &str = "k8s-mcp-server-config.json";

const ENV_PREFIX: &str = "K8S_MCP_";

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read translations from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse translations in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write translations to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize translations: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct Inner {
    overrides: BTreeMap<String, String>,
    read_env: bool,
    used: Mutex<BTreeMap<String, String>>,
}

/// Description lookup shared by all resource handlers. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    inner: Arc<Inner>,
}

impl Translator {
    /// Always returns the defaults. Used by tests.
    pub fn null() -> Self {
        Self::default()
    }

    /// Fixed overrides, no environment lookup.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self::build(overrides, false)
    }

    /// Environment variables plus `k8s-mcp-server-config.json` when present.
    pub fn from_environment() -> Result<Self, TranslationError> {
        let path = Path::new(TRANSLATIONS_FILE);
        let overrides = if path.is_file() {
            let overrides = load_file(path)?;
            debug!(path = %path.display(), count = overrides.len(), "Loaded translations");
            overrides
        } else {
            BTreeMap::new()
        };
        Ok(Self::build(overrides, true))
    }

    fn build(overrides: BTreeMap<String, String>, read_env: bool) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        Self {
            inner: Arc::new(Inner {
                overrides,
                read_env,
                used: Mutex::default(),
            }),
        }
    }

    pub fn translate(&self, key: &str, default: &str) -> String {
        let key = key.to_uppercase();
        let env_value = if self.inner.read_env {
            std::env::var(format!("{ENV_PREFIX}{key}")).ok()
        } else {
            None
        };
        let value = env_value
            .or_else(|| self.inner.overrides.get(&key).cloned())
            .unwrap_or_else(|| default.to_string());

        self.inner
            .used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.clone());
        value
    }

    /// Every key resolved so far with its value.
    pub fn translations(&self) -> BTreeMap<String, String> {
        self.inner
            .used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write resolved translations as pretty JSON.
    pub fn dump_to(&self, path: &Path) -> Result<(), TranslationError> {
        let json = serde_json::to_string_pretty(&self.translations())?;
        std::fs::write(path, json).map_err(|source| TranslationError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Exported translations");
        Ok(())
    }

    /// Write resolved translations to `k8s-mcp-server-config.json` in the working directory.
    pub fn dump(&self) -> Result<PathBuf, TranslationError> {
        let path = PathBuf::from(TRANSLATIONS_FILE);
        self.dump_to(&path)?;
        Ok(path)
    }
}

fn load_file(path: &Path) -> Result<BTreeMap<String, String>, TranslationError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TranslationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| TranslationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_null_translator_returns_defaults() {
        let t = Translator::null();
        assert_eq!(t.translate("TOOL_GET_POD_DESCRIPTION", "Get a pod"), "Get a pod");
        assert_eq!(
            t.translations().get("TOOL_GET_POD_DESCRIPTION").map(String::as_str),
            Some("Get a pod")
        );
    }

    #[test]
    fn test_overrides_match_keys_case_insensitively() {
        let t = Translator::with_overrides(BTreeMap::from([(
            "tool_get_pod_description".to_string(),
            "Fetch one pod".to_string(),
        )]));
        assert_eq!(t.translate("TOOL_GET_POD_DESCRIPTION", "Get a pod"), "Fetch one pod");
    }

    #[test]
    #[serial]
    fn test_environment_wins_over_file_values() {
        std::env::set_var("K8S_MCP_TOOL_LIST_NODES_DESCRIPTION", "Nodes, from env");
        let t = Translator::build(
            BTreeMap::from([(
                "TOOL_LIST_NODES_DESCRIPTION".to_string(),
                "Nodes, from file".to_string(),
            )]),
            true,
        );
        let value = t.translate("TOOL_LIST_NODES_DESCRIPTION", "List nodes");
        std::env::remove_var("K8S_MCP_TOOL_LIST_NODES_DESCRIPTION");
        assert_eq!(value, "Nodes, from env");
    }

    #[test]
    fn test_dump_writes_sorted_json() {
        let t = Translator::null();
        t.translate("B_KEY", "b");
        t.translate("A_KEY", "a");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSLATIONS_FILE);
        t.dump_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.find("A_KEY").unwrap() < written.find("B_KEY").unwrap());
        let parsed = load_file(&path).unwrap();
        assert_eq!(parsed.get("A_KEY").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_load_file_rejects_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSLATIONS_FILE);
        std::fs::write(&path, r#"{"KEY": 1}"#).unwrap();
        assert!(matches!(
            load_file(&path),
            Err(TranslationError::Parse { .. })
        ));
    }
}
