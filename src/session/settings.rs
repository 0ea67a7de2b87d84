//! Namespaced key-value settings, with an in-memory store and a YAML file
//! store under `~/.backbeat/settings.yaml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::config::SessionConfig;
use crate::error::{GrooveError, Result};

/// Namespace used for the engine's own settings.
pub const NAMESPACE: &str = "backbeat";
const LAST_CONFIG_KEY: &str = "last_config";

type Namespaces = BTreeMap<String, BTreeMap<String, String>>;

/// Host-provided persistent settings.
pub trait SettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Option<String>;
    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: Namespaces,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.values.get(namespace)?.get(key).cloned()
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.values
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Default path for the settings file.
pub fn default_settings_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".backbeat");
    path.push("settings.yaml");
    path
}

/// Settings persisted to a YAML file on every write.
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    path: PathBuf,
    values: Namespaces,
}

impl YamlSettingsStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                Namespaces::new()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            Namespaces::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&default_settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&self.values)?;
        std::fs::write(&self.path, yaml)?;
        Ok(())
    }
}

impl SettingsStore for YamlSettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.values.get(namespace)?.get(key).cloned()
    }

    fn set(&mut self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.values
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Store `config` as the last used settings.
pub fn remember_config(store: &mut dyn SettingsStore, config: &SessionConfig) -> Result<()> {
    store.set(NAMESPACE, LAST_CONFIG_KEY, &config.to_yaml()?)
}

/// The last remembered settings, if any.
pub fn recall_config(store: &dyn SettingsStore) -> Result<Option<SessionConfig>> {
    match store.get(NAMESPACE, LAST_CONFIG_KEY) {
        None => Ok(None),
        Some(text) => SessionConfig::from_yaml(&text)
            .map(Some)
            .map_err(|e| GrooveError::Settings(format!("stored config is unreadable: {e}"))),
    }
}
