//! Plugin manager configuration.
//!
//! Configuration-driven plugin selection.

use crate::core::{Error, Result};
use crate::monitoring::journal::DEFAULT_JOURNAL_CAPACITY;
use crate::monitoring::LogConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Plugin manager configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Plugins to load; empty means every catalog entry
    pub enabled: Vec<String>,
    /// Plugins never loaded, even when enabled
    pub disabled: Vec<String>,
    /// Executor used when a lookup names none
    pub default_executor: String,
    /// Lifecycle events kept in the journal
    pub journal_capacity: usize,
    /// Per-plugin settings, keyed by plugin ID
    pub plugins: HashMap<String, HashMap<String, serde_json::Value>>,
    /// Logging setup
    pub log: LogConfig,
}

impl ManagerConfig {
    /// Parse from JSON, filling defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Only load the given plugins.
    pub fn only(plugins: &[&str]) -> Self {
        Self {
            enabled: plugins.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Never load the given plugin.
    pub fn with_disabled(mut self, plugin: &str) -> Self {
        self.disabled.push(plugin.to_string());
        self
    }

    /// Set default executor.
    pub fn with_default_executor(mut self, name: &str) -> Self {
        self.default_executor = name.to_string();
        self
    }

    /// Set one setting handed to `plugin_id` at construction.
    pub fn with_plugin_setting(mut self, plugin_id: &str, key: &str, value: serde_json::Value) -> Self {
        self.plugins
            .entry(plugin_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self
    }

    /// Settings for one plugin; empty when none are configured.
    pub fn plugin_settings(&self, plugin_id: &str) -> HashMap<String, serde_json::Value> {
        self.plugins.get(plugin_id).cloned().unwrap_or_default()
    }

    /// Whether `plugin_id` should be loaded.
    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        if self.disabled.iter().any(|p| p == plugin_id) {
            return false;
        }
        self.enabled.is_empty() || self.enabled.iter().any(|p| p == plugin_id)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.journal_capacity == 0 {
            return Err(Error::Config("journal_capacity must be positive".to_string()));
        }
        if self.default_executor.trim().is_empty() {
            return Err(Error::Config("default_executor must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            enabled: Vec::new(),
            disabled: Vec::new(),
            default_executor: "awsbatch".to_string(),
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
            plugins: HashMap::new(),
            log: LogConfig::default(),
        }
    }
}
