//! Host-owned plugin identity.
//!
//! `PluginWrapper` is created by the host for every loaded plugin and
//! shared read-only with the plugin through a `PluginContext`.

use crate::core::{now, LoadId, Timestamp};
use crate::monitoring::LifecycleJournal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Static plugin metadata, as found in a plugin manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin ID
    pub id: String,
    /// Version
    pub version: String,
    /// Provider / author
    #[serde(default)]
    pub provider: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Required host version
    #[serde(default)]
    pub requires: String,
}

impl PluginDescriptor {
    /// Create a new descriptor.
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            provider: String::new(),
            description: String::new(),
            requires: String::new(),
        }
    }

    /// Set provider.
    pub fn with_provider(mut self, provider: &str) -> Self {
        self.provider = provider.to_string();
        self
    }

    /// Set description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Set required host version.
    pub fn with_requires(mut self, requires: &str) -> Self {
        self.requires = requires.to_string();
        self
    }
}

/// Handle identifying one loaded plugin instance.
#[derive(Clone, Debug)]
pub struct PluginWrapper {
    descriptor: PluginDescriptor,
    load_id: LoadId,
    loaded_at: Timestamp,
    plugin_path: Option<PathBuf>,
}

impl PluginWrapper {
    /// Create a wrapper for a freshly loaded plugin.
    pub fn new(descriptor: PluginDescriptor) -> Self {
        Self {
            descriptor,
            load_id: LoadId::generate(),
            loaded_at: now(),
            plugin_path: None,
        }
    }

    /// Set the location the plugin was loaded from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_path = Some(path.into());
        self
    }

    /// Plugin ID.
    pub fn plugin_id(&self) -> &str {
        &self.descriptor.id
    }

    /// Plugin metadata.
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// Id of this load.
    pub fn load_id(&self) -> &LoadId {
        &self.load_id
    }

    /// When the host loaded the plugin.
    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    /// Where the plugin was loaded from, if known.
    pub fn plugin_path(&self) -> Option<&PathBuf> {
        self.plugin_path.as_ref()
    }
}

/// Everything the host hands a plugin at construction.
#[derive(Clone, Debug, Default)]
pub struct PluginContext {
    /// Wrapper supplied by the host
    pub wrapper: Option<Arc<PluginWrapper>>,
    /// Plugin configuration
    pub config: HashMap<String, serde_json::Value>,
    /// Journal lifecycle signals are recorded in
    pub journal: LifecycleJournal,
}

impl PluginContext {
    /// Create a context around a host wrapper.
    pub fn new(wrapper: Arc<PluginWrapper>, journal: LifecycleJournal) -> Self {
        Self {
            wrapper: Some(wrapper),
            config: HashMap::new(),
            journal,
        }
    }

    /// Get config value.
    pub fn get_config<T: for<'de> serde::Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.config.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set config value.
    pub fn set_config(&mut self, key: &str, value: serde_json::Value) {
        self.config.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let descriptor = PluginDescriptor::new("nf-amazon", "1.0.0")
            .with_provider("seqera")
            .with_description("AWS support")
            .with_requires(">=21.0");

        assert_eq!(descriptor.id, "nf-amazon");
        assert_eq!(descriptor.provider, "seqera");
        assert_eq!(descriptor.requires, ">=21.0");
    }

    #[test]
    fn test_descriptor_from_manifest_json() {
        let descriptor: PluginDescriptor =
            serde_json::from_str(r#"{"id":"nf-amazon","version":"1.2.0"}"#).unwrap();
        assert_eq!(descriptor, PluginDescriptor::new("nf-amazon", "1.2.0"));
    }

    #[test]
    fn test_wrapper_identity() {
        let descriptor = PluginDescriptor::new("nf-amazon", "1.0.0");
        let first = PluginWrapper::new(descriptor.clone()).with_path("/plugins/nf-amazon");
        let second = PluginWrapper::new(descriptor);

        assert_eq!(first.plugin_id(), "nf-amazon");
        assert_ne!(first.load_id(), second.load_id());
        assert!(first.plugin_path().is_some());
        assert!(second.plugin_path().is_none());
    }

    #[test]
    fn test_context_config() {
        let mut ctx = PluginContext::default();
        assert!(ctx.wrapper.is_none());

        ctx.set_config("region", serde_json::json!("eu-west-1"));
        let region: Option<String> = ctx.get_config("region");
        assert_eq!(region, Some("eu-west-1".to_string()));

        let missing: Option<u32> = ctx.get_config("region");
        assert_eq!(missing, None);
    }
}
