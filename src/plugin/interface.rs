//! Plugin interface definition.
//!
//! Defines the interface plugins must implement and the base state every
//! plugin embeds.

use crate::core::{Error, Result};
use crate::monitoring::{LifecycleEventKind, LifecycleJournal};
use crate::plugin::registry::ExtensionRegistry;
use crate::plugin::wrapper::{PluginContext, PluginWrapper};
use std::collections::HashMap;
use std::sync::Arc;

/// Common state of every plugin: the host wrapper, its settings and the
/// journal.
///
/// The wrapper is held by shared reference and never modified.
#[derive(Clone, Debug)]
pub struct PluginBase {
    wrapper: Arc<PluginWrapper>,
    config: HashMap<String, serde_json::Value>,
    journal: LifecycleJournal,
}

impl PluginBase {
    /// Build the base from the host context.
    ///
    /// Fails with `Error::Initialization` when the wrapper is absent or
    /// carries no plugin id.
    pub fn new(ctx: &PluginContext) -> Result<Self> {
        let wrapper = ctx
            .wrapper
            .clone()
            .ok_or_else(|| Error::Initialization("no plugin wrapper supplied".to_string()))?;

        if wrapper.plugin_id().trim().is_empty() {
            return Err(Error::Initialization(
                "plugin wrapper has an empty plugin id".to_string(),
            ));
        }

        Ok(Self {
            wrapper,
            config: ctx.config.clone(),
            journal: ctx.journal.clone(),
        })
    }

    /// Host wrapper.
    pub fn wrapper(&self) -> &Arc<PluginWrapper> {
        &self.wrapper
    }

    /// Plugin ID.
    pub fn plugin_id(&self) -> &str {
        self.wrapper.plugin_id()
    }

    /// Plugin setting supplied by the host, if present and of type `T`.
    pub fn get_config<T: for<'de> serde::Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.config.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Journal shared with the host.
    pub fn journal(&self) -> &LifecycleJournal {
        &self.journal
    }

    /// Emit a lifecycle signal. The journal forwards it to the log stream.
    pub fn signal(&self, kind: LifecycleEventKind, message: &str) {
        self.journal.emit(self.plugin_id(), kind, message);
    }
}

/// Plugin trait that all plugins must implement.
///
/// Hooks are called by `PluginModule`, which enforces their order:
/// `start` once, then `stop` once.
pub trait Plugin: Send + Sync {
    /// Base state built from the host context.
    fn base(&self) -> &PluginBase;

    /// Host wrapper this plugin was constructed with.
    fn wrapper(&self) -> &Arc<PluginWrapper> {
        self.base().wrapper()
    }

    /// Plugin ID.
    fn plugin_id(&self) -> &str {
        self.base().plugin_id()
    }

    /// Called once when the host starts the plugin.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once when the host unloads the plugin. Releases whatever
    /// `start` acquired.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    /// Declare the extension bindings this plugin provides.
    fn register(&self, _registry: &mut ExtensionRegistry) -> Result<()> {
        Ok(())
    }
}
