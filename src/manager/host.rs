//! Plugin manager.
//!
//! Reference host: loads catalog entries, drives their lifecycle and
//! resolves executors through the extension registry.

use crate::core::{Error, Result};
use crate::executor::{Executor, ExecutorType};
use crate::manager::config::ManagerConfig;
use crate::monitoring::{init_tracing, LifecycleJournal};
use crate::plugin::{
    builtin_plugins, ExtensionRegistry, PluginContext, PluginEntry, PluginModule, PluginState,
    PluginWrapper,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Plugin manager.
pub struct PluginManager {
    /// Configuration
    config: ManagerConfig,
    /// Loadable plugins
    catalog: Vec<PluginEntry>,
    /// Loaded modules, in load order
    modules: Vec<PluginModule>,
    /// Extensions of started plugins
    registry: ExtensionRegistry,
    /// Executors instantiated so far, by name
    executors: RwLock<HashMap<String, Arc<dyn Executor>>>,
    /// Lifecycle journal shared with every plugin
    journal: LifecycleJournal,
}

impl PluginManager {
    /// Create a manager over the built-in plugins.
    pub fn new(config: ManagerConfig) -> Result<Self> {
        Self::with_catalog(config, builtin_plugins())
    }

    /// Create a manager over a custom catalog.
    pub fn with_catalog(config: ManagerConfig, catalog: Vec<PluginEntry>) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        for entry in &catalog {
            if !seen.insert(entry.id().to_string()) {
                return Err(Error::DuplicatePlugin(entry.id().to_string()));
            }
        }

        let journal = LifecycleJournal::with_capacity(config.journal_capacity);
        Ok(Self {
            config,
            catalog,
            modules: Vec::new(),
            registry: ExtensionRegistry::new(),
            executors: RwLock::new(HashMap::new()),
            journal,
        })
    }

    /// Install the global tracing subscriber described by `config.log`.
    ///
    /// Returns `false` if the process already has a subscriber.
    pub fn install_logging(&self) -> bool {
        init_tracing(&self.config.log)
    }

    /// Construct every enabled catalog entry.
    ///
    /// Returns the number of newly loaded plugins.
    pub fn load_plugins(&mut self) -> Result<usize> {
        let mut loaded = 0;
        for entry in &self.catalog {
            if !self.config.is_enabled(entry.id()) {
                tracing::debug!(plugin = %entry.id(), "plugin disabled by configuration");
                continue;
            }
            if self.modules.iter().any(|m| m.plugin_id() == entry.id()) {
                return Err(Error::DuplicatePlugin(entry.id().to_string()));
            }

            let wrapper = Arc::new(PluginWrapper::new(entry.descriptor.clone()));
            let mut ctx = PluginContext::new(wrapper, self.journal.clone());
            ctx.config = self.config.plugin_settings(entry.id());
            let module = PluginModule::construct(entry, &ctx)?;

            tracing::info!(
                plugin = %entry.id(),
                version = %entry.descriptor.version,
                "plugin loaded"
            );
            self.modules.push(module);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Start every loaded module, then collect its extensions.
    ///
    /// Returns the number of modules started.
    pub fn start_plugins(&mut self) -> Result<usize> {
        let mut started = 0;
        for module in self.modules.iter_mut() {
            if module.state() != &PluginState::Unloaded {
                continue;
            }
            module.start()?;
            let declared = module.register(&mut self.registry)?;
            tracing::info!(plugin = %module.plugin_id(), extensions = declared, "plugin started");
            started += 1;
        }
        Ok(started)
    }

    /// Stop every started module in reverse load order.
    ///
    /// Returns the number of modules stopped.
    pub fn stop_plugins(&mut self) -> usize {
        let mut stopped = 0;
        for module in self.modules.iter_mut().rev() {
            if module.state() != &PluginState::Started {
                continue;
            }
            if let Err(e) = module.stop() {
                tracing::warn!(plugin = %module.plugin_id(), error = %e, "plugin stop refused");
                continue;
            }
            let removed = self.registry.remove_plugin(module.plugin_id());
            tracing::info!(plugin = %module.plugin_id(), extensions = removed, "plugin stopped");
            stopped += 1;
        }
        self.clear_executors();
        stopped
    }

    /// Stop (if started) and drop one plugin.
    pub fn unload(&mut self, plugin_id: &str) -> Result<()> {
        let index = self
            .modules
            .iter()
            .position(|m| m.plugin_id() == plugin_id)
            .ok_or_else(|| Error::PluginNotFound(plugin_id.to_string()))?;

        let mut module = self.modules.remove(index);
        if module.state() == &PluginState::Started {
            module.stop()?;
        }
        self.registry.remove_plugin(plugin_id);
        self.clear_executors();
        tracing::info!(plugin = %plugin_id, "plugin unloaded");
        Ok(())
    }

    /// Resolve an executor type by name; an empty name means the default.
    pub fn executor_type(&self, name: &str) -> Result<ExecutorType> {
        self.registry.find_executor_type(self.resolve_name(name))
    }

    /// Executor instance for `name`, created on first use and cached.
    pub fn executor(&self, name: &str) -> Result<Arc<dyn Executor>> {
        let name = self.resolve_name(name);

        if let Some(executor) = self.executors.read().ok().and_then(|c| c.get(name).cloned()) {
            return Ok(executor);
        }

        let executor_type = self.registry.find_executor_type(name)?;
        let mut cache = self
            .executors
            .write()
            .map_err(|_| Error::Internal("executor cache poisoned".to_string()))?;
        let executor = cache
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(executor = %executor_type, "instantiating executor");
                Arc::from(executor_type.instantiate())
            })
            .clone();
        Ok(executor)
    }

    /// State of a loaded plugin.
    pub fn plugin_state(&self, plugin_id: &str) -> Option<&PluginState> {
        self.modules
            .iter()
            .find(|m| m.plugin_id() == plugin_id)
            .map(|m| m.state())
    }

    /// Loaded plugin IDs, in load order.
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.plugin_id()).collect()
    }

    /// Extension registry.
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Lifecycle journal.
    pub fn journal(&self) -> &LifecycleJournal {
        &self.journal
    }

    /// Configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        if name.is_empty() {
            &self.config.default_executor
        } else {
            name
        }
    }

    fn clear_executors(&self) {
        if let Ok(mut cache) = self.executors.write() {
            cache.clear();
        }
    }
}
