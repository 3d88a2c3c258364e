//! Plugin module lifecycle.
//!
//! A `PluginModule` wraps one constructed plugin and enforces the
//! forward-only state machine `Unloaded -> Started -> Stopped`.

use crate::core::{Error, Result};
use crate::monitoring::{LifecycleEventKind, LifecycleJournal};
use crate::plugin::catalog::PluginEntry;
use crate::plugin::interface::Plugin;
use crate::plugin::registry::ExtensionRegistry;
use crate::plugin::wrapper::{PluginContext, PluginWrapper};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Plugin lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginState {
    /// Constructed, not started
    Unloaded,
    /// Start hook completed
    Started,
    /// Stop hook completed
    Stopped,
    /// Start hook or extension registration failed
    Failed(String),
}

impl PluginState {
    /// No transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PluginState::Stopped | PluginState::Failed(_))
    }
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginState::Unloaded => write!(f, "unloaded"),
            PluginState::Started => write!(f, "started"),
            PluginState::Stopped => write!(f, "stopped"),
            PluginState::Failed(_) => write!(f, "failed"),
        }
    }
}

/// A loaded plugin and its lifecycle state.
pub struct PluginModule {
    plugin: Box<dyn Plugin>,
    state: PluginState,
    journal: LifecycleJournal,
}

impl PluginModule {
    /// Construct the plugin described by `entry` with the host context.
    ///
    /// The context must carry a wrapper whose id matches the entry. On
    /// error nothing is constructed and nothing is journaled.
    pub fn construct(entry: &PluginEntry, ctx: &PluginContext) -> Result<Self> {
        let wrapper = ctx
            .wrapper
            .as_ref()
            .ok_or_else(|| Error::Initialization(format!("no wrapper supplied for {}", entry.id())))?;

        if wrapper.plugin_id() != entry.id() {
            return Err(Error::Initialization(format!(
                "wrapper for {} does not match plugin {}",
                wrapper.plugin_id(),
                entry.id()
            )));
        }

        let plugin = (entry.factory)(ctx)?;
        let module = Self {
            plugin,
            state: PluginState::Unloaded,
            journal: ctx.journal.clone(),
        };
        module.record(
            LifecycleEventKind::Constructed,
            &format!("constructed plugin {}", module.plugin_id()),
        );
        Ok(module)
    }

    /// Plugin ID.
    pub fn plugin_id(&self) -> &str {
        self.plugin.plugin_id()
    }

    /// Host wrapper the plugin holds.
    pub fn wrapper(&self) -> &Arc<PluginWrapper> {
        self.plugin.wrapper()
    }

    /// Current state.
    pub fn state(&self) -> &PluginState {
        &self.state
    }

    /// Run the start hook. Legal only once, from `Unloaded`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != PluginState::Unloaded {
            return Err(self.misuse("start"));
        }

        self.record(LifecycleEventKind::Starting, "starting");
        match self.plugin.start() {
            Ok(()) => {
                self.state = PluginState::Started;
                Ok(())
            }
            Err(e) => {
                self.state = PluginState::Failed(e.to_string());
                self.record(LifecycleEventKind::Failed, &e.to_string());
                Err(e)
            }
        }
    }

    /// Run the stop hook. Legal only once, from `Started`.
    ///
    /// Cleanup errors reported by the plugin are logged and journaled but
    /// not returned; the module always ends up `Stopped`.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != PluginState::Started {
            return Err(self.misuse("stop"));
        }

        self.record(LifecycleEventKind::Stopping, "stopping");
        if let Err(e) = self.plugin.stop() {
            tracing::warn!(plugin = %self.plugin_id(), error = %e, "plugin cleanup failed");
            self.record(LifecycleEventKind::CleanupFailed, &e.to_string());
        }
        self.state = PluginState::Stopped;
        Ok(())
    }

    /// Collect the plugin's extension bindings. Legal only while `Started`.
    ///
    /// Returns the number of bindings declared by this call. If the plugin
    /// fails to register, every binding it declared is withdrawn, the stop
    /// hook runs and the module ends up `Failed`.
    pub fn register(&mut self, registry: &mut ExtensionRegistry) -> Result<usize> {
        if self.state != PluginState::Started {
            return Err(self.misuse("register extensions"));
        }

        let existing: HashSet<String> = binding_labels(registry, self.plugin_id());
        if let Err(e) = self.plugin.register(registry) {
            let withdrawn = registry.remove_plugin(self.plugin_id());
            if let Err(cleanup) = self.plugin.stop() {
                self.record(LifecycleEventKind::CleanupFailed, &cleanup.to_string());
            }
            tracing::warn!(
                plugin = %self.plugin_id(),
                error = %e,
                withdrawn,
                "extension registration failed"
            );
            self.state = PluginState::Failed(e.to_string());
            self.record(LifecycleEventKind::Failed, &e.to_string());
            return Err(e);
        }

        let mut added: Vec<String> = binding_labels(registry, self.plugin_id())
            .into_iter()
            .filter(|label| !existing.contains(label))
            .collect();
        added.sort();

        for label in &added {
            self.record(LifecycleEventKind::ExtensionDeclared, label);
        }
        Ok(added.len())
    }

    fn misuse(&self, action: &'static str) -> Error {
        Error::LifecycleMisuse {
            plugin: self.plugin_id().to_string(),
            from: self.state.to_string(),
            action,
        }
    }

    fn record(&self, kind: LifecycleEventKind, message: &str) {
        self.journal.emit(self.plugin_id(), kind, message);
    }
}

fn binding_labels(registry: &ExtensionRegistry, plugin_id: &str) -> HashSet<String> {
    registry
        .bindings_for(plugin_id)
        .iter()
        .map(|b| format!("{} -> {}", b.point(), b.name()))
        .collect()
}

impl std::fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginModule")
            .field("plugin_id", &self.plugin_id())
            .field("state", &self.state)
            .finish()
    }
}
