//! Plugin catalog.
//!
//! Static table of the plugins compiled into this crate. Hosts iterate it
//! instead of scanning for plugin classes at runtime.

use crate::aws::AwsPlugin;
use crate::core::Result;
use crate::plugin::interface::Plugin;
use crate::plugin::wrapper::{PluginContext, PluginDescriptor};

/// Constructor the host invokes to instantiate a plugin.
pub type PluginFactory = fn(&PluginContext) -> Result<Box<dyn Plugin>>;

/// A loadable plugin: its metadata and its constructor.
#[derive(Clone, Debug)]
pub struct PluginEntry {
    /// Plugin metadata
    pub descriptor: PluginDescriptor,
    /// Constructor
    pub factory: PluginFactory,
}

impl PluginEntry {
    /// Create a new entry.
    pub fn new(descriptor: PluginDescriptor, factory: PluginFactory) -> Self {
        Self { descriptor, factory }
    }

    /// Plugin ID.
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

/// Plugins shipped with this crate.
pub fn builtin_plugins() -> Vec<PluginEntry> {
    vec![PluginEntry::new(AwsPlugin::descriptor(), AwsPlugin::create)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let entries = builtin_plugins();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), "nf-amazon");
    }
}
