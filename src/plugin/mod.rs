//! Plugin Module
//!
//! Provides the plugin runtime:
//! - Plugin interface and host wrapper
//! - Extension registry
//! - Lifecycle management
//! - Built-in plugin catalog

pub mod catalog;
pub mod interface;
pub mod module;
pub mod registry;
pub mod wrapper;

pub use catalog::{builtin_plugins, PluginEntry, PluginFactory};
pub use interface::{Plugin, PluginBase};
pub use module::{PluginModule, PluginState};
pub use registry::{Extension, ExtensionBinding, ExtensionFactory, ExtensionPoint, ExtensionRegistry};
pub use wrapper::{PluginContext, PluginDescriptor, PluginWrapper};
