//! Manager Module
//!
//! Host side of the plugin runtime:
//! - Configuration
//! - Plugin loading and lifecycle
//! - Executor resolution

pub mod config;
pub mod host;

pub use config::ManagerConfig;
pub use host::PluginManager;
