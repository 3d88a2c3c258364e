//! # nf-amazon - AWS Batch executor plugin
//!
//! A plugin extension registry and the AWS plugin built on it:
//! - **Plugin**: lifecycle-managed plugin modules and the extension registry
//! - **Executor**: the `ExecutorProvider` extension point
//! - **AWS**: the plugin publishing the `awsbatch` executor
//! - **Manager**: a reference host loading and driving plugins
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nf_amazon::manager::{ManagerConfig, PluginManager};
//!
//! fn main() -> nf_amazon::Result<()> {
//!     let mut manager = PluginManager::new(ManagerConfig::default())?;
//!     manager.install_logging();
//!     manager.load_plugins()?;
//!     manager.start_plugins()?;
//!
//!     let executor_type = manager.executor_type("awsbatch")?;
//!     println!("awsbatch -> {}", executor_type.type_name());
//!
//!     manager.stop_plugins();
//!     Ok(())
//! }
//! ```

pub mod aws;
pub mod core;
pub mod executor;
pub mod manager;
pub mod monitoring;
pub mod plugin;

pub use crate::core::error::{Error, Result};
