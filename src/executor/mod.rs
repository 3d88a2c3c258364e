//! Executor Module
//!
//! Executor capability exposed to plugins:
//! - `Executor` base capability
//! - `ExecutorType` factory descriptor
//! - `ExecutorProvider` extension point

pub mod provider;

pub use provider::{Executor, ExecutorClass, ExecutorProvider, ExecutorType};
