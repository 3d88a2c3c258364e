//! Monitoring Module
//!
//! Provides runtime observability:
//! - Tracing subscriber setup
//! - Lifecycle journal

pub mod journal;
pub mod logging;

pub use journal::{LifecycleEvent, LifecycleEventKind, LifecycleJournal};
pub use logging::{init_tracing, LogConfig, LogFormat, LogLevel};
