//! AWS Plugin
//!
//! Publishes the AWS Batch executor through the executor-provider
//! extension point.

pub mod executor;
pub mod plugin;
pub mod provider;

pub use executor::AwsBatchExecutor;
pub use plugin::{AwsPlugin, AWS_PLUGIN_ID};
pub use provider::AwsBatchProvider;
