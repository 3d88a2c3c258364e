//! AWS plugin entry point.

use crate::aws::provider::AwsBatchProvider;
use crate::core::Result;
use crate::monitoring::LifecycleEventKind;
use crate::plugin::{ExtensionBinding, ExtensionRegistry, Plugin, PluginBase, PluginContext, PluginDescriptor};

/// Plugin ID the AWS plugin is published under.
pub const AWS_PLUGIN_ID: &str = "nf-amazon";

/// The AWS plugin.
///
/// Holds no resources of its own: start and stop only signal.
#[derive(Debug)]
pub struct AwsPlugin {
    base: PluginBase,
}

impl AwsPlugin {
    /// Construct with the host context. This signature is the load
    /// contract used by [`AwsPlugin::create`].
    pub fn new(ctx: &PluginContext) -> Result<Self> {
        Ok(Self {
            base: PluginBase::new(ctx)?,
        })
    }

    /// Catalog constructor.
    pub fn create(ctx: &PluginContext) -> Result<Box<dyn Plugin>> {
        Ok(Box::new(Self::new(ctx)?))
    }

    /// Manifest of this plugin.
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::new(AWS_PLUGIN_ID, env!("CARGO_PKG_VERSION"))
            .with_provider("nf-amazon developers")
            .with_description("AWS Batch executor support")
    }
}

impl Plugin for AwsPlugin {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn start(&mut self) -> Result<()> {
        self.base.signal(LifecycleEventKind::Started, "Starting AWS plugin");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.base.signal(LifecycleEventKind::Stopped, "Stopping AWS plugin");
        Ok(())
    }

    fn register(&self, registry: &mut ExtensionRegistry) -> Result<()> {
        registry.declare(ExtensionBinding::executor_provider::<AwsBatchProvider>(
            self.plugin_id(),
        ))
    }
}
