//! Extension registry.
//!
//! Maps extension points to the bindings plugins declared for them.
//! Bindings store factories, never instances; the host decides when to
//! instantiate.

use crate::core::{now, Error, Result, Timestamp};
use crate::executor::{ExecutorProvider, ExecutorType};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Capability interfaces the host expects plugins to fulfil.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtensionPoint {
    /// Provides an executor type
    ExecutorProvider,
}

impl std::fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtensionPoint::ExecutorProvider => write!(f, "executor-provider"),
        }
    }
}

/// Zero-argument constructor for an extension, tagged by extension point.
#[derive(Clone, Copy)]
pub enum ExtensionFactory {
    /// Builds an executor provider
    ExecutorProvider(fn() -> Arc<dyn ExecutorProvider>),
}

impl ExtensionFactory {
    /// Extension point this factory fulfils.
    pub fn point(&self) -> ExtensionPoint {
        match self {
            ExtensionFactory::ExecutorProvider(_) => ExtensionPoint::ExecutorProvider,
        }
    }
}

/// An instantiated extension.
#[derive(Clone)]
pub enum Extension {
    /// Executor provider instance
    ExecutorProvider(Arc<dyn ExecutorProvider>),
}

impl Extension {
    /// Extension point of this instance.
    pub fn point(&self) -> ExtensionPoint {
        match self {
            Extension::ExecutorProvider(_) => ExtensionPoint::ExecutorProvider,
        }
    }
}

fn provide<P: ExecutorProvider + Default + 'static>() -> Arc<dyn ExecutorProvider> {
    Arc::new(P::default())
}

/// Type name without the module path of the outer type.
///
/// Generic arguments are kept verbatim: `a::Grid<b::Slurm>` becomes
/// `Grid<b::Slurm>`.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let outer_end = full.find('<').unwrap_or(full.len());
    match full[..outer_end].rfind("::") {
        Some(sep) => &full[sep + 2..],
        None => full,
    }
}

/// Immutable (extension point, implementation) pair declared by a plugin.
#[derive(Clone)]
pub struct ExtensionBinding {
    plugin_id: String,
    type_id: TypeId,
    name: String,
    ordinal: i32,
    factory: ExtensionFactory,
    declared_at: Timestamp,
}

impl ExtensionBinding {
    /// Bind provider type `P` to the executor-provider extension point.
    pub fn executor_provider<P: ExecutorProvider + Default + 'static>(plugin_id: &str) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
            type_id: TypeId::of::<P>(),
            name: short_type_name::<P>().to_string(),
            ordinal: 0,
            factory: ExtensionFactory::ExecutorProvider(provide::<P>),
            declared_at: now(),
        }
    }

    /// Set ordinal; lower ordinals are listed first.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Extension point.
    pub fn point(&self) -> ExtensionPoint {
        self.factory.point()
    }

    /// Declaring plugin.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Implementation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the binding is implemented by `P`.
    pub fn is<P: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<P>()
    }

    /// Ordering hint.
    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    /// Declaration time.
    pub fn declared_at(&self) -> Timestamp {
        self.declared_at
    }

    /// Build the extension.
    pub fn instantiate(&self) -> Extension {
        match self.factory {
            ExtensionFactory::ExecutorProvider(factory) => Extension::ExecutorProvider(factory()),
        }
    }

    fn sort_key(&self) -> (i32, &str, &str) {
        (self.ordinal, &self.plugin_id, &self.name)
    }
}

impl std::fmt::Debug for ExtensionBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionBinding")
            .field("point", &self.point())
            .field("plugin_id", &self.plugin_id)
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

/// Extension registry.
///
/// Filled through `&mut self` while plugins register, then queried
/// through `&self` from any number of threads.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    bindings: HashMap<ExtensionPoint, Vec<ExtensionBinding>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a binding.
    pub fn declare(&mut self, binding: ExtensionBinding) -> Result<()> {
        let point = binding.point();
        let entries = self.bindings.entry(point).or_default();

        if entries
            .iter()
            .any(|b| b.plugin_id == binding.plugin_id && b.type_id == binding.type_id)
        {
            return Err(Error::DuplicateExtension {
                point: point.to_string(),
                plugin: binding.plugin_id,
                name: binding.name,
            });
        }

        tracing::debug!(
            point = %point,
            plugin = %binding.plugin_id,
            extension = %binding.name,
            "extension declared"
        );

        entries.push(binding);
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(())
    }

    /// Bindings for a point, in ordinal order.
    pub fn bindings(&self, point: ExtensionPoint) -> &[ExtensionBinding] {
        self.bindings.get(&point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bindings declared by one plugin.
    pub fn bindings_for(&self, plugin_id: &str) -> Vec<&ExtensionBinding> {
        self.bindings
            .values()
            .flatten()
            .filter(|b| b.plugin_id == plugin_id)
            .collect()
    }

    /// Instantiate every executor provider.
    pub fn executor_providers(&self) -> Vec<Arc<dyn ExecutorProvider>> {
        self.bindings(ExtensionPoint::ExecutorProvider)
            .iter()
            .map(|b| match b.instantiate() {
                Extension::ExecutorProvider(provider) => provider,
            })
            .collect()
    }

    /// Executor types exposed by all providers, in binding order.
    pub fn executor_types(&self) -> Vec<ExecutorType> {
        self.executor_providers()
            .iter()
            .map(|p| p.executor_type())
            .collect()
    }

    /// Names of all registered executors.
    pub fn executor_names(&self) -> Vec<&'static str> {
        self.executor_types().iter().map(|t| t.name()).collect()
    }

    /// Resolve an executor type by name. The first binding in order wins.
    pub fn find_executor_type(&self, name: &str) -> Result<ExecutorType> {
        self.executor_types()
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::ExecutorNotFound(name.to_string()))
    }

    /// Remove every binding declared by `plugin_id`.
    ///
    /// Returns the number of removed bindings.
    pub fn remove_plugin(&mut self, plugin_id: &str) -> usize {
        let mut removed = 0;
        for entries in self.bindings.values_mut() {
            let before = entries.len();
            entries.retain(|b| b.plugin_id != plugin_id);
            removed += before - entries.len();
        }
        self.bindings.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Plugins with at least one binding.
    pub fn plugins(&self) -> BTreeSet<&str> {
        self.bindings
            .values()
            .flatten()
            .map(|b| b.plugin_id.as_str())
            .collect()
    }

    /// Total number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// True when no binding is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{Executor, ExecutorClass};

    #[derive(Default)]
    struct LocalExecutor;

    impl Executor for LocalExecutor {
        fn name(&self) -> &str {
            Self::NAME
        }
    }

    impl ExecutorClass for LocalExecutor {
        const NAME: &'static str = "local";
    }

    #[derive(Default)]
    struct LocalProvider;

    impl ExecutorProvider for LocalProvider {
        fn executor_type(&self) -> ExecutorType {
            ExecutorType::of::<LocalExecutor>()
        }
    }

    #[derive(Default)]
    struct ShadowProvider;

    impl ExecutorProvider for ShadowProvider {
        fn executor_type(&self) -> ExecutorType {
            ExecutorType::of::<LocalExecutor>()
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.bindings(ExtensionPoint::ExecutorProvider).is_empty());
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut registry = ExtensionRegistry::new();
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("core"))
            .unwrap();

        let bindings = registry.bindings(ExtensionPoint::ExecutorProvider);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].name(), "LocalProvider");
        assert_eq!(bindings[0].plugin_id(), "core");

        let found = registry.find_executor_type("local").unwrap();
        assert!(found.is::<LocalExecutor>());
        assert_eq!(registry.executor_names(), vec!["local"]);
    }

    #[test]
    fn test_unknown_executor() {
        let registry = ExtensionRegistry::new();
        let err = registry.find_executor_type("slurm").unwrap_err();
        assert!(matches!(err, Error::ExecutorNotFound(name) if name == "slurm"));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut registry = ExtensionRegistry::new();
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("core"))
            .unwrap();

        let result = registry.declare(ExtensionBinding::executor_provider::<LocalProvider>("core"));
        assert!(matches!(result, Err(Error::DuplicateExtension { .. })));

        // Same provider from another plugin is a different binding.
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("other"))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_ordinal_order() {
        let mut registry = ExtensionRegistry::new();
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("core").with_ordinal(10))
            .unwrap();
        registry
            .declare(ExtensionBinding::executor_provider::<ShadowProvider>("custom").with_ordinal(-1))
            .unwrap();

        let names: Vec<&str> = registry
            .bindings(ExtensionPoint::ExecutorProvider)
            .iter()
            .map(|b| b.name())
            .collect();
        assert_eq!(names, vec!["ShadowProvider", "LocalProvider"]);
    }

    #[test]
    fn test_remove_plugin() {
        let mut registry = ExtensionRegistry::new();
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("core"))
            .unwrap();
        registry
            .declare(ExtensionBinding::executor_provider::<ShadowProvider>("core"))
            .unwrap();
        registry
            .declare(ExtensionBinding::executor_provider::<LocalProvider>("other"))
            .unwrap();

        assert_eq!(registry.bindings_for("core").len(), 2);
        assert_eq!(registry.remove_plugin("core"), 2);
        assert_eq!(registry.remove_plugin("core"), 0);
        assert_eq!(registry.plugins().into_iter().collect::<Vec<_>>(), vec!["other"]);
    }

    #[test]
    fn test_instantiate_matches_point() {
        let binding = ExtensionBinding::executor_provider::<LocalProvider>("core");
        assert_eq!(binding.point(), ExtensionPoint::ExecutorProvider);
        assert_eq!(binding.instantiate().point(), binding.point());
        assert_eq!(ExtensionPoint::ExecutorProvider.to_string(), "executor-provider");
    }

    #[derive(Default)]
    struct Slurm;

    #[derive(Default)]
    struct Grid<T>(std::marker::PhantomData<T>);

    impl<T: Send + Sync + 'static> ExecutorProvider for Grid<T> {
        fn executor_type(&self) -> ExecutorType {
            ExecutorType::of::<LocalExecutor>()
        }
    }

    #[derive(Default)]
    struct Cloud<T>(std::marker::PhantomData<T>);

    impl<T: Send + Sync + 'static> ExecutorProvider for Cloud<T> {
        fn executor_type(&self) -> ExecutorType {
            ExecutorType::of::<LocalExecutor>()
        }
    }

    #[test]
    fn test_generic_providers_are_distinct() {
        let grid = ExtensionBinding::executor_provider::<Grid<Slurm>>("hpc");
        let cloud = ExtensionBinding::executor_provider::<Cloud<Slurm>>("hpc");

        assert!(grid.name().starts_with("Grid<"));
        assert!(grid.name().ends_with("Slurm>"));
        assert!(cloud.name().starts_with("Cloud<"));
        assert!(grid.is::<Grid<Slurm>>());
        assert!(!grid.is::<Cloud<Slurm>>());

        let mut registry = ExtensionRegistry::new();
        registry.declare(grid).unwrap();
        registry.declare(cloud).unwrap();
        assert_eq!(registry.len(), 2);

        let again = registry.declare(ExtensionBinding::executor_provider::<Grid<Slurm>>("hpc"));
        assert!(matches!(again, Err(Error::DuplicateExtension { .. })));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<LocalProvider>(), "LocalProvider");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
