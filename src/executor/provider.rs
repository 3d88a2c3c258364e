//! Executor capability and the `ExecutorProvider` extension point.
//!
//! Providers never build executors themselves. They hand out an
//! [`ExecutorType`], an opaque factory key the host uses to instantiate
//! (and cache) the executor when it actually needs one.

use std::any::TypeId;

/// Base capability every compute executor fulfils.
///
/// Job submission and monitoring live in the concrete implementation,
/// outside of this crate.
pub trait Executor: Send + Sync {
    /// Executor name as used in pipeline configuration.
    fn name(&self) -> &str;

    /// Whether tasks must run inside a container image.
    fn container_native(&self) -> bool {
        false
    }
}

/// A concrete executor type that can be described without an instance.
pub trait ExecutorClass: Executor + Default + 'static {
    /// Name the executor is registered under.
    const NAME: &'static str;
}

/// Type descriptor for an executor implementation.
///
/// Cheap to copy, comparable, and stable for a given implementation type.
#[derive(Clone, Copy)]
pub struct ExecutorType {
    name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    factory: fn() -> Box<dyn Executor>,
}

impl ExecutorType {
    /// Describe the executor implementation `E`.
    pub fn of<E: ExecutorClass>() -> Self {
        Self {
            name: E::NAME,
            type_name: std::any::type_name::<E>(),
            type_id: TypeId::of::<E>(),
            factory: construct::<E>,
        }
    }

    /// Registered executor name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified Rust type name of the implementation.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True if this descriptor refers to `E`.
    pub fn is<E: ExecutorClass>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    /// Build a fresh executor instance.
    pub fn instantiate(&self) -> Box<dyn Executor> {
        (self.factory)()
    }
}

impl PartialEq for ExecutorType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl Eq for ExecutorType {}

impl std::fmt::Debug for ExecutorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorType")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl std::fmt::Display for ExecutorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.type_name)
    }
}

fn construct<E: ExecutorClass>() -> Box<dyn Executor> {
    Box::new(E::default())
}

/// Extension point: tells the host which executor type implements a
/// named compute executor.
pub trait ExecutorProvider: Send + Sync {
    /// The executor type this provider exposes. Pure and total.
    fn executor_type(&self) -> ExecutorType;
}
