//! AWS Batch executor type.

use crate::executor::{Executor, ExecutorClass};

/// Executor running tasks as AWS Batch jobs.
///
/// Job submission lives in the batch backend itself; this type is what the
/// provider advertises and what the host instantiates.
#[derive(Clone, Debug, Default)]
pub struct AwsBatchExecutor;

impl Executor for AwsBatchExecutor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn container_native(&self) -> bool {
        true
    }
}

impl ExecutorClass for AwsBatchExecutor {
    const NAME: &'static str = "awsbatch";
}
