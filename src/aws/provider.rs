//! AWS Batch executor provider.

use crate::aws::executor::AwsBatchExecutor;
use crate::executor::{ExecutorProvider, ExecutorType};

/// Tells the host that the `awsbatch` executor is `AwsBatchExecutor`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AwsBatchProvider;

impl ExecutorProvider for AwsBatchProvider {
    fn executor_type(&self) -> ExecutorType {
        ExecutorType::of::<AwsBatchExecutor>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_executor_type() {
        let provider = AwsBatchProvider;
        let executor_type = provider.executor_type();

        assert!(executor_type.is::<AwsBatchExecutor>());
        assert_eq!(executor_type.name(), "awsbatch");
    }

    #[test]
    fn test_executor_type_is_stable() {
        let provider = AwsBatchProvider;
        let first = provider.executor_type();
        for _ in 0..100 {
            assert_eq!(provider.executor_type(), first);
        }
    }

    #[test]
    fn test_concurrent_lookup() {
        let provider: Arc<dyn ExecutorProvider> = Arc::new(AwsBatchProvider);
        let expected = provider.executor_type();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let provider = Arc::clone(&provider);
                    s.spawn(move || (0..1000).map(|_| provider.executor_type()).collect::<Vec<_>>())
                })
                .collect();

            for handle in handles {
                let seen = handle.join().unwrap();
                assert!(seen.iter().all(|t| *t == expected));
            }
        });
    }
}
