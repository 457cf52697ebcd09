//! Rayon-based parallel executor.

use super::Executor;
use rayon::prelude::*;

/// A parallel executor over rayon's global work-stealing pool.
///
/// To configure the number of threads, build rayon's global pool with
/// `rayon::ThreadPoolBuilder` before the first executor is created.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    /// Cached thread count for reporting via `parallelism()`.
    num_threads: usize,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        // Indexed parallel iterators collect in input order.
        items.into_par_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rayon_executor_preserves_order() {
        let executor = RayonExecutor::new();
        let items: Vec<usize> = (0..1000).collect();
        let results = executor.execute_all(items, |x| x * 3);
        assert_eq!(results, (0..1000).map(|x| x * 3).collect::<Vec<_>>());
        assert!(executor.parallelism() >= 1);
    }
}
