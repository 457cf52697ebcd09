//! Executors used for batch evaluation.
//!
//! ## Available Executors
//!
//! - [`SyncExecutor`]: Sequential execution, no threading
//! - [`RayonExecutor`]: Work-stealing thread pool (feature: `rayon-executor`)

#[cfg(feature = "rayon-executor")]
mod rayon;

#[cfg(feature = "rayon-executor")]
pub use self::rayon::RayonExecutor;

use std::fmt::Debug;

/// Runs a batch of independent work items, potentially in parallel.
///
/// Results are always returned in input order.
pub trait Executor: Send + Sync + Debug {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;

    /// Returns the level of parallelism this executor can provide.
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Processes items one after another on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}

/// A type-erased executor.
///
/// `Executor` has generic methods and so cannot be a trait object; this enum
/// holds the concrete executors and delegates to them, which lets `Engine`
/// store an executor without being generic over it.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    /// Sequential executor (no parallelism)
    Sync(SyncExecutor),

    /// Rayon work-stealing thread pool executor
    #[cfg(feature = "rayon-executor")]
    Rayon(RayonExecutor),
}

impl Default for ExecutorImpl {
    /// The rayon pool when compiled in, sequential otherwise.
    fn default() -> Self {
        #[cfg(feature = "rayon-executor")]
        {
            ExecutorImpl::Rayon(RayonExecutor::new())
        }
        #[cfg(not(feature = "rayon-executor"))]
        {
            ExecutorImpl::Sync(SyncExecutor::new())
        }
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon-executor")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon-executor")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon-executor")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_executor_processes_items_in_order() {
        let executor = SyncExecutor::new();
        let results = executor.execute_all(vec![1, 2, 3, 4, 5], |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
        assert_eq!(executor.parallelism(), 1);
    }

    #[test]
    fn test_executor_impl_delegates() {
        let executor = ExecutorImpl::Sync(SyncExecutor::new());
        let offset = 10;
        let results = executor.execute_all(vec![1, 2], |x| x + offset);
        assert_eq!(results, vec![11, 12]);
        assert_eq!(executor.name(), "SyncExecutor");
    }
}
