//! Worker pool that runs the per-frame and per-pair stages in parallel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::{Result, TrackError};

/// Share of the available cores used in [`ExecutionMode::Eco`].
const ECO_CPU_SHARE: f64 = 0.4;
/// Share of the available cores used in [`ExecutionMode::Performance`].
const PERFORMANCE_CPU_SHARE: f64 = 0.8;

/// How much of the machine the worker pool may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Leave most cores to the rest of the application.
    Eco,
    #[default]
    Performance,
}

impl ExecutionMode {
    fn cpu_share(self) -> f64 {
        match self {
            ExecutionMode::Eco => ECO_CPU_SHARE,
            ExecutionMode::Performance => PERFORMANCE_CPU_SHARE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    pub mode: ExecutionMode,
    /// Exact worker count; overrides `mode` when set.
    pub threads: Option<usize>,
}

impl ExecutorConfig {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            mode: ExecutionMode::default(),
            threads: Some(threads),
        }
    }

    /// Number of workers for a machine with `cpus` cores, at least one.
    pub fn worker_count(&self, cpus: usize) -> usize {
        match self.threads {
            Some(n) => n.max(1),
            None => ((cpus as f64 * self.mode.cpu_share()) as usize).max(1),
        }
    }
}

/// Cooperative cancellation flag shared between the caller and running tasks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TrackError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Dedicated thread pool with order-preserving parallel map.
pub struct ParallelExecutor {
    pool: rayon::ThreadPool,
}

impl ParallelExecutor {
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let threads = config.worker_count(cpus);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("celltrack-worker-{i}"))
            .build()
            .map_err(|e| TrackError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Apply `f` to every input in parallel and return the results in input order.
    ///
    /// Tasks that start after `cancel` fires return `Cancelled` without
    /// running `f`; the first error of any task is returned.
    pub fn map<T, U, F>(&self, inputs: &[T], cancel: &CancelToken, f: F) -> Result<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> Result<U> + Sync + Send,
    {
        self.pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    cancel.check()?;
                    f(input)
                })
                .collect()
        })
    }
}

impl std::fmt::Debug for ParallelExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelExecutor")
            .field("workers", &self.workers())
            .finish()
    }
}
