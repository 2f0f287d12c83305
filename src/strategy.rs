//! Pluggable per-phase execution strategies
//!
//! The engine performs no locking, pooling, or thread management of its
//! own. Each phase hands its units of work to a strategy and collects
//! every result before the phase barrier lifts; whether the units ran
//! serially or concurrently is the strategy's business.

use rayon::prelude::*;

use crate::error::{Error, Result};

/// Applies a task callable to every unit of work in one phase.
///
/// Implementations must return results aligned 1:1 with the inputs by
/// position, whatever order execution actually happened in. Invocations
/// are assumed independent; the engine shares no mutable state between
/// them. Any error from the callable or the strategy itself aborts the
/// phase, and therefore the run.
pub trait PhaseStrategy {
    fn run<I, O, F>(&self, f: F, inputs: Vec<I>) -> Result<Vec<O>>
    where
        F: Fn(I) -> Result<O> + Send + Sync,
        I: Send,
        O: Send;
}

/// In-order execution on the current thread. The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl PhaseStrategy for Serial {
    fn run<I, O, F>(&self, f: F, inputs: Vec<I>) -> Result<Vec<O>>
    where
        F: Fn(I) -> Result<O> + Send + Sync,
        I: Send,
        O: Send,
    {
        inputs.into_iter().map(f).collect()
    }
}

/// Fans units of work across an owned rayon thread pool.
///
/// Execution order is arbitrary but results come back in input order, so
/// swapping this in for [`Serial`] never changes a pipeline's result.
#[derive(Debug)]
pub struct ThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool {
    /// Builds a pool with `threads` worker threads. Zero selects rayon's
    /// default for the host.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::User(anyhow::Error::new(e)))?;
        Ok(ThreadPool { pool })
    }
}

impl PhaseStrategy for ThreadPool {
    fn run<I, O, F>(&self, f: F, inputs: Vec<I>) -> Result<Vec<O>>
    where
        F: Fn(I) -> Result<O> + Send + Sync,
        I: Send,
        O: Send,
    {
        self.pool
            .install(|| inputs.into_par_iter().map(|input| f(input)).collect())
    }
}
