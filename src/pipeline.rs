//! Pipeline orchestration
//!
//! Sequences one full run: map → partition/sort → reduce →
//! partition/sort → output. Every arrow is a full barrier — the next
//! phase never starts until the previous phase's entire output has been
//! collected — and a failure at any phase aborts the run with the
//! original error.

use std::fmt;

use tracing::{debug, warn};

use crate::error::Result;
use crate::partition::partition;
use crate::strategy::{PhaseStrategy, Serial};
use crate::task::MapReduce;

/// Where a run currently is in the phase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Map,
    PartitionMap,
    Reduce,
    PartitionReduce,
    Output,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::PartitionMap => write!(f, "partition-map"),
            Phase::Reduce => write!(f, "reduce"),
            Phase::PartitionReduce => write!(f, "partition-reduce"),
            Phase::Output => write!(f, "output"),
        }
    }
}

/// Sequences one full MapReduce run over a task.
///
/// The map and reduce phases take independent strategies; both default
/// to [`Serial`]. The orchestrator itself is single-threaded and
/// synchronous — whatever concurrency a strategy provides stays inside
/// that phase's barrier.
pub struct Pipeline<T, M = Serial, R = Serial> {
    task: T,
    map_strategy: M,
    reduce_strategy: R,
}

impl<T> Pipeline<T> {
    /// A pipeline running both phases serially on the current thread.
    pub fn new(task: T) -> Self {
        Pipeline {
            task,
            map_strategy: Serial,
            reduce_strategy: Serial,
        }
    }
}

impl<T, M, R> Pipeline<T, M, R> {
    /// Replaces the strategy used for the map phase.
    pub fn with_map_strategy<M2>(self, strategy: M2) -> Pipeline<T, M2, R> {
        Pipeline {
            task: self.task,
            map_strategy: strategy,
            reduce_strategy: self.reduce_strategy,
        }
    }

    /// Replaces the strategy used for the reduce phase.
    pub fn with_reduce_strategy<R2>(self, strategy: R2) -> Pipeline<T, M, R2> {
        Pipeline {
            task: self.task,
            map_strategy: self.map_strategy,
            reduce_strategy: strategy,
        }
    }

    /// The wrapped task.
    pub fn task(&self) -> &T {
        &self.task
    }
}

impl<T, M, R> Pipeline<T, M, R>
where
    T: MapReduce + Sync,
    M: PhaseStrategy + Sync,
    R: PhaseStrategy + Sync,
{
    /// Executes the full pipeline over `input`, consuming it exactly
    /// once.
    ///
    /// `setup` runs first; `teardown` runs after the phases finish on
    /// every exit path. When both the run and teardown fail, the run's
    /// error wins and the teardown failure is logged.
    pub fn run<I>(&self, input: I) -> Result<T::Output>
    where
        I: IntoIterator<Item = T::Input>,
    {
        self.task.setup()?;
        let result = self.execute(input);
        match self.task.teardown() {
            Ok(()) => result,
            Err(teardown_err) => match result {
                Ok(_) => Err(teardown_err),
                Err(run_err) => {
                    warn!(error = %teardown_err, "teardown failed during run failure");
                    Err(run_err)
                }
            },
        }
    }

    fn execute<I>(&self, input: I) -> Result<T::Output>
    where
        I: IntoIterator<Item = T::Input>,
    {
        let items: Vec<T::Input> = input.into_iter().collect();
        debug!(phase = %Phase::Map, items = items.len(), "entering phase");
        let mapped = self
            .map_strategy
            .run(|item| self.task.map(item), items)?;
        let records: Vec<_> = mapped.into_iter().flatten().collect();

        debug!(phase = %Phase::PartitionMap, records = records.len(), "entering phase");
        let grouped = partition(records, self.task.map_sort())?;

        debug!(phase = %Phase::Reduce, keys = grouped.len(), "entering phase");
        let units: Vec<_> = grouped.into_iter().collect();
        let reduced = self
            .reduce_strategy
            .run(|(key, values)| self.task.reduce(key, values), units)?;
        let records: Vec<_> = reduced.into_iter().flatten().collect();

        debug!(phase = %Phase::PartitionReduce, records = records.len(), "entering phase");
        let grouped = partition(records, self.task.reduce_sort())?;

        debug!(phase = %Phase::Output, keys = grouped.len(), "entering phase");
        self.task.output(grouped)
    }
}
