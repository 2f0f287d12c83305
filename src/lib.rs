//! # grist
//!
//! An in-memory, single-process MapReduce execution engine. Feed it a
//! stream of input records, a mapping step, and a reducing step, and it
//! produces an aggregated result by emulating the classic MapReduce
//! phases — map → partition/sort → reduce → partition/sort → output —
//! entirely in one address space, with no network transport and no disk
//! spilling.
//!
//! Each phase's output is fully materialized before the next phase
//! starts. Parallelism is pluggable per phase: the engine owns no
//! threads of its own and only requires that a [`PhaseStrategy`] return
//! results aligned with its inputs, so the serial default and a rayon
//! thread pool produce identical results.
//!
//! ## Modules
//!
//! - `config` - Per-phase sort switches
//! - `error` - Error enum and crate `Result` alias
//! - `partition` - Ordered key grouping and the partition/sort pass
//! - `pipeline` - The phase orchestrator
//! - `record` - The two record shapes emitted by tasks
//! - `strategy` - Pluggable per-phase execution strategies
//! - `task` - The `MapReduce` trait implemented by user code
pub mod config;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod record;
pub mod strategy;
pub mod task;

pub use config::SortPolicy;
pub use error::{Error, Result};
pub use partition::Grouping;
pub use pipeline::{Phase, Pipeline};
pub use record::Record;
pub use strategy::{PhaseStrategy, Serial, ThreadPool};
pub use task::MapReduce;
