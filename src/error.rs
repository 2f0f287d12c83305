//! Error types for pipeline execution
//!
//! Every error is fatal to the run: the engine performs no retry,
//! partial-result recovery, or checkpointing. On failure the pipeline
//! releases lifecycle resources and hands the original error back to the
//! caller.

use thiserror::Error;

/// Main error type for MapReduce pipeline runs.
#[derive(Debug, Error)]
pub enum Error {
    /// A phase emitted records of mixed shape. Every record in one
    /// phase's batch must be all pairs or all triples.
    #[error("malformed record: batch mixes {expected}-element and {found}-element records")]
    MalformedRecord { expected: usize, found: usize },

    /// Sorting was enabled but the effective sort keys within one
    /// partition group could not be mutually ordered (e.g. NaN).
    #[error("sort keys in partition {key} are not mutually orderable")]
    Uncomparable { key: String },

    /// A failure raised by the user's mapper, reducer, output hook,
    /// lifecycle hook, or a caller-supplied phase strategy. Propagates
    /// unchanged to the top-level caller.
    #[error(transparent)]
    User(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
