//! Record shapes emitted by mappers and reducers
//!
//! Every record carries a partition key and a value, and optionally an
//! explicit sort key between the two. Within one phase's output all
//! records must share the same shape; the batch check here enforces that
//! before any grouping happens.

use crate::error::{Error, Result};

/// A single record emitted by one mapper or reducer invocation.
///
/// The two shapes mirror `(key, value)` and `(key, sort, value)` tuples.
/// The key decides which group a value lands in; the sort element, when
/// present, orders values within that group before the next reduce step.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<K, S, V> {
    /// `(key, value)`: no explicit sort key.
    Pair { key: K, value: V },
    /// `(key, sort, value)`: explicit sort key separate from the value.
    Triple { key: K, sort: S, value: V },
}

impl<K, S, V> Record<K, S, V> {
    /// A `(key, value)` record.
    pub fn pair(key: K, value: V) -> Self {
        Record::Pair { key, value }
    }

    /// A `(key, sort, value)` record.
    pub fn triple(key: K, sort: S, value: V) -> Self {
        Record::Triple { key, sort, value }
    }

    /// Number of tuple elements in this record's shape: 2 or 3.
    pub fn arity(&self) -> usize {
        match self {
            Record::Pair { .. } => 2,
            Record::Triple { .. } => 3,
        }
    }

    /// The partition key.
    pub fn key(&self) -> &K {
        match self {
            Record::Pair { key, .. } => key,
            Record::Triple { key, .. } => key,
        }
    }

    /// The value.
    pub fn value(&self) -> &V {
        match self {
            Record::Pair { value, .. } => value,
            Record::Triple { value, .. } => value,
        }
    }

    /// Splits the record into `(key, optional sort key, value)`.
    pub(crate) fn into_parts(self) -> (K, Option<S>, V) {
        match self {
            Record::Pair { key, value } => (key, None, value),
            Record::Triple { key, sort, value } => (key, Some(sort), value),
        }
    }
}

/// Checks that every record in one phase's batch shares the first
/// record's shape.
///
/// Returns the batch arity, or `None` for an empty batch. Mixed shapes
/// fail with [`Error::MalformedRecord`] naming both arities.
pub(crate) fn batch_arity<K, S, V>(records: &[Record<K, S, V>]) -> Result<Option<usize>> {
    let mut arities = records.iter().map(Record::arity);
    let Some(expected) = arities.next() else {
        return Ok(None);
    };
    for found in arities {
        if found != expected {
            return Err(Error::MalformedRecord { expected, found });
        }
    }
    Ok(Some(expected))
}
