//! The task capability interface implemented by user code
//!
//! A task names its types once and provides the per-item map step, the
//! per-key reduce step, and the terminal output step. Everything else —
//! sort policies and the lifecycle hooks — has a default.

use std::fmt::Debug;
use std::hash::Hash;

use crate::config::SortPolicy;
use crate::error::Result;
use crate::partition::Grouping;
use crate::record::Record;

/// One MapReduce task.
///
/// The pipeline calls `map` once per input item, groups the emitted
/// records by key, calls `reduce` once per key, groups again, and hands
/// the final grouping to `output`. Both `map` and `reduce` return an
/// explicit `Vec` of records — zero, one, or many — so there is never
/// any ambiguity between "one record" and "a collection of records".
///
/// ```
/// use grist::{Grouping, MapReduce, Pipeline, Record, Result};
///
/// struct WordCount;
///
/// impl MapReduce for WordCount {
///     type Input = String;
///     type Key = String;
///     type Sort = ();
///     type Value = u64;
///     type Output = Grouping<String, u64>;
///
///     fn map(&self, line: String) -> Result<Vec<Record<String, (), u64>>> {
///         Ok(line
///             .split_whitespace()
///             .map(|word| Record::pair(word.to_string(), 1))
///             .collect())
///     }
///
///     fn reduce(&self, key: String, values: Vec<u64>) -> Result<Vec<Record<String, (), u64>>> {
///         Ok(vec![Record::pair(key, values.iter().sum())])
///     }
///
///     fn output(&self, groups: Grouping<String, u64>) -> Result<Self::Output> {
///         Ok(groups)
///     }
/// }
///
/// let counts = Pipeline::new(WordCount).run(["the cat", "the dog"].map(String::from))?;
/// assert_eq!(counts.get("the"), Some(&[2u64][..]));
/// # Ok::<(), grist::Error>(())
/// ```
pub trait MapReduce {
    /// One item of the input stream.
    type Input: Send;
    /// Partition key. `Debug` is only used for error context.
    type Key: Hash + Eq + Clone + Debug + Send;
    /// Explicit sort key carried by triple records. Tasks that only emit
    /// pairs can use `()`.
    type Sort: PartialOrd + Send;
    /// Value grouped under a partition key.
    type Value: PartialOrd + Send;
    /// Caller-visible result of the whole run.
    type Output;

    /// Map step. Receives one input item and emits zero or more records.
    fn map(&self, item: Self::Input) -> Result<Vec<Record<Self::Key, Self::Sort, Self::Value>>>;

    /// Reduce step. Receives every value grouped under `key`, ordered per
    /// the map-phase sort policy, and emits zero or more records. Fan-out
    /// and fan-in are both fine, including routing everything to one
    /// shared key.
    fn reduce(
        &self,
        key: Self::Key,
        values: Vec<Self::Value>,
    ) -> Result<Vec<Record<Self::Key, Self::Sort, Self::Value>>>;

    /// Final-reduce/output step. Receives the grouping left after the
    /// second partition pass: every key mapped to all of its remaining
    /// values, never collapsed to a scalar even when exactly one value
    /// remains. The conventional implementation returns it unchanged
    /// with `type Output = Grouping<Self::Key, Self::Value>`; tasks
    /// needing another shape extract what they want here.
    fn output(&self, groups: Grouping<Self::Key, Self::Value>) -> Result<Self::Output>;

    /// Sort policy applied when grouping map output.
    fn map_sort(&self) -> SortPolicy {
        SortPolicy::default()
    }

    /// Sort policy applied when grouping reduce output.
    fn reduce_sort(&self) -> SortPolicy {
        SortPolicy::default()
    }

    /// Runs before the map phase. Acquire per-run resources here.
    fn setup(&self) -> Result<()> {
        Ok(())
    }

    /// Runs after the pipeline finishes, on success and failure alike.
    /// Not invoked when `setup` itself failed, since nothing was
    /// acquired.
    fn teardown(&self) -> Result<()> {
        Ok(())
    }
}
