//! Partition and sort bookkeeping between phases
//!
//! Turns the flat record batch produced by one phase into an ordered
//! mapping from partition key to that key's values, applying the phase's
//! sort policy along the way. This is the barrier structure the next
//! phase fans out over.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::config::SortPolicy;
use crate::error::{Error, Result};
use crate::record::{batch_arity, Record};

/// Ordered mapping from partition key to the values grouped under it.
///
/// Keys appear in first-seen order and are never resorted; sort
/// configuration only reorders values inside a single group. This is
/// both the engine's intermediate structure between phases and the
/// default caller-visible result shape.
#[derive(Debug, Clone)]
pub struct Grouping<K, V> {
    entries: Vec<(K, Vec<V>)>,
    index: HashMap<K, usize>,
}

impl<K, V> Grouping<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Grouping {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of distinct partition keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all groups.
    pub fn values_len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    /// Appends a value to `key`'s group, creating the group on first
    /// sight.
    pub fn push(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    /// Appends a whole group of values at once, preserving their order.
    pub(crate) fn extend_group(&mut self, key: K, values: Vec<V>) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.extend(values),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, values));
            }
        }
    }

    /// The values grouped under `key`, in their current order.
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// `(key, values)` pairs in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }
}

impl<K, V> Default for Grouping<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Grouping::new()
    }
}

impl<K, V> IntoIterator for Grouping<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = std::vec::IntoIter<(K, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> PartialEq for Grouping<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Groups one phase's records by partition key and applies the sort
/// policy.
///
/// Records are consumed in arrival order, which fixes key order. Each
/// group's value order follows the effective-sort-key table:
///
/// | shape  | `with_value` | effective sort key |
/// |--------|--------------|--------------------|
/// | pair   | true         | value              |
/// | pair   | false        | sorting disabled   |
/// | triple | true         | (sort, value)      |
/// | triple | false        | sort               |
///
/// Sorting is stable and local to each group; `reverse` flips the
/// ascending result after the fact. Sort keys are stripped once used, so
/// the returned grouping carries values only.
pub(crate) fn partition<K, S, V>(
    records: Vec<Record<K, S, V>>,
    policy: SortPolicy,
) -> Result<Grouping<K, V>>
where
    K: Hash + Eq + Clone + fmt::Debug,
    S: PartialOrd,
    V: PartialOrd,
{
    let arity = batch_arity(&records)?;
    let has_sort_element = arity == Some(3);
    let need_sort = policy.enabled && (has_sort_element || policy.with_value);

    let mut staged: Grouping<K, (Option<S>, V)> = Grouping::new();
    for record in records {
        let (key, sort, value) = record.into_parts();
        staged.push(key, (sort, value));
    }

    let mut out = Grouping::new();
    for (key, mut pairs) in staged {
        if need_sort {
            sort_group(&key, &mut pairs, policy)?;
        }
        let values = pairs.into_iter().map(|(_, value)| value).collect();
        out.extend_group(key, values);
    }
    Ok(out)
}

/// Stable in-group sort on the effective key, then an optional reversal.
fn sort_group<K, S, V>(key: &K, pairs: &mut [(Option<S>, V)], policy: SortPolicy) -> Result<()>
where
    K: fmt::Debug,
    S: PartialOrd,
    V: PartialOrd,
{
    let mut comparable = true;
    pairs.sort_by(|a, b| {
        effective_cmp(a, b, policy.with_value).unwrap_or_else(|| {
            comparable = false;
            Ordering::Equal
        })
    });
    if !comparable {
        return Err(Error::Uncomparable {
            key: format!("{key:?}"),
        });
    }
    if policy.reverse {
        pairs.reverse();
    }
    Ok(())
}

/// Comparison on the effective sort key. `None` marks a pair of elements
/// with no defined order.
fn effective_cmp<S, V>(
    a: &(Option<S>, V),
    b: &(Option<S>, V),
    with_value: bool,
) -> Option<Ordering>
where
    S: PartialOrd,
    V: PartialOrd,
{
    match (&a.0, &b.0) {
        (Some(sort_a), Some(sort_b)) => {
            let by_sort = sort_a.partial_cmp(sort_b)?;
            if with_value && by_sort == Ordering::Equal {
                a.1.partial_cmp(&b.1)
            } else {
                Some(by_sort)
            }
        }
        // Pair records: the value is the whole sort key. A uniform batch
        // never mixes the two arms.
        (None, None) => a.1.partial_cmp(&b.1),
        _ => None,
    }
}
