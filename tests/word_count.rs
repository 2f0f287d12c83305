//! End-to-end pipeline tests built around the classic word count task.

use std::collections::HashMap;

use anyhow::anyhow;
use grist::{Grouping, MapReduce, Pipeline, Record, Result, SortPolicy, ThreadPool};
use rand::Rng;

struct WordCount;

impl MapReduce for WordCount {
    type Input = String;
    type Key = String;
    type Sort = ();
    type Value = u64;
    type Output = Grouping<String, u64>;

    fn map(&self, line: String) -> Result<Vec<Record<String, (), u64>>> {
        Ok(line
            .split_whitespace()
            .map(|word| Record::pair(word.to_lowercase(), 1))
            .collect())
    }

    fn reduce(&self, key: String, values: Vec<u64>) -> Result<Vec<Record<String, (), u64>>> {
        Ok(vec![Record::pair(key, values.iter().sum())])
    }

    fn output(&self, groups: Grouping<String, u64>) -> Result<Self::Output> {
        Ok(groups)
    }
}

fn lines() -> Vec<String> {
    ["the cat", "the dog", "the cat"]
        .map(String::from)
        .to_vec()
}

#[test]
fn test_word_count_end_to_end() {
    let counts = Pipeline::new(WordCount).run(lines()).unwrap();
    assert_eq!(counts.get("the"), Some(&[3][..]));
    assert_eq!(counts.get("cat"), Some(&[2][..]));
    assert_eq!(counts.get("dog"), Some(&[1][..]));
    // Key order is first-seen order from the input stream.
    let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
    assert_eq!(keys, ["the", "cat", "dog"]);
}

#[test]
fn test_parallel_strategies_match_serial() {
    let serial = Pipeline::new(WordCount).run(lines()).unwrap();
    let threaded = Pipeline::new(WordCount)
        .with_map_strategy(ThreadPool::new(4).unwrap())
        .with_reduce_strategy(ThreadPool::new(2).unwrap())
        .run(lines())
        .unwrap();
    assert_eq!(serial, threaded);
}

/// Overriding `output` to collapse each key's singleton into a scalar,
/// the way callers wanting a plain map-of-counts do it.
struct WordCountScalar;

impl MapReduce for WordCountScalar {
    type Input = String;
    type Key = String;
    type Sort = ();
    type Value = u64;
    type Output = HashMap<String, u64>;

    fn map(&self, line: String) -> Result<Vec<Record<String, (), u64>>> {
        WordCount.map(line)
    }

    fn reduce(&self, key: String, values: Vec<u64>) -> Result<Vec<Record<String, (), u64>>> {
        WordCount.reduce(key, values)
    }

    fn output(&self, groups: Grouping<String, u64>) -> Result<Self::Output> {
        groups
            .into_iter()
            .map(|(key, mut values)| match (values.pop(), values.pop()) {
                (Some(count), None) => Ok((key, count)),
                _ => Err(anyhow!("expected exactly one count for {key}").into()),
            })
            .collect()
    }
}

#[test]
fn test_output_override_extracts_singletons() {
    let counts = Pipeline::new(WordCountScalar).run(lines()).unwrap();
    let expected: HashMap<String, u64> = [("the", 3), ("cat", 2), ("dog", 1)]
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    assert_eq!(counts, expected);
}

/// Routes every mapped record to one sentinel key so a single reduce
/// call sees the whole dataset.
struct Collapse {
    map_sort: SortPolicy,
}

impl MapReduce for Collapse {
    type Input = u64;
    type Key = ();
    type Sort = ();
    type Value = u64;
    type Output = Grouping<(), u64>;

    fn map(&self, item: u64) -> Result<Vec<Record<(), (), u64>>> {
        Ok(vec![Record::pair((), item)])
    }

    fn reduce(&self, key: (), values: Vec<u64>) -> Result<Vec<Record<(), (), u64>>> {
        Ok(vec![Record::pair(key, values.iter().sum())])
    }

    fn output(&self, groups: Grouping<(), u64>) -> Result<Self::Output> {
        Ok(groups)
    }

    fn map_sort(&self) -> SortPolicy {
        self.map_sort
    }
}

#[test]
fn test_key_collapsing_insensitive_to_map_sort() {
    let policies = [
        SortPolicy::default(),
        SortPolicy::disabled(),
        SortPolicy::by_value(),
        SortPolicy::by_value().reversed(),
    ];
    for map_sort in policies {
        let total = Pipeline::new(Collapse { map_sort })
            .run(vec![5, 1, 9, 2, 2])
            .unwrap();
        assert_eq!(total.get(&()), Some(&[19][..]), "policy {map_sort:?}");
    }
}

/// A reducer that fans one key's values back out to several keys.
struct FanOut;

impl MapReduce for FanOut {
    type Input = u64;
    type Key = &'static str;
    type Sort = ();
    type Value = u64;
    type Output = Grouping<&'static str, u64>;

    fn map(&self, item: u64) -> Result<Vec<Record<&'static str, (), u64>>> {
        Ok(vec![Record::pair("all", item)])
    }

    fn reduce(&self, _key: &'static str, values: Vec<u64>) -> Result<Vec<Record<&'static str, (), u64>>> {
        Ok(values
            .into_iter()
            .map(|n| {
                let bucket = if n % 2 == 0 { "even" } else { "odd" };
                Record::pair(bucket, n)
            })
            .collect())
    }

    fn output(&self, groups: Grouping<&'static str, u64>) -> Result<Self::Output> {
        Ok(groups)
    }
}

#[test]
fn test_reducer_fan_out() {
    let buckets = Pipeline::new(FanOut).run(vec![1, 2, 3, 4, 5]).unwrap();
    assert_eq!(buckets.get("odd"), Some(&[1, 3, 5][..]));
    assert_eq!(buckets.get("even"), Some(&[2, 4][..]));
}

#[test]
fn test_empty_input_yields_empty_mapping() {
    let counts = Pipeline::new(WordCount).run(Vec::new()).unwrap();
    assert!(counts.is_empty());
}

/// Grouping completeness over randomized input: every emitted value must
/// land in exactly one group.
struct CountPerKey;

impl MapReduce for CountPerKey {
    type Input = u64;
    type Key = u64;
    type Sort = ();
    type Value = u64;
    type Output = Grouping<u64, u64>;

    fn map(&self, item: u64) -> Result<Vec<Record<u64, (), u64>>> {
        Ok(vec![Record::pair(item % 10, item)])
    }

    fn reduce(&self, key: u64, values: Vec<u64>) -> Result<Vec<Record<u64, (), u64>>> {
        Ok(vec![Record::pair(key, values.len() as u64)])
    }

    fn output(&self, groups: Grouping<u64, u64>) -> Result<Self::Output> {
        Ok(groups)
    }
}

#[test]
fn test_grouping_completeness_random_input() {
    let mut rng = rand::rng();
    let items: Vec<u64> = (0..500).map(|_| rng.random_range(0..1000)).collect();
    let total = items.len() as u64;

    let groups = Pipeline::new(CountPerKey).run(items).unwrap();
    let counted: u64 = groups.iter().flat_map(|(_, counts)| counts).sum();
    assert_eq!(counted, total);
}
