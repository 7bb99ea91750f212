use bucket_multimap::HashMultimap;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use test_strategy::{proptest, Arbitrary};

type NaiveMultimap = BTreeMap<u8, BTreeSet<u8>>;

fn snapshot(map: &HashMultimap<u8, u8>) -> NaiveMultimap {
    map.iter()
        .map(|(key, bucket)| {
            assert!(!bucket.is_empty(), "key {key} kept an empty bucket");
            (*key, bucket.iter().copied().collect())
        })
        .collect()
}

#[test]
fn scenario_tags() {
    let mut tags = HashMultimap::new();
    assert!(tags.insert("a", 1));
    assert!(tags.insert("a", 2));
    assert!(!tags.insert("a", 1));
    assert_eq!(tags.value_count(), 2);

    assert!(tags.remove("a", &1));
    assert!(tags.remove("a", &2));
    assert!(!tags.contains_key("a"));
    assert!(tags.get("a").is_empty());
    assert!(tags.try_get("a").is_none());
}

#[test]
fn absent_keys_share_the_empty_view() {
    let map: HashMultimap<u8, u8> = HashMultimap::new();
    assert_eq!(map.get(&1), map.get(&2));
    assert_eq!(map.get(&1).iter().count(), 0);
}

#[test]
fn collect_and_compare() {
    let map: HashMultimap<u8, u8> = [(1, 2), (1, 3), (2, 2), (1, 2)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.value_count(), 3);

    let mut other = HashMultimap::new();
    other.insert_all(2, [2]);
    other.insert_all(1, [3, 2]);
    assert_eq!(map, other);

    let copy = map.clone();
    assert_eq!(copy, map);
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(u8, u8),
    #[weight(2)]
    InsertAll(u8, Vec<u8>),
    #[weight(2)]
    Remove(u8, u8),
    RemoveAll(u8, Vec<u8>),
    RemoveKey(u8),
    Get(u8),
}

#[proptest(cases = 32)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..256))] ops: Vec<Operation>,
) {
    let mut map = HashMultimap::new();
    let mut naive = NaiveMultimap::new();

    for op in ops {
        match op {
            Operation::Insert(key, value) => {
                let key = key % 8;
                let grew = naive.entry(key).or_default().insert(value);
                assert_eq!(map.insert(key, value), grew);
            }
            Operation::InsertAll(key, values) => {
                let key = key % 8;
                let set = naive.entry(key).or_default();
                let grew = values
                    .iter()
                    .fold(false, |grew, value| set.insert(*value) | grew);
                if set.is_empty() {
                    naive.remove(&key);
                }
                assert_eq!(map.insert_all(key, values), grew);
            }
            Operation::Remove(key, value) => {
                let key = key % 8;
                let removed = naive.get_mut(&key).is_some_and(|set| set.remove(&value));
                if naive.get(&key).is_some_and(BTreeSet::is_empty) {
                    naive.remove(&key);
                }
                assert_eq!(map.remove(&key, &value), removed);
            }
            Operation::RemoveAll(key, values) => {
                let key = key % 8;
                let removed = naive.get_mut(&key).is_some_and(|set| {
                    values
                        .iter()
                        .fold(false, |removed, value| set.remove(value) | removed)
                });
                if naive.get(&key).is_some_and(BTreeSet::is_empty) {
                    naive.remove(&key);
                }
                assert_eq!(map.remove_all(&key, &values), removed);
            }
            Operation::RemoveKey(key) => {
                let key = key % 8;
                let removed = naive.remove(&key);
                let map_removed = map
                    .remove_key(&key)
                    .map(|set| set.into_iter().collect::<BTreeSet<_>>());
                assert_eq!(map_removed, removed);
            }
            Operation::Get(key) => {
                let key = key % 8;
                let expected = naive.get(&key).map_or(0, BTreeSet::len);
                assert_eq!(map.get(&key).len(), expected);
                assert_eq!(map.contains_key(&key), expected > 0);
            }
        }

        assert_eq!(snapshot(&map), naive);
        assert_eq!(map.len(), naive.len());
        assert_eq!(
            map.value_count(),
            naive.values().map(BTreeSet::len).sum::<usize>()
        );
    }
}
