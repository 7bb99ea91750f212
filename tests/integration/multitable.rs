use bucket_multimap::HashMultitable;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use test_strategy::{proptest, Arbitrary};

type NaiveMultitable = BTreeMap<(u8, u8), BTreeSet<u8>>;

fn snapshot(table: &HashMultitable<u8, u8, u8>) -> NaiveMultitable {
    table
        .iter()
        .map(|((key1, key2), bucket)| {
            assert!(
                !bucket.is_empty(),
                "pair ({key1}, {key2}) kept an empty bucket"
            );
            ((*key1, *key2), bucket.iter().copied().collect())
        })
        .collect()
}

fn prune(naive: &mut NaiveMultitable, keys: (u8, u8)) {
    if naive.get(&keys).is_some_and(BTreeSet::is_empty) {
        naive.remove(&keys);
    }
}

#[test]
fn scenario_double_cascade() {
    let mut table = HashMultitable::new();
    table.insert(1, 'a', "x");
    table.insert(1, 'b', "y");

    assert!(table.remove(&1, &'a', "x"));
    assert!(table.contains_key1(&1));
    assert!(table.remove(&1, &'b', "y"));
    assert!(!table.contains_key1(&1));
    assert!(table.get(&1, &'a').is_empty());
    assert!(table.is_empty());
}

#[test]
fn scenario_single_pair() {
    let mut table = HashMultitable::new();
    assert!(table.insert(1, "k", "v"));
    assert!(!table.insert(1, "k", "v"));
    assert!(table.contains(&1, "k", "v"));

    assert!(table.remove(&1, "k", "v"));
    assert!(!table.remove(&1, "k", "v"));
    assert!(table.get(&1, "k").is_empty());
    assert!(!table.contains_key1(&1));
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(u8, u8, u8),
    InsertAll(u8, u8, Vec<u8>),
    #[weight(3)]
    Remove(u8, u8, u8),
    RemoveAll(u8, u8, Vec<u8>),
    RemoveEntry(u8, u8),
    RemoveRow(u8),
}

#[proptest(cases = 32)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..256))] ops: Vec<Operation>,
) {
    let mut table = HashMultitable::new();
    let mut naive = NaiveMultitable::new();

    for op in ops {
        match op {
            Operation::Insert(key1, key2, value) => {
                let keys = (key1 % 4, key2 % 4);
                let grew = naive.entry(keys).or_default().insert(value % 8);
                assert_eq!(table.insert(keys.0, keys.1, value % 8), grew);
            }
            Operation::InsertAll(key1, key2, values) => {
                let keys = (key1 % 4, key2 % 4);
                let values: Vec<u8> = values.into_iter().map(|v| v % 8).collect();
                let set = naive.entry(keys).or_default();
                let grew = values
                    .iter()
                    .fold(false, |grew, value| set.insert(*value) | grew);
                prune(&mut naive, keys);
                assert_eq!(table.insert_all(keys.0, keys.1, values), grew);
            }
            Operation::Remove(key1, key2, value) => {
                let keys = (key1 % 4, key2 % 4);
                let removed = naive
                    .get_mut(&keys)
                    .is_some_and(|set| set.remove(&(value % 8)));
                prune(&mut naive, keys);
                assert_eq!(table.remove(&keys.0, &keys.1, &(value % 8)), removed);
            }
            Operation::RemoveAll(key1, key2, values) => {
                let keys = (key1 % 4, key2 % 4);
                let values: Vec<u8> = values.into_iter().map(|v| v % 8).collect();
                let removed = naive.get_mut(&keys).is_some_and(|set| {
                    values
                        .iter()
                        .fold(false, |removed, value| set.remove(value) | removed)
                });
                prune(&mut naive, keys);
                assert_eq!(table.remove_all(&keys.0, &keys.1, &values), removed);
            }
            Operation::RemoveEntry(key1, key2) => {
                let keys = (key1 % 4, key2 % 4);
                let removed = table
                    .remove_entry(&keys.0, &keys.1)
                    .map(|set| set.into_iter().collect::<BTreeSet<_>>());
                assert_eq!(removed, naive.remove(&keys));
            }
            Operation::RemoveRow(key1) => {
                let key1 = key1 % 4;
                let had_row = naive.keys().any(|(k1, _)| *k1 == key1);
                naive.retain(|(k1, _), _| *k1 != key1);
                assert_eq!(table.remove_row(&key1).is_some(), had_row);
            }
        }

        assert_eq!(snapshot(&table), naive);
        assert_eq!(table.len(), naive.len());
        for key1 in 0..4 {
            assert_eq!(
                table.contains_key1(&key1),
                naive.keys().any(|(k1, _)| *k1 == key1)
            );
        }
    }
}
