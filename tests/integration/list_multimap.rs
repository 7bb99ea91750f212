use bucket_multimap::ListMultimap;
use proptest::prelude::*;
use std::collections::BTreeMap;
use test_strategy::{proptest, Arbitrary};

type NaiveListMultimap = BTreeMap<u8, Vec<u8>>;

fn snapshot(map: &ListMultimap<u8, u8>) -> NaiveListMultimap {
    map.iter()
        .map(|(key, values)| {
            assert!(!values.is_empty(), "key {key} kept an empty list");
            (*key, values.to_vec())
        })
        .collect()
}

fn remove_first(list: &mut Vec<u8>, value: u8) -> bool {
    match list.iter().position(|v| *v == value) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

#[test]
fn duplicates_are_kept_in_order() {
    let mut map = ListMultimap::new();
    map.insert("k", 1);
    map.insert("k", 2);
    map.insert("k", 1);
    assert_eq!(map.get("k"), &[1, 2, 1]);
    assert_eq!(map.value_count(), 3);

    assert!(map.contains("k", &2));
    assert!(!map.contains("j", &2));
}

#[test]
fn remove_key_returns_list() {
    let mut map = ListMultimap::new();
    map.insert_all('a', [3, 3]);

    assert_eq!(map.remove_key(&'a'), Some(vec![3, 3]));
    assert_eq!(map.remove_key(&'a'), None);
    assert!(map.is_empty());
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(u8, u8),
    #[weight(2)]
    InsertAll(u8, Vec<u8>),
    #[weight(3)]
    Remove(u8, u8),
    RemoveAll(u8, Vec<u8>),
    RemoveKey(u8),
}

#[proptest(cases = 32)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..256))] ops: Vec<Operation>,
) {
    let mut map = ListMultimap::new();
    let mut naive = NaiveListMultimap::new();

    for op in ops {
        match op {
            Operation::Insert(key, value) => {
                let (key, value) = (key % 8, value % 4);
                naive.entry(key).or_default().push(value);
                map.insert(key, value);
            }
            Operation::InsertAll(key, values) => {
                let key = key % 8;
                let values: Vec<u8> = values.into_iter().map(|v| v % 4).collect();
                if !values.is_empty() {
                    naive.entry(key).or_default().extend(&values);
                }
                assert_eq!(map.insert_all(key, values.clone()), !values.is_empty());
            }
            Operation::Remove(key, value) => {
                let (key, value) = (key % 8, value % 4);
                let removed = naive
                    .get_mut(&key)
                    .is_some_and(|list| remove_first(list, value));
                if naive.get(&key).is_some_and(Vec::is_empty) {
                    naive.remove(&key);
                }
                assert_eq!(map.remove(&key, &value), removed);
            }
            Operation::RemoveAll(key, values) => {
                let key = key % 8;
                let values: Vec<u8> = values.into_iter().map(|v| v % 4).collect();
                let removed = naive.get_mut(&key).is_some_and(|list| {
                    values
                        .iter()
                        .fold(false, |removed, value| remove_first(list, *value) | removed)
                });
                if naive.get(&key).is_some_and(Vec::is_empty) {
                    naive.remove(&key);
                }
                assert_eq!(map.remove_all(&key, &values), removed);
            }
            Operation::RemoveKey(key) => {
                let key = key % 8;
                assert_eq!(map.remove_key(&key), naive.remove(&key));
            }
        }

        assert_eq!(snapshot(&map), naive);
        assert_eq!(
            map.value_count(),
            naive.values().map(Vec::len).sum::<usize>()
        );
    }
}
