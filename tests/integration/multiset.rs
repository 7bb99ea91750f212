use bucket_multimap::HashMultiset;
use proptest::prelude::*;
use std::collections::BTreeMap;
use test_strategy::{proptest, Arbitrary};

#[test]
fn scenario_counts() {
    let mut bag = HashMultiset::new();
    bag.insert_n("x", 3);
    bag.insert_n("x", 2);
    assert_eq!(bag.count("x"), 5);
    assert_eq!(bag.len(), 5);

    assert_eq!(bag.remove_n("x", 10), 5);
    assert_eq!(bag.count("x"), 0);
    assert!(!bag.contains("x"));
    assert!(bag.is_empty());
}

#[test]
fn clear_resets_total() {
    let mut bag: HashMultiset<u8> = [1, 1, 2].into_iter().collect();
    assert_eq!(bag.len(), 3);

    bag.clear();
    assert_eq!(bag.len(), 0);
    bag.insert(4);
    assert_eq!(bag.len(), 1);
}

#[test]
fn iter_repeats_each_element() {
    let mut bag = HashMultiset::new();
    bag.insert_n('a', 2);
    bag.insert_n('b', 3);

    let mut all: Vec<char> = bag.iter().copied().collect();
    assert_eq!(bag.iter().len(), 5);
    all.sort_unstable();
    assert_eq!(all, ['a', 'a', 'b', 'b', 'b']);
}

#[derive(Debug, Arbitrary)]
enum Operation {
    #[weight(3)]
    Insert(u8),
    #[weight(2)]
    InsertN(u8, u8),
    SetCount(u8, u8),
    #[weight(2)]
    Remove(u8),
    RemoveN(u8, u8),
}

#[proptest(cases = 32)]
fn proptest_ops(
    #[strategy(prop::collection::vec(any::<Operation>(), 0..256))] ops: Vec<Operation>,
) {
    let mut bag = HashMultiset::new();
    let mut naive: BTreeMap<u8, usize> = BTreeMap::new();

    for op in ops {
        match op {
            Operation::Insert(element) => {
                let element = element % 8;
                *naive.entry(element).or_default() += 1;
                bag.insert(element);
            }
            Operation::InsertN(element, n) => {
                let (element, n) = (element % 8, usize::from(n % 8));
                if n > 0 {
                    *naive.entry(element).or_default() += n;
                }
                bag.insert_n(element, n);
            }
            Operation::SetCount(element, n) => {
                let (element, n) = (element % 8, usize::from(n % 8));
                let prev = naive.get(&element).copied().unwrap_or(0);
                if n == 0 {
                    naive.remove(&element);
                } else {
                    naive.insert(element, n);
                }
                assert_eq!(bag.set_count(element, n), prev != n);
            }
            Operation::Remove(element) => {
                let element = element % 8;
                let prev = naive.get(&element).copied().unwrap_or(0);
                match prev {
                    0 => {}
                    1 => {
                        naive.remove(&element);
                    }
                    _ => {
                        naive.insert(element, prev - 1);
                    }
                }
                assert_eq!(bag.remove(&element), prev > 0);
            }
            Operation::RemoveN(element, n) => {
                let (element, n) = (element % 8, usize::from(n % 8));
                let prev = naive.get(&element).copied().unwrap_or(0);
                let removed = prev.min(n);
                if prev - removed == 0 {
                    naive.remove(&element);
                } else {
                    naive.insert(element, prev - removed);
                }
                assert_eq!(bag.remove_n(&element, n), removed);
            }
        }

        let counts: BTreeMap<u8, usize> = bag
            .counts()
            .map(|(element, count)| {
                assert!(count > 0, "element {element} kept a zero count");
                (*element, count)
            })
            .collect();
        assert_eq!(counts, naive);
        assert_eq!(bag.len(), naive.values().sum::<usize>());
        assert_eq!(bag.distinct_len(), naive.len());
    }
}
