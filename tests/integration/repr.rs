use bucket_multimap::{
    convert, ConvertError, DynRepresent, HashMultimap, HashMultiset, HashMultitable, HashTable,
    JsonRepresent, ListMultimap, Represent,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use test_strategy::proptest;

#[test]
fn list_document_keeps_duplicates() {
    let mut lists: ListMultimap<String, u32> = ListMultimap::new();
    lists.insert_all("k".to_owned(), [1, 2, 2, 3]);

    let text = serde_json::to_string(&lists).unwrap();
    assert_eq!(text, r#"{"k":[1,2,2,3]}"#);

    let restored: ListMultimap<String, u32> = serde_json::from_str(&text).unwrap();
    assert_eq!(restored.get("k"), &[1, 2, 2, 3]);
    assert_eq!(restored, lists);
}

#[derive(Debug, Serialize, Deserialize)]
struct Settings {
    tags: Option<HashMultimap<String, u32>>,
    other: Option<HashMultimap<String, u32>>,
}

#[test]
fn null_is_absent_and_empty_is_present() {
    let settings: Settings = serde_json::from_str(r#"{"tags": null, "other": {}}"#).unwrap();
    assert!(settings.tags.is_none());
    assert!(settings.other.as_ref().is_some_and(HashMultimap::is_empty));

    let text = serde_json::to_string(&settings).unwrap();
    assert_eq!(text, r#"{"tags":null,"other":{}}"#);
}

#[test]
fn negative_count_is_rejected() {
    let result = serde_json::from_str::<HashMultiset<String>>(r#"[["x", -1]]"#);
    assert!(result.is_err());

    let mut set: HashMultiset<String> = HashMultiset::new();
    let error = set.read_json(json!([["x", -2]])).unwrap_err();
    assert!(matches!(error, ConvertError::Json(_)));
    assert!(set.is_empty());
}

#[test]
fn zero_counts_and_empty_buckets_are_dropped() {
    let set: HashMultiset<String> = serde_json::from_str(r#"[["x", 0], ["y", 2]]"#).unwrap();
    assert_eq!(set.distinct_len(), 1);
    assert_eq!(set.len(), 2);

    let map: HashMultimap<String, u32> = serde_json::from_str(r#"{"a": [], "b": [1]}"#).unwrap();
    assert!(!map.contains_key("a"));
    assert_eq!(map.len(), 1);

    let lists: ListMultimap<String, u32> = serde_json::from_str(r#"{"a": []}"#).unwrap();
    assert!(lists.is_empty());

    let table: HashMultitable<u8, u8, u8> = serde_json::from_str("[[[1, 2], []]]").unwrap();
    assert!(table.is_empty());
    assert!(!table.contains_key1(&1));
}

#[test]
fn table_document_shape() {
    let mut grades = HashTable::new();
    grades.insert("alice".to_owned(), "math".to_owned(), 90);

    let document = serde_json::to_value(&grades).unwrap();
    assert_eq!(document, json!([[["alice", "math"], 90]]));

    let restored: HashTable<String, String, i32> = serde_json::from_value(document).unwrap();
    assert_eq!(restored, grades);
}

#[test]
fn read_rep_merges_into_existing() {
    let mut map = HashMultimap::new();
    map.insert("a", 1);

    let mut incoming = HashMultimap::new();
    incoming.insert("a", 2);
    incoming.insert("b", 3);

    map.read_rep(incoming.to_rep());
    assert_eq!(map.value_count(), 3);
    assert!(map.contains("a", &1));
    assert!(map.contains("a", &2));
}

#[test]
fn deserialize_into_merges_and_in_place_replaces() {
    let mut set: HashMultiset<String> = HashMultiset::new();
    set.insert_n("x".to_owned(), 2);

    let mut deserializer = serde_json::Deserializer::from_str(r#"[["x", 1]]"#);
    convert::deserialize_into(&mut deserializer, &mut set).unwrap();
    assert_eq!(set.count("x"), 3);

    let mut deserializer = serde_json::Deserializer::from_str(r#"[["y", 1]]"#);
    HashMultiset::deserialize_in_place(&mut deserializer, &mut set).unwrap();
    assert_eq!(set.count("x"), 0);
    assert_eq!(set.count("y"), 1);
}

#[test]
fn snapshot_is_detached() {
    let mut set: HashMultiset<u8> = [1, 1].into_iter().collect();
    let mut rep = set.to_rep();
    rep.push((9, 4));
    set.insert(2);

    assert_eq!(set.count(&9), 0);
    assert_eq!(rep.len(), 2);
}

#[test]
fn untyped_mismatch_leaves_target_untouched() {
    let mut map: HashMultimap<String, u32> = HashMultimap::new();
    map.insert("a".to_owned(), 1);

    let error = map.read_rep_any(Box::new(vec![1u32])).unwrap_err();
    assert_eq!(
        error.expected(),
        <HashMultimap<String, u32> as Represent>::rep_type().name()
    );
    assert_eq!(map.value_count(), 1);

    let mut other: HashMultimap<String, u32> = HashMultimap::new();
    other.read_rep_any(map.to_rep_any()).unwrap();
    assert_eq!(other, map);
}

#[test]
fn null_document_is_a_mismatch() {
    let mut lists: ListMultimap<String, u32> = ListMultimap::new();
    match lists.read_json(serde_json::Value::Null) {
        Err(ConvertError::Mismatch(error)) => assert_eq!(error.found(), Some("null")),
        other => panic!("expected a mismatch, got {other:?}"),
    }

    let error = lists.read_json(json!("text")).unwrap_err();
    assert!(matches!(error, ConvertError::Json(_)));
}

/// A container outside this crate using the generic converter.
#[derive(Debug, Default, PartialEq)]
struct Ring {
    slots: Vec<u16>,
}

impl Represent for Ring {
    type Rep = Vec<u16>;

    fn to_rep(&self) -> Vec<u16> {
        self.slots.clone()
    }

    fn read_rep(&mut self, rep: Vec<u16>) {
        self.slots.extend(rep);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Holder {
    #[serde(with = "convert")]
    ring: Ring,
    #[serde(with = "convert::option", default)]
    spare: Option<Ring>,
}

#[test]
fn converter_works_for_foreign_types() {
    let holder = Holder {
        ring: Ring { slots: vec![4, 5] },
        spare: None,
    };

    let text = serde_json::to_string(&holder).unwrap();
    assert_eq!(text, r#"{"ring":[4,5],"spare":null}"#);

    let restored: Holder = serde_json::from_str(r#"{"ring":[4,5],"spare":[]}"#).unwrap();
    assert_eq!(restored.ring, holder.ring);
    assert_eq!(restored.spare, Some(Ring::default()));

    let restored: Holder = serde_json::from_str(r#"{"ring":[]}"#).unwrap();
    assert!(restored.spare.is_none());
}

#[proptest(cases = 64)]
fn proptest_list_roundtrip(entries: Vec<(u8, u16)>) {
    let lists: ListMultimap<u8, u16> = entries.into_iter().collect();

    let text = serde_json::to_string(&lists).unwrap();
    let restored: ListMultimap<u8, u16> = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, lists);
}

#[proptest(cases = 64)]
fn proptest_multiset_roundtrip(elements: Vec<u8>) {
    let set: HashMultiset<u8> = elements.into_iter().collect();

    let document = set.to_json().unwrap();
    let mut restored: HashMultiset<u8> = HashMultiset::new();
    restored.read_json(document).unwrap();
    assert_eq!(restored, set);
    assert_eq!(restored.len(), set.len());
}

#[proptest(cases = 64)]
fn proptest_multimap_roundtrip(entries: Vec<(u8, u8)>) {
    let map: HashMultimap<u8, u8> = entries.into_iter().collect();

    let text = serde_json::to_string(&map).unwrap();
    let restored: HashMultimap<u8, u8> = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, map);
    assert_eq!(restored.value_count(), map.value_count());
}

#[proptest(cases = 64)]
fn proptest_table_roundtrip(entries: Vec<((u8, u8), u16)>) {
    let table: HashTable<u8, u8, u16> = entries.into_iter().collect();

    let text = serde_json::to_string(&table).unwrap();
    let restored: HashTable<u8, u8, u16> = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, table);
    assert_eq!(restored.row_count(), table.row_count());
}

#[proptest(cases = 64)]
fn proptest_multitable_roundtrip(entries: Vec<((u8, u8), u8)>) {
    let table: HashMultitable<u8, u8, u8> = entries.into_iter().collect();

    let document = table.to_json().unwrap();
    let mut restored: HashMultitable<u8, u8, u8> = HashMultitable::new();
    restored.read_json(document).unwrap();
    assert_eq!(restored, table);
    assert_eq!(restored.value_count(), table.value_count());
}
