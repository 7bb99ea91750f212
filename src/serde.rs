//! Serde support. Each container serializes as its representation (see
//! [`Represent`](crate::Represent)) through the generic converter in
//! [`convert`].
//!
//! In-place deserialization replaces the previous contents, as serde expects.

use crate::convert;
use crate::{HashMultimap, HashMultiset, HashMultitable, HashTable, ListMultimap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{BuildHasher, Hash};

impl<K1, K2, V, H> Serialize for HashTable<K1, K2, V, H>
where
    K1: Serialize + Eq + Hash + Clone + 'static,
    K2: Serialize + Eq + Hash + Clone + 'static,
    V: Serialize + Clone + 'static,
    H: BuildHasher + Clone,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        convert::serialize(self, serializer)
    }
}

impl<'de, K1, K2, V, S> Deserialize<'de> for HashTable<K1, K2, V, S>
where
    K1: Deserialize<'de> + Eq + Hash + Clone + 'static,
    K2: Deserialize<'de> + Eq + Hash + Clone + 'static,
    V: Deserialize<'de> + Clone + 'static,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert::deserialize(deserializer)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        place.clear();
        convert::deserialize_into(deserializer, place)
    }
}

impl<K, V, H> Serialize for HashMultimap<K, V, H>
where
    K: Serialize + Eq + Hash + Clone + 'static,
    V: Serialize + Eq + Hash + Clone + 'static,
    H: BuildHasher + Clone + 'static,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        convert::serialize(self, serializer)
    }
}

impl<'de, K, V, S> Deserialize<'de> for HashMultimap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash + Clone + 'static,
    V: Deserialize<'de> + Eq + Hash + Clone + 'static,
    S: BuildHasher + Clone + Default + 'static,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert::deserialize(deserializer)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        place.clear();
        convert::deserialize_into(deserializer, place)
    }
}

impl<K, V, H> Serialize for ListMultimap<K, V, H>
where
    K: Serialize + Eq + Hash + Clone + 'static,
    V: Serialize + Clone + 'static,
    H: BuildHasher + Clone + 'static,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        convert::serialize(self, serializer)
    }
}

impl<'de, K, V, S> Deserialize<'de> for ListMultimap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash + Clone + 'static,
    V: Deserialize<'de> + Clone + 'static,
    S: BuildHasher + Clone + Default + 'static,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert::deserialize(deserializer)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        place.clear();
        convert::deserialize_into(deserializer, place)
    }
}

impl<T, H> Serialize for HashMultiset<T, H>
where
    T: Serialize + Eq + Hash + Clone + 'static,
    H: BuildHasher,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        convert::serialize(self, serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for HashMultiset<T, S>
where
    T: Deserialize<'de> + Eq + Hash + Clone + 'static,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert::deserialize(deserializer)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        place.clear();
        convert::deserialize_into(deserializer, place)
    }
}

impl<K1, K2, V, H> Serialize for HashMultitable<K1, K2, V, H>
where
    K1: Serialize + Eq + Hash + Clone + 'static,
    K2: Serialize + Eq + Hash + Clone + 'static,
    V: Serialize + Eq + Hash + Clone + 'static,
    H: BuildHasher + Clone + 'static,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        convert::serialize(self, serializer)
    }
}

impl<'de, K1, K2, V, S> Deserialize<'de> for HashMultitable<K1, K2, V, S>
where
    K1: Deserialize<'de> + Eq + Hash + Clone + 'static,
    K2: Deserialize<'de> + Eq + Hash + Clone + 'static,
    V: Deserialize<'de> + Eq + Hash + Clone + 'static,
    S: BuildHasher + Clone + Default + 'static,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert::deserialize(deserializer)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        place.clear();
        convert::deserialize_into(deserializer, place)
    }
}
