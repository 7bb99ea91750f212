//! Hash-based multi-value containers that never keep empty buckets.
//!
//! ---
//!
//! [`HashMultimap`] and [`ListMultimap`] map each key to a bucket of values:
//!  - `a -> {1, 2}`
//!  - `b -> {3}`
//!
//! A key is present exactly when its bucket holds at least one value. Removing
//! the last value of a key removes the key, so asking for an absent key and a
//! key whose values were all removed look the same.
//!
//! [`HashTable`] maps a pair of keys to a single value, stored as rows of
//! inner maps. [`HashMultitable`] maps a pair of keys to a set of values, and
//! prunes emptied inner maps and rows as values are removed.
//!
//! [`HashMultiset`] stores each distinct element once with its count:
//!  - `a -> 2`
//!  - `b -> 1`
//!
//! ---
//!
//! Every container can produce a plain snapshot of its contents and rebuild
//! itself from one; see [`Represent`]. With the `serde` feature the containers
//! serialize as those snapshots, and [`convert`] offers the same converter for
//! use on struct fields.

mod bucket;

/// Error types returned by lookups and representation restores.
pub mod errors;

/// Multimap where each key maps to an ordered list of values.
pub mod list_multimap;

/// Multimap where each key maps to a set of values.
pub mod multimap;

/// Multiset storing each distinct element with its count.
pub mod multiset;

/// Two-key map from a pair of keys to a set of values.
pub mod multitable;

/// Plain snapshots of container contents.
pub mod repr;

/// Two-key map from a pair of keys to a single value.
pub mod table;

#[cfg(feature = "serde")]
pub mod convert;

#[cfg(feature = "rayon")]
mod rayon;

#[cfg(feature = "serde")]
mod serde;

pub use bucket::{Iter as SetBucketIter, SetBucket};
#[cfg(feature = "json")]
pub use errors::ConvertError;
pub use errors::{KeyNotFound, RepMismatch};
pub use list_multimap::ListMultimap;
pub use multimap::HashMultimap;
pub use multiset::HashMultiset;
pub use multitable::HashMultitable;
#[cfg(feature = "json")]
pub use repr::JsonRepresent;
pub use repr::{DynRepresent, RepType, Represent};
pub use table::HashTable;
