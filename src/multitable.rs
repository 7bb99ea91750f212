use crate::bucket::SetBucket;
use crate::repr::Represent;
use crate::table::{self, HashTable};
use hashbrown::{HashMap, HashSet};
use log::trace;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

/// A [`HashTable`] storing a set of distinct values at each `(key1, key2)`
/// pair.
///
/// Removing the last value of a pair removes the pair, and removing the last
/// pair of a primary key removes the primary key.
///
/// # Examples
///
/// ```
/// use bucket_multimap::HashMultitable;
///
/// let mut table = HashMultitable::new();
/// assert!(table.insert(1, "k", "v"));
/// assert!(!table.insert(1, "k", "v"));
///
/// assert!(table.remove(&1, "k", "v"));
/// assert!(table.get(&1, "k").is_empty());
/// assert!(!table.contains_key1(&1));
/// ```
#[derive(Clone)]
pub struct HashMultitable<K1, K2, V, S = RandomState> {
    table: HashTable<K1, K2, HashSet<V, S>, S>,
}

impl<K1, K2, V> HashMultitable<K1, K2, V, RandomState> {
    /// Creates an empty `HashMultitable`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K1, K2, V, S> HashMultitable<K1, K2, V, S> {
    /// Creates an empty `HashMultitable` which will use the given hash
    /// builder to hash keys and values.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::with_hasher(hash_builder),
        }
    }

    /// Returns the number of `(key1, key2)` pairs with at least one value.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values across all pairs.
    pub fn value_count(&self) -> usize {
        self.table.iter().map(|(_, set)| set.len()).sum()
    }

    /// Clears the table, removing all values.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting every key pair with its values, in arbitrary
    /// order.
    pub fn iter(&self) -> Iter<'_, K1, K2, V, S> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<K1, K2, V, S> HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the values at `(key1, key2)`, or an empty view if there are
    /// none.
    pub fn get<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> SetBucket<'_, V, S>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        SetBucket::new(self.table.get(key1, key2))
    }

    /// Returns the values at `(key1, key2)`, or `None` if there are none.
    ///
    /// A returned set is never empty.
    pub fn try_get<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Option<&HashSet<V, S>>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.table.get(key1, key2)
    }

    /// Returns `true` if `(key1, key2)` has at least one value.
    pub fn contains_key<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.table.contains(key1, key2)
    }

    /// Returns `true` if any pair with the primary key has a value.
    pub fn contains_key1<Q>(&self, key1: &Q) -> bool
    where
        K1: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key1(key1)
    }

    /// Returns `true` if `(key1, key2)` maps to the value.
    pub fn contains<Q1, Q2, R>(&self, key1: &Q1, key2: &Q2, value: &R) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        V: Borrow<R>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
        R: ?Sized + Hash + Eq,
    {
        self.get(key1, key2).contains(value)
    }

    /// Removes every pair with the primary key, returning their values keyed
    /// by the secondary key.
    pub fn remove_row<Q>(&mut self, key1: &Q) -> Option<HashMap<K2, HashSet<V, S>, S>>
    where
        K1: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_row(key1)
    }

    /// Removes all values at `(key1, key2)`, returning them if there were
    /// any.
    pub fn remove_entry<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Option<HashSet<V, S>>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.table.remove(key1, key2)
    }

    /// Removes the value at `(key1, key2)`. Returns whether it was present.
    pub fn remove<Q1, Q2, R>(&mut self, key1: &Q1, key2: &Q2, value: &R) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        V: Borrow<R>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
        R: ?Sized + Hash + Eq,
    {
        self.table
            .update_bucket(key1, key2, |set| set.remove(value))
            .unwrap_or(false)
    }

    /// Removes each of the given values at `(key1, key2)`. Returns whether any
    /// of them were present.
    pub fn remove_all<'a, Q1, Q2, I>(&mut self, key1: &Q1, key2: &Q2, values: I) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
        V: 'a,
        I: IntoIterator<Item = &'a V>,
    {
        self.table
            .update_bucket(key1, key2, |set| {
                values
                    .into_iter()
                    .fold(false, |changed, value| set.remove(value) | changed)
            })
            .unwrap_or(false)
    }
}

impl<K1, K2, V, S> HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Adds the value at `(key1, key2)`. Returns whether it was not already
    /// present.
    pub fn insert(&mut self, key1: K1, key2: K2, value: V) -> bool {
        if let Some(set) = self.table.get_mut(&key1, &key2) {
            return set.insert(value);
        }

        let mut set = HashSet::with_hasher(self.table.hasher().clone());
        set.insert(value);
        self.table.insert(key1, key2, set);
        trace!("created multitable bucket");
        true
    }

    /// Adds each of the values at `(key1, key2)`. Returns whether any of them
    /// were not already present.
    ///
    /// Adding no values leaves the pair absent.
    pub fn insert_all<I>(&mut self, key1: K1, key2: K2, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        if let Some(set) = self.table.get_mut(&key1, &key2) {
            return values
                .into_iter()
                .fold(false, |changed, value| set.insert(value) | changed);
        }

        let mut set = HashSet::with_hasher(self.table.hasher().clone());
        set.extend(values);
        if set.is_empty() {
            return false;
        }

        self.table.insert(key1, key2, set);
        trace!("created multitable bucket");
        true
    }
}

impl<K1, K2, V, S> Default for HashMultitable<K1, K2, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K1, K2, V, S> PartialEq for HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<K1, K2, V, S> Eq for HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
}

impl<K1, K2, V, S> Debug for HashMultitable<K1, K2, V, S>
where
    K1: Debug,
    K2: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K1, K2, V, S> FromIterator<((K1, K2), V)> for HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = ((K1, K2), V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K1, K2, V, S> Extend<((K1, K2), V)> for HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = ((K1, K2), V)>>(&mut self, iter: I) {
        for ((key1, key2), value) in iter {
            self.insert(key1, key2, value);
        }
    }
}

impl<'a, K1, K2, V, S> IntoIterator for &'a HashMultitable<K1, K2, V, S> {
    type Item = ((&'a K1, &'a K2), SetBucket<'a, V, S>);
    type IntoIter = Iter<'a, K1, K2, V, S>;

    fn into_iter(self) -> Iter<'a, K1, K2, V, S> {
        self.iter()
    }
}

/// A `HashMultitable` is represented like a [`HashTable`] whose values are
/// sets.
impl<K1, K2, V, S> Represent for HashMultitable<K1, K2, V, S>
where
    K1: Eq + Hash + Clone + 'static,
    K2: Eq + Hash + Clone + 'static,
    V: Eq + Hash + Clone + 'static,
    S: BuildHasher + Clone + 'static,
{
    type Rep = Vec<((K1, K2), HashSet<V, S>)>;

    fn to_rep(&self) -> Self::Rep {
        self.table.to_rep()
    }

    fn read_rep(&mut self, rep: Self::Rep) {
        for ((key1, key2), values) in rep {
            self.insert_all(key1, key2, values);
        }
    }
}

/// An iterator over the key pairs of a `HashMultitable` and their values.
pub struct Iter<'a, K1, K2, V, S> {
    inner: table::Iter<'a, K1, K2, HashSet<V, S>, S>,
}

impl<'a, K1, K2, V, S> Iterator for Iter<'a, K1, K2, V, S> {
    type Item = ((&'a K1, &'a K2), SetBucket<'a, V, S>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(keys, set)| (keys, SetBucket::new(Some(set))))
    }
}

impl<K1, K2, V, S> FusedIterator for Iter<'_, K1, K2, V, S> {}
