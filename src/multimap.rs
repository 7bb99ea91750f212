use crate::bucket::{with_bucket_mut, SetBucket};
use crate::repr::Represent;
use hashbrown::{hash_map, HashMap, HashSet};
use log::trace;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

/// Multimap where each key maps to a set of distinct values.
///
/// A key is present exactly when it has at least one value.
///
/// # Examples
///
/// ```
/// use bucket_multimap::HashMultimap;
///
/// let mut map = HashMultimap::new();
/// assert!(map.insert("a", 1));
/// assert!(!map.insert("a", 1));
/// assert_eq!(map.get("a").len(), 1);
///
/// assert!(map.remove("a", &1));
/// assert!(map.get("a").is_empty());
/// assert!(!map.contains_key("a"));
/// ```
#[derive(Clone)]
pub struct HashMultimap<K, V, S = RandomState> {
    pub(crate) map: HashMap<K, HashSet<V, S>, S>,
}

impl<K, V> HashMultimap<K, V, RandomState> {
    /// Creates an empty `HashMultimap`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> HashMultimap<K, V, S> {
    /// Creates an empty `HashMultimap` which will use the given hash builder to
    /// hash keys and values.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Returns a reference to the map's [`BuildHasher`].
    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map contains no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of key-value pairs.
    pub fn value_count(&self) -> usize {
        self.map.values().map(HashSet::len).sum()
    }

    /// Clears the map, removing all keys and values.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// An iterator visiting every key with its values, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// An iterator visiting all distinct keys in arbitrary order.
    pub fn keys(&self) -> hash_map::Keys<'_, K, HashSet<V, S>> {
        self.map.keys()
    }

    /// An iterator visiting every value of every key, in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }
}

impl<K, V, S> HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the values for the key, or an empty view if there are none.
    pub fn get<Q>(&self, key: &Q) -> SetBucket<'_, V, S>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        SetBucket::new(self.map.get(key))
    }

    /// Returns the values for the key, or `None` if there are none.
    ///
    /// A returned set is never empty.
    pub fn try_get<Q>(&self, key: &Q) -> Option<&HashSet<V, S>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    /// Returns `true` if the key has at least one value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Returns `true` if the key maps to the value.
    pub fn contains<Q, R>(&self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: ?Sized + Hash + Eq,
        R: ?Sized + Hash + Eq,
    {
        self.map.get(key).is_some_and(|set| set.contains(value))
    }

    /// Removes all values for the key, returning them if there were any.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<HashSet<V, S>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Removes the key-value pair. Returns whether it was present.
    pub fn remove<Q, R>(&mut self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: ?Sized + Hash + Eq,
        R: ?Sized + Hash + Eq,
    {
        with_bucket_mut(&mut self.map, key, |set| set.remove(value)).unwrap_or(false)
    }

    /// Removes each of the given values from the key. Returns whether any of
    /// them were present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::HashMultimap;
    ///
    /// let mut map = HashMultimap::new();
    /// map.insert_all("a", [1, 2]);
    ///
    /// assert!(map.remove_all("a", &[2, 3]));
    /// assert!(!map.remove_all("a", &[3]));
    /// assert!(map.remove_all("a", &[1]));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_all<'a, Q, I>(&mut self, key: &Q, values: I) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: 'a,
        I: IntoIterator<Item = &'a V>,
    {
        with_bucket_mut(&mut self.map, key, |set| {
            values
                .into_iter()
                .fold(false, |changed, value| set.remove(value) | changed)
        })
        .unwrap_or(false)
    }
}

impl<K, V, S> HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Adds the value to the key. Returns whether it was not already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if let Some(set) = self.map.get_mut(&key) {
            return set.insert(value);
        }

        let mut set = HashSet::with_hasher(self.map.hasher().clone());
        set.insert(value);
        self.map.insert(key, set);
        trace!("created multimap bucket");
        true
    }

    /// Adds each of the values to the key. Returns whether any of them were
    /// not already present.
    ///
    /// Adding no values leaves the key absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::HashMultimap;
    ///
    /// let mut map: HashMultimap<&str, i32> = HashMultimap::new();
    /// assert!(!map.insert_all("a", []));
    /// assert!(!map.contains_key("a"));
    ///
    /// assert!(map.insert_all("a", [1, 2]));
    /// assert!(!map.insert_all("a", [2]));
    /// ```
    pub fn insert_all<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        if let Some(set) = self.map.get_mut(&key) {
            return values
                .into_iter()
                .fold(false, |changed, value| set.insert(value) | changed);
        }

        let mut set = HashSet::with_hasher(self.map.hasher().clone());
        set.extend(values);
        if set.is_empty() {
            return false;
        }

        self.map.insert(key, set);
        trace!("created multimap bucket");
        true
    }
}

impl<K, V, S> Default for HashMultimap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, V, S> Eq for HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, V, S> Debug for HashMultimap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMultimap<K, V, S> {
    type Item = (&'a K, SetBucket<'a, V, S>);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Iter<'a, K, V, S> {
        self.iter()
    }
}

/// A `HashMultimap` is represented as a map from each key to its set of
/// values.
impl<K, V, S> Represent for HashMultimap<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Eq + Hash + Clone + 'static,
    S: BuildHasher + Clone + 'static,
{
    type Rep = HashMap<K, HashSet<V, S>, S>;

    fn to_rep(&self) -> Self::Rep {
        self.map.clone()
    }

    fn read_rep(&mut self, rep: Self::Rep) {
        for (key, values) in rep {
            self.insert_all(key, values);
        }
    }
}

/// An iterator over the keys of a `HashMultimap` and their values.
pub struct Iter<'a, K, V, S> {
    inner: hash_map::Iter<'a, K, HashSet<V, S>>,
}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, SetBucket<'a, V, S>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, set)| (key, SetBucket::new(Some(set))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, S> FusedIterator for Iter<'_, K, V, S> {}
