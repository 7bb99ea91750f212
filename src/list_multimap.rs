use crate::bucket::with_bucket_mut;
use crate::repr::Represent;
use hashbrown::{hash_map, HashMap};
use log::trace;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

/// Multimap where each key maps to an ordered list of values, duplicates
/// included.
///
/// A key is present exactly when its list is non-empty.
///
/// # Examples
///
/// ```
/// use bucket_multimap::ListMultimap;
///
/// let mut map = ListMultimap::new();
/// map.insert_all("k", [1, 2, 2, 3]);
/// assert_eq!(map.get("k"), &[1, 2, 2, 3]);
///
/// // Only the first matching occurrence is removed.
/// assert!(map.remove("k", &2));
/// assert_eq!(map.get("k"), &[1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct ListMultimap<K, V, S = RandomState> {
    pub(crate) map: HashMap<K, Vec<V>, S>,
}

impl<K, V> ListMultimap<K, V, RandomState> {
    /// Creates an empty `ListMultimap`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> ListMultimap<K, V, S> {
    /// Creates an empty `ListMultimap` which will use the given hash builder
    /// to hash keys.
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

    /// Returns the number of values across all keys, duplicates included.
    pub fn value_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Clears the map, removing all keys and values.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// An iterator visiting every key with its values, in arbitrary key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// An iterator visiting all distinct keys in arbitrary order.
    pub fn keys(&self) -> hash_map::Keys<'_, K, Vec<V>> {
        self.map.keys()
    }

    /// An iterator visiting every value of every key. Values of one key are
    /// visited in order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }
}

impl<K, V, S> ListMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the values for the key, or an empty slice if there are none.
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key) {
            Some(list) => list,
            None => &[],
        }
    }

    /// Returns the values for the key, or `None` if there are none.
    ///
    /// A returned slice is never empty.
    pub fn try_get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).map(Vec::as_slice)
    }

    /// Returns `true` if the key has at least one value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Removes all values for the key, returning them if there were any.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Adds the value to the end of the key's list.
    pub fn insert(&mut self, key: K, value: V) {
        match self.map.get_mut(&key) {
            Some(list) => list.push(value),
            None => {
                self.map.insert(key, vec![value]);
                trace!("created list multimap bucket");
            }
        }
    }

    /// Appends the values to the key's list. Returns whether anything was
    /// appended.
    ///
    /// Adding no values leaves the key absent.
    pub fn insert_all<I>(&mut self, key: K, values: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        if let Some(list) = self.map.get_mut(&key) {
            let before = list.len();
            list.extend(values);
            return list.len() > before;
        }

        let list: Vec<V> = values.into_iter().collect();
        if list.is_empty() {
            return false;
        }

        self.map.insert(key, list);
        trace!("created list multimap bucket");
        true
    }
}

impl<K, V, S> ListMultimap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    /// Returns `true` if the key's list contains the value.
    pub fn contains<Q, R>(&self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: ?Sized + Hash + Eq,
        R: ?Sized + PartialEq,
    {
        self.get(key).iter().any(|v| v.borrow() == value)
    }

    /// Removes the first occurrence of the value from the key's list. Returns
    /// whether there was one.
    pub fn remove<Q, R>(&mut self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: ?Sized + Hash + Eq,
        R: ?Sized + PartialEq,
    {
        with_bucket_mut(&mut self.map, key, |list| remove_first(list, value)).unwrap_or(false)
    }

    /// Removes one occurrence of each of the given values from the key's
    /// list. Returns whether anything was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::ListMultimap;
    ///
    /// let mut map = ListMultimap::new();
    /// map.insert_all("k", [1, 1, 2]);
    ///
    /// assert!(map.remove_all("k", &[1, 3]));
    /// assert_eq!(map.get("k"), &[1, 2]);
    /// ```
    pub fn remove_all<'a, Q, I>(&mut self, key: &Q, values: I) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: 'a,
        I: IntoIterator<Item = &'a V>,
    {
        with_bucket_mut(&mut self.map, key, |list| {
            values
                .into_iter()
                .fold(false, |changed, value| remove_first(list, value) | changed)
        })
        .unwrap_or(false)
    }
}

fn remove_first<V, R>(list: &mut Vec<V>, value: &R) -> bool
where
    V: Borrow<R>,
    R: ?Sized + PartialEq,
{
    match list.iter().position(|v| v.borrow() == value) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

impl<K, V, S> Default for ListMultimap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for ListMultimap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, V, S> Eq for ListMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Debug for ListMultimap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for ListMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for ListMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ListMultimap<K, V, S> {
    type Item = (&'a K, &'a [V]);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// A `ListMultimap` is represented as a map from each key to its list of
/// values.
impl<K, V, S> Represent for ListMultimap<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + Clone + 'static,
{
    type Rep = HashMap<K, Vec<V>, S>;

    fn to_rep(&self) -> Self::Rep {
        self.map.clone()
    }

    fn read_rep(&mut self, rep: Self::Rep) {
        for (key, values) in rep {
            self.insert_all(key, values);
        }
    }
}

/// An iterator over the keys of a `ListMultimap` and their values.
pub struct Iter<'a, K, V> {
    inner: hash_map::Iter<'a, K, Vec<V>>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, list)| (key, list.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
