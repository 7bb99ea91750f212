use crate::bucket::{with_bucket_mut, Bucket};
use crate::errors::KeyNotFound;
use crate::repr::Represent;
use hashbrown::{hash_map, HashMap};
use log::trace;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::ops::Index;

/// A two-dimensional hash map, storing one value per `(key1, key2)` pair.
///
/// Entries are grouped by `key1`. A `key1` with no remaining entries is
/// removed along with its last entry.
///
/// # Examples
///
/// ```
/// use bucket_multimap::HashTable;
///
/// let mut table = HashTable::new();
/// table.insert("alice", "math", 90);
/// table.insert("alice", "art", 75);
/// table.insert("bob", "math", 60);
///
/// assert_eq!(table.get("alice", "art"), Some(&75));
/// assert_eq!(table[("bob", "math")], 60);
/// assert!(table.lookup("bob", "art").is_err());
///
/// table.remove("bob", "math");
/// assert_eq!(table.row_count(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<K1, K2, V, S = RandomState> {
    rows: HashMap<K1, HashMap<K2, V, S>, S>,
}

impl<K1, K2, V> HashTable<K1, K2, V, RandomState> {
    /// Creates an empty `HashTable`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K1, K2, V, S> HashTable<K1, K2, V, S> {
    /// Creates an empty `HashTable` which will use the given hash builder to
    /// hash keys. Each row gets a clone of it.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            rows: HashMap::with_hasher(hash_builder),
        }
    }

    /// Returns a reference to the table's [`BuildHasher`].
    pub fn hasher(&self) -> &S {
        self.rows.hasher()
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of distinct primary keys.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Clears the table, removing all entries.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// An iterator visiting all entries in arbitrary order. The order is
    /// stable as long as the table is not modified.
    pub fn iter(&self) -> Iter<'_, K1, K2, V, S> {
        Iter {
            rows: self.rows.iter(),
            row: None,
        }
    }

    /// An iterator visiting all distinct primary keys in arbitrary order.
    pub fn keys1(&self) -> hash_map::Keys<'_, K1, HashMap<K2, V, S>> {
        self.rows.keys()
    }
}

impl<K1, K2, V, S> HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    S: BuildHasher,
{
    /// Returns a reference to the value at `(key1, key2)`.
    pub fn get<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Option<&V>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.rows.get(key1)?.get(key2)
    }

    /// Returns a mutable reference to the value at `(key1, key2)`.
    pub fn get_mut<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Option<&mut V>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.rows.get_mut(key1)?.get_mut(key2)
    }

    /// Returns a reference to the value at `(key1, key2)`, or a
    /// [`KeyNotFound`] error naming the pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, 'a', "one-a");
    ///
    /// assert_eq!(table.lookup(&1, &'a'), Ok(&"one-a"));
    ///
    /// let error = table.lookup(&1, &'b').unwrap_err();
    /// assert_eq!(error.to_string(), "no entry at (1, 'b')");
    /// ```
    pub fn lookup<'q, Q1, Q2>(
        &self,
        key1: &'q Q1,
        key2: &'q Q2,
    ) -> Result<&V, KeyNotFound<'q, Q1, Q2>>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.get(key1, key2)
            .ok_or_else(|| KeyNotFound::new(key1, key2))
    }

    /// Returns `true` if the table has an entry at `(key1, key2)`.
    pub fn contains<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        self.get(key1, key2).is_some()
    }

    /// Returns `true` if the table has any entry with the primary key.
    pub fn contains_key1<Q>(&self, key1: &Q) -> bool
    where
        K1: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.rows.contains_key(key1)
    }

    /// Returns all entries with the primary key, keyed by the secondary key.
    ///
    /// Never returns an empty row.
    pub fn row<Q>(&self, key1: &Q) -> Option<&HashMap<K2, V, S>>
    where
        K1: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.rows.get(key1)
    }

    /// Removes all entries with the primary key, returning them if there
    /// were any.
    pub fn remove_row<Q>(&mut self, key1: &Q) -> Option<HashMap<K2, V, S>>
    where
        K1: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.rows.remove(key1)
    }

    /// Removes the entry at `(key1, key2)`, returning its value if it was
    /// present. Removing the last entry of a row removes the row too.
    pub fn remove<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Option<V>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
    {
        with_bucket_mut(&mut self.rows, key1, |row| row.remove(key2)).flatten()
    }

    /// Runs `f` against the bucket at `(key1, key2)`, then prunes the entry
    /// if the bucket is left empty, and the row if that was its last entry.
    pub(crate) fn update_bucket<Q1, Q2, F, R>(
        &mut self,
        key1: &Q1,
        key2: &Q2,
        f: F,
    ) -> Option<R>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: ?Sized + Hash + Eq,
        Q2: ?Sized + Hash + Eq,
        V: Bucket,
        F: FnOnce(&mut V) -> R,
    {
        with_bucket_mut(&mut self.rows, key1, |row| {
            with_bucket_mut(row, key2, f)
        })
        .flatten()
    }
}

impl<K1, K2, V, S> HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Sets the value at `(key1, key2)`, returning the previous value if there
    /// was one.
    pub fn insert(&mut self, key1: K1, key2: K2, value: V) -> Option<V> {
        if let Some(row) = self.rows.get_mut(&key1) {
            return row.insert(key2, value);
        }

        let mut row = HashMap::with_hasher(self.rows.hasher().clone());
        row.insert(key2, value);
        self.rows.insert(key1, row);
        trace!("created table row");
        None
    }
}

impl<K1, K2, V, S> Default for HashTable<K1, K2, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K1, K2, V, S> PartialEq for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<K1, K2, V, S> Eq for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K1, K2, V, S> Debug for HashTable<K1, K2, V, S>
where
    K1: Debug,
    K2: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K1, K2, V, S, Q1, Q2> Index<(&Q1, &Q2)> for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash + Borrow<Q1>,
    K2: Eq + Hash + Borrow<Q2>,
    Q1: ?Sized + Hash + Eq + Debug,
    Q2: ?Sized + Hash + Eq + Debug,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value at the key pair.
    ///
    /// # Panics
    ///
    /// Panics if there is no entry at the key pair.
    fn index(&self, (key1, key2): (&Q1, &Q2)) -> &V {
        match self.lookup(key1, key2) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<K1, K2, V, S> FromIterator<((K1, K2), V)> for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = ((K1, K2), V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K1, K2, V, S> Extend<((K1, K2), V)> for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = ((K1, K2), V)>>(&mut self, iter: I) {
        for ((key1, key2), value) in iter {
            self.insert(key1, key2, value);
        }
    }
}

impl<'a, K1, K2, V, S> IntoIterator for &'a HashTable<K1, K2, V, S> {
    type Item = ((&'a K1, &'a K2), &'a V);
    type IntoIter = Iter<'a, K1, K2, V, S>;

    fn into_iter(self) -> Iter<'a, K1, K2, V, S> {
        self.iter()
    }
}

/// A `HashTable` is represented as its list of `((key1, key2), value)`
/// entries.
impl<K1, K2, V, S> Represent for HashTable<K1, K2, V, S>
where
    K1: Eq + Hash + Clone + 'static,
    K2: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + Clone,
{
    type Rep = Vec<((K1, K2), V)>;

    fn to_rep(&self) -> Self::Rep {
        self.iter()
            .map(|((key1, key2), value)| ((key1.clone(), key2.clone()), value.clone()))
            .collect()
    }

    fn read_rep(&mut self, rep: Self::Rep) {
        self.extend(rep);
    }
}

/// An iterator over the entries of a `HashTable`.
pub struct Iter<'a, K1, K2, V, S> {
    rows: hash_map::Iter<'a, K1, HashMap<K2, V, S>>,
    row: Option<(&'a K1, hash_map::Iter<'a, K2, V>)>,
}

impl<'a, K1, K2, V, S> Iterator for Iter<'a, K1, K2, V, S> {
    type Item = ((&'a K1, &'a K2), &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key1, row)) = &mut self.row {
                if let Some((key2, value)) = row.next() {
                    return Some(((*key1, key2), value));
                }
            }

            let (key1, row) = self.rows.next()?;
            self.row = Some((key1, row.iter()));
        }
    }
}

impl<K1, K2, V, S> FusedIterator for Iter<'_, K1, K2, V, S> {}
