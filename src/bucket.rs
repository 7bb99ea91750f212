use hashbrown::{hash_set, HashMap, HashSet};
use log::trace;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

/// Storage that can hold zero or more values for a single key.
///
/// A container never keeps a key whose bucket is empty.
pub(crate) trait Bucket {
    fn is_empty(&self) -> bool;
}

impl<T, S> Bucket for HashSet<T, S> {
    fn is_empty(&self) -> bool {
        HashSet::is_empty(self)
    }
}

impl<T> Bucket for Vec<T> {
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

impl<K, V, S> Bucket for HashMap<K, V, S> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

/// Runs `f` against the bucket stored at `key`, then drops the key if `f`
/// left its bucket empty.
///
/// Returns `None` without calling `f` if there is no bucket at `key`. Every
/// removal path goes through here, so nested tables prune level by level by
/// calling this again from inside `f`.
pub(crate) fn with_bucket_mut<K, B, S, Q, F, R>(
    map: &mut HashMap<K, B, S>,
    key: &Q,
    f: F,
) -> Option<R>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
    B: Bucket,
    F: FnOnce(&mut B) -> R,
{
    let bucket = map.get_mut(key)?;
    let result = f(&mut *bucket);

    if bucket.is_empty() {
        map.remove(key);
        trace!("pruned empty bucket");
    }

    Some(result)
}

/// A read-only view of the values stored for one key of a set-valued
/// container.
///
/// Keys without values share the same allocation-free empty view,
/// [`SetBucket::EMPTY`], so looking up a missing key never fails.
///
/// # Examples
///
/// ```
/// use bucket_multimap::HashMultimap;
///
/// let mut map = HashMultimap::new();
/// map.insert("a", 1);
///
/// assert!(map.get("a").contains(&1));
/// assert!(map.get("b").is_empty());
/// ```
pub struct SetBucket<'a, T, S> {
    set: Option<&'a HashSet<T, S>>,
}

impl<'a, T, S> SetBucket<'a, T, S> {
    /// The view of a key with no values.
    pub const EMPTY: Self = SetBucket { set: None };

    pub(crate) fn new(set: Option<&'a HashSet<T, S>>) -> Self {
        SetBucket { set }
    }

    /// Returns the number of values in the bucket.
    pub fn len(&self) -> usize {
        self.set.map_or(0, HashSet::len)
    }

    /// Returns `true` if the bucket holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the backing set, or `None` for the empty view.
    pub fn as_set(&self) -> Option<&'a HashSet<T, S>> {
        self.set
    }

    /// An iterator visiting the values in arbitrary order.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            inner: self.set.map(HashSet::iter),
        }
    }
}

impl<T, S> SetBucket<'_, T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns `true` if the bucket contains the value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.set.is_some_and(|set| set.contains(value))
    }
}

impl<T, S> Clone for SetBucket<'_, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S> Copy for SetBucket<'_, T, S> {}

impl<T, S> Default for SetBucket<'_, T, S> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T, S> PartialEq for SetBucket<'_, T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T, S> Eq for SetBucket<'_, T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> PartialEq<HashSet<T, S>> for SetBucket<'_, T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &HashSet<T, S>) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Debug, S> Debug for SetBucket<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, S> IntoIterator for SetBucket<'a, T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, S> IntoIterator for &SetBucket<'a, T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An iterator over the values of a [`SetBucket`].
pub struct Iter<'a, T> {
    inner: Option<hash_set::Iter<'a, T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, ExactSizeIterator::len)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
