use crate::repr::Represent;
use hashbrown::{hash_map, HashMap};
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

/// Multiset implementation where each distinct element is stored once, along
/// with the number of copies present.
///
/// The multiset keeps a running total of copies, so [`len`](Self::len) is
/// constant time.
///
/// # Examples
///
/// ```
/// use bucket_multimap::HashMultiset;
///
/// let mut set = HashMultiset::new();
/// set.insert_n("x", 3);
/// set.insert_n("x", 2);
/// assert_eq!(set.count("x"), 5);
/// assert_eq!(set.len(), 5);
///
/// assert_eq!(set.remove_n("x", 10), 5);
/// assert_eq!(set.count("x"), 0);
/// assert!(!set.contains("x"));
/// ```
#[derive(Clone)]
pub struct HashMultiset<T, S = RandomState> {
    pub(crate) counts: HashMap<T, NonZeroUsize, S>,
    total: usize,
}

impl<T> HashMultiset<T, RandomState> {
    /// Creates an empty `HashMultiset`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<T, S> HashMultiset<T, S> {
    /// Creates an empty `HashMultiset` which will use the given hash builder
    /// to hash elements.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            counts: HashMap::with_hasher(hash_builder),
            total: 0,
        }
    }

    /// Returns a reference to the set's [`BuildHasher`].
    pub fn hasher(&self) -> &S {
        self.counts.hasher()
    }

    /// Returns the number of elements in the set, counting every copy.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns the number of distinct elements in the set.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    /// An iterator visiting every copy of every element. Copies of one
    /// element are visited consecutively; distinct elements come in
    /// arbitrary order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::HashMultiset;
    ///
    /// let set: HashMultiset<char> = "abab".chars().collect();
    ///
    /// let mut all: Vec<_> = set.iter().collect();
    /// assert_eq!(all.len(), 4);
    /// all.dedup();
    /// assert_eq!(all.len(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            counts: self.counts.iter(),
            current: None,
            remaining: self.total,
        }
    }

    /// An iterator visiting each distinct element once, in arbitrary order.
    pub fn distinct(&self) -> hash_map::Keys<'_, T, NonZeroUsize> {
        self.counts.keys()
    }

    /// An iterator visiting each distinct element with its count, in
    /// arbitrary order.
    pub fn counts(&self) -> impl ExactSizeIterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(element, count)| (element, count.get()))
    }
}

impl<T, S> HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the number of copies of the element; `0` if it is absent.
    pub fn count<Q>(&self, element: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.get(element).map_or(0, |count| count.get())
    }

    /// Returns `true` if at least one copy of the element is present.
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.contains_key(element)
    }

    /// Adds one copy of the element.
    pub fn insert(&mut self, element: T) {
        self.insert_n(element, 1);
    }

    /// Adds `n` copies of the element. Adding zero copies does nothing.
    ///
    /// The total number of copies never exceeds `usize::MAX`; copies past
    /// that are dropped.
    pub fn insert_n(&mut self, element: T, n: usize) {
        let Some(n) = NonZeroUsize::new(n.min(usize::MAX - self.total)) else {
            return;
        };

        self.counts
            .entry(element)
            .and_modify(|count| *count = count.saturating_add(n.get()))
            .or_insert(n);
        self.total += n.get();
    }

    /// Sets the exact number of copies of the element. Setting zero removes
    /// it. Returns whether the count changed.
    ///
    /// `n` is lowered as needed to keep the total within `usize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_multimap::HashMultiset;
    ///
    /// let mut set = HashMultiset::new();
    /// assert!(set.set_count("a", 4));
    /// assert!(!set.set_count("a", 4));
    /// assert!(set.set_count("a", 1));
    /// assert_eq!(set.len(), 1);
    ///
    /// assert!(set.set_count("a", 0));
    /// assert!(set.is_empty());
    /// ```
    pub fn set_count(&mut self, element: T, n: usize) -> bool {
        let prev = self.count(&element);
        let n = n.min(usize::MAX - self.total + prev);
        if n == prev {
            return false;
        }

        self.total = self.total - prev + n;
        match NonZeroUsize::new(n) {
            Some(n) => {
                self.counts.insert(element, n);
            }
            None => {
                self.counts.remove(&element);
            }
        }
        true
    }

    /// Removes one copy of the element. Returns whether there was one.
    pub fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_n(element, 1) > 0
    }

    /// Removes up to `n` copies of the element, returning how many were
    /// actually removed. Removing every copy removes the element.
    pub fn remove_n<Q>(&mut self, element: &Q, n: usize) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if n == 0 {
            return 0;
        }

        let Some(count) = self.counts.get_mut(element) else {
            return 0;
        };

        let removed = match NonZeroUsize::new(count.get().saturating_sub(n)) {
            Some(left) => {
                let removed = count.get() - left.get();
                *count = left;
                removed
            }
            None => {
                let removed = count.get();
                self.counts.remove(element);
                removed
            }
        };

        self.total -= removed;
        removed
    }
}

impl<T, S> Default for HashMultiset<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> PartialEq for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total && self.counts == other.counts
    }
}

impl<T, S> Eq for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T: Debug, S> Debug for HashMultiset<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts()).finish()
    }
}

impl<T, S> FromIterator<T> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for HashMultiset<T, S>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, S> IntoIterator for &'a HashMultiset<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// A `HashMultiset` is represented as the list of its distinct elements, each
/// paired with its count.
impl<T, S> Represent for HashMultiset<T, S>
where
    T: Eq + Hash + Clone + 'static,
    S: BuildHasher,
{
    type Rep = Vec<(T, usize)>;

    fn to_rep(&self) -> Self::Rep {
        self.counts()
            .map(|(element, count)| (element.clone(), count))
            .collect()
    }

    fn read_rep(&mut self, rep: Self::Rep) {
        for (element, count) in rep {
            self.insert_n(element, count);
        }
    }
}

/// An iterator over every copy of every element of a `HashMultiset`.
pub struct Iter<'a, T> {
    counts: hash_map::Iter<'a, T, NonZeroUsize>,
    current: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            counts: self.counts.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (element, left) = match self.current.take() {
            Some(current) => current,
            None => {
                let (element, count) = self.counts.next()?;
                (element, count.get())
            }
        };

        if left > 1 {
            self.current = Some((element, left - 1));
        }
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
