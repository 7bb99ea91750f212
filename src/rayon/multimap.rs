use super::collect;
use crate::bucket::SetBucket;
use crate::{HashMultimap, ListMultimap};
use hashbrown::hash_map::rayon as map_rayon;
use hashbrown::HashSet;
use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::{
    FromParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelExtend,
    ParallelIterator,
};
use std::hash::{BuildHasher, Hash};

/// Parallel iterator over the keys of a `HashMultimap` and their values.
pub struct ParIter<'a, K, V, S> {
    inner: map_rayon::ParIter<'a, K, HashSet<V, S>>,
}

impl<K, V, S> Clone for ParIter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: Sync, V: Sync, S: Sync> ParallelIterator for ParIter<'a, K, V, S> {
    type Item = (&'a K, SetBucket<'a, V, S>);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner
            .map(|(key, set)| (key, SetBucket::new(Some(set))))
            .drive_unindexed(consumer)
    }
}

impl<'a, K: Sync, V: Sync, S: Sync> IntoParallelIterator for &'a HashMultimap<K, V, S> {
    type Item = (&'a K, SetBucket<'a, V, S>);
    type Iter = ParIter<'a, K, V, S>;

    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            inner: self.map.par_iter(),
        }
    }
}

impl<K, V, S> FromParallelIterator<(K, V)> for HashMultimap<K, V, S>
where
    K: Eq + Hash + Send,
    V: Eq + Hash + Send,
    S: BuildHasher + Clone + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = (K, V)>,
    {
        let mut map = HashMultimap::default();
        map.par_extend(par_iter);
        map
    }
}

impl<K, V, S> ParallelExtend<(K, V)> for HashMultimap<K, V, S>
where
    K: Eq + Hash + Send,
    V: Eq + Hash + Send,
    S: BuildHasher + Clone,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (K, V)>,
    {
        for vec in collect(par_iter) {
            self.extend(vec);
        }
    }
}

/// Parallel iterator over the keys of a `ListMultimap` and their values.
pub struct ListParIter<'a, K, V> {
    inner: map_rayon::ParIter<'a, K, Vec<V>>,
}

impl<K, V> Clone for ListParIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: Sync, V: Sync> ParallelIterator for ListParIter<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner
            .map(|(key, list)| (key, list.as_slice()))
            .drive_unindexed(consumer)
    }
}

impl<'a, K: Sync, V: Sync, S> IntoParallelIterator for &'a ListMultimap<K, V, S> {
    type Item = (&'a K, &'a [V]);
    type Iter = ListParIter<'a, K, V>;

    fn into_par_iter(self) -> Self::Iter {
        ListParIter {
            inner: self.map.par_iter(),
        }
    }
}

/// Values of one key keep the order they had in the parallel iterator.
impl<K, V, S> FromParallelIterator<(K, V)> for ListMultimap<K, V, S>
where
    K: Eq + Hash + Send,
    V: Send,
    S: BuildHasher + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = (K, V)>,
    {
        let mut map = ListMultimap::default();
        map.par_extend(par_iter);
        map
    }
}

impl<K, V, S> ParallelExtend<(K, V)> for ListMultimap<K, V, S>
where
    K: Eq + Hash + Send,
    V: Send,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (K, V)>,
    {
        for vec in collect(par_iter) {
            self.extend(vec);
        }
    }
}
