use super::collect;
use crate::HashMultiset;
use hashbrown::hash_map::rayon as map_rayon;
use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::{
    FromParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelExtend,
    ParallelIterator,
};
use std::hash::{BuildHasher, Hash};
use std::iter;
use std::num::NonZeroUsize;

/// Parallel iterator over every copy of every element in a multiset.
pub struct ParElements<'a, T> {
    inner: map_rayon::ParIter<'a, T, NonZeroUsize>,
}

impl<'a, T: Sync> ParallelIterator for ParElements<'a, T> {
    type Item = &'a T;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner
            .flat_map_iter(|(element, count)| iter::repeat(element).take(count.get()))
            .drive_unindexed(consumer)
    }
}

/// Parallel iterator over the distinct elements of a multiset and their
/// counts.
pub struct ParCounts<'a, T> {
    inner: map_rayon::ParIter<'a, T, NonZeroUsize>,
}

impl<'a, T: Sync> ParallelIterator for ParCounts<'a, T> {
    type Item = (&'a T, usize);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner
            .map(|(element, count)| (element, count.get()))
            .drive_unindexed(consumer)
    }
}

impl<T: Sync, S> HashMultiset<T, S> {
    /// A parallel iterator visiting each distinct element with its count.
    pub fn par_counts(&self) -> ParCounts<'_, T> {
        ParCounts {
            inner: self.counts.par_iter(),
        }
    }
}

impl<'a, T: Sync, S> IntoParallelIterator for &'a HashMultiset<T, S> {
    type Item = &'a T;
    type Iter = ParElements<'a, T>;

    fn into_par_iter(self) -> Self::Iter {
        ParElements {
            inner: self.counts.par_iter(),
        }
    }
}

impl<T, S> FromParallelIterator<T> for HashMultiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = T>,
    {
        let mut set = HashMultiset::default();
        set.par_extend(par_iter);
        set
    }
}

impl<T, S> ParallelExtend<T> for HashMultiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        for vec in collect(par_iter) {
            self.extend(vec);
        }
    }
}

impl<'a, T, S> ParallelExtend<&'a T> for HashMultiset<T, S>
where
    T: 'a + Copy + Eq + Hash + Send + Sync,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = &'a T>,
    {
        for vec in collect(par_iter) {
            self.extend(vec);
        }
    }
}
