//! Ordered set: a presence tree with unit values.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::policy::{Comparator, NaturalOrder};
use crate::tree_map::{self, TreeMap};
use core::fmt;

/// Ordered set over a caller-chosen [`Comparator`] policy.
///
/// A thin layer over [`TreeMap`] with `()` as the stored value; traversal
/// runs in ascending comparator order.
pub struct TreeSet<T, C = NaturalOrder> {
    map: TreeMap<T, (), C>,
}

impl<T> TreeSet<T> {
    pub fn new() -> Self {
        Self {
            map: TreeMap::new(),
        }
    }
}

impl<T> Default for TreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> TreeSet<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            map: TreeMap::with_comparator(cmp),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// The smallest element, or [`Error::NotFound`] on an empty set.
    ///
    /// [`Error::NotFound`]: crate::Error::NotFound
    pub fn first(&self) -> Result<&T> {
        self.map.first_key()
    }

    /// The largest element, or [`Error::NotFound`] on an empty set.
    ///
    /// [`Error::NotFound`]: crate::Error::NotFound
    pub fn last(&self) -> Result<&T> {
        self.map.last_key()
    }

    /// Iterates elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// A removal-capable cursor in ascending order.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut {
            inner: self.map.cursor_mut(),
        }
    }
}

impl<T, C> TreeSet<T, C>
where
    C: Comparator<T>,
{
    /// Adds `value` if absent and reports whether it was added. An existing
    /// element is left in place.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Removes `value` and reports whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_ok()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }
}

impl<T, C> Clone for TreeSet<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T, C> Extend<T> for TreeSet<T, C>
where
    C: Comparator<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C> FromIterator<T> for TreeSet<T, C>
where
    C: Comparator<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C> fmt::Debug for TreeSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Immutable element iterator in ascending order.
pub struct Iter<'a, T, C> {
    inner: tree_map::Iter<'a, T, (), C>,
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, _)| value)
    }
}

/// Removal-capable cursor returned by [`TreeSet::cursor_mut`].
pub struct CursorMut<'a, T, C> {
    inner: tree_map::CursorMut<'a, T, (), C>,
}

impl<T, C> Cursor for CursorMut<'_, T, C> {
    type Item<'c>
        = &'c T
    where
        Self: 'c;
    type Removed = T;

    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next(&mut self) -> Result<&T> {
        self.inner.next().map(|(value, _)| value)
    }

    fn remove(&mut self) -> Result<T> {
        self.inner.remove().map(|(value, ())| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Invariant: iteration is sorted regardless of insertion order, and
    /// first/last agree with its ends.
    #[test]
    fn sorted_iteration_and_bounds() {
        let mut set = TreeSet::new();
        for value in [9, 1, 5, 3, 7] {
            set.insert(value);
        }
        let elements: Vec<i32> = set.iter().copied().collect();
        assert_eq!(elements, vec![1, 3, 5, 7, 9]);
        assert_eq!(set.first(), Ok(&1));
        assert_eq!(set.last(), Ok(&9));
    }

    /// Invariant: bounds on an empty set fail with `NotFound`.
    #[test]
    fn empty_bounds() {
        let set: TreeSet<i32> = TreeSet::new();
        assert_eq!(set.first(), Err(Error::NotFound));
        assert_eq!(set.last(), Err(Error::NotFound));
    }

    /// Invariant: duplicate inserts neither grow the set nor reorder it.
    #[test]
    fn duplicate_inserts() {
        let mut set = TreeSet::new();
        assert!(set.insert(2));
        assert!(set.insert(1));
        assert!(!set.insert(2));
        assert_eq!(set.len(), 2);
    }

    /// Invariant: the cursor removes mid-walk without skipping elements.
    #[test]
    fn cursor_removes_in_order() {
        let mut set: TreeSet<i32> = (1..=6).collect();
        let mut removed = Vec::new();
        let mut cursor = set.cursor_mut();
        while cursor.has_next() {
            let &value = cursor.next().unwrap();
            if value % 3 == 0 {
                removed.push(cursor.remove().unwrap());
            }
        }
        assert_eq!(removed, vec![3, 6]);
        let rest: Vec<i32> = set.iter().copied().collect();
        assert_eq!(rest, vec![1, 2, 4, 5]);
    }
}
