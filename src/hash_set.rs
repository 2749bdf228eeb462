//! Hash set: a presence map with unit values.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::hash_map::{self, HashMap};
use crate::policy::{Hasher, StdHasher};
use core::fmt;

/// Hash set over a caller-chosen [`Hasher`] policy.
///
/// A thin layer over [`HashMap`] with `()` as the stored value, so every
/// capacity, growth, and traversal rule of the map applies unchanged.
pub struct HashSet<T, H = StdHasher> {
    map: HashMap<T, (), H>,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }
}

impl<T> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> HashSet<T, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates elements in the underlying map's bucket order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// A removal-capable cursor over the set.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, H> {
        CursorMut {
            inner: self.map.cursor_mut(),
        }
    }
}

impl<T, H> HashSet<T, H>
where
    T: Eq,
    H: Hasher<T>,
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

impl<T, H> Clone for HashSet<T, H>
where
    T: Eq + Clone,
    H: Hasher<T> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T, H> Extend<T> for HashSet<T, H>
where
    T: Eq,
    H: Hasher<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, H> FromIterator<T> for HashSet<T, H>
where
    T: Eq,
    H: Hasher<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(H::default());
        set.extend(iter);
        set
    }
}

impl<T, H> fmt::Debug for HashSet<T, H>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Immutable element iterator.
pub struct Iter<'a, T> {
    inner: hash_map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, _)| value)
    }
}

/// Removal-capable cursor returned by [`HashSet::cursor_mut`].
pub struct CursorMut<'a, T, H> {
    inner: hash_map::CursorMut<'a, T, (), H>,
}

impl<T, H> Cursor for CursorMut<'_, T, H> {
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
