//! Pluggable hashing and ordering policies.
//!
//! The containers never call `std::hash::Hash` or `Ord` directly. The hash
//! map takes a [`Hasher`] and the tree map a [`Comparator`], both supplied
//! at construction and carried by value, so a container's behavior is fixed
//! by the policy instance it was built with. [`StdHasher`] and
//! [`NaturalOrder`] bridge the std traits for the common case; [`HashFn`]
//! and [`OrderFn`] wrap closures for everything else.

use core::cmp::Ordering;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

/// Hashing policy for the hashed containers.
pub trait Hasher<K: ?Sized> {
    /// Produces the key's hash code.
    ///
    /// Codes may be any `i64`, including negative; the container reduces a
    /// code to a bucket index itself. Keys that compare equal must produce
    /// equal codes. Nothing else is required: a constant code is legal and
    /// merely degrades lookups to a linear chain walk.
    fn hash_code(&self, key: &K) -> i64;
}

/// Ordering policy for the ordered containers.
pub trait Comparator<K: ?Sized> {
    /// Total order over keys. [`Ordering::Equal`] identifies the same key
    /// for lookup and replacement purposes.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Default hashing policy: feeds the key's [`Hash`] impl through a randomly
/// seeded std hasher.
///
/// Two `StdHasher` instances hash the same key differently; a container
/// keeps the one instance it was built with for its whole life, and clones
/// of the container share that instance's seed.
#[derive(Clone, Debug, Default)]
pub struct StdHasher {
    state: RandomState,
}

impl<K: Hash + ?Sized> Hasher<K> for StdHasher {
    fn hash_code(&self, key: &K) -> i64 {
        self.state.hash_one(key) as i64
    }
}

/// Adapts a closure `Fn(&K) -> i64` into a hashing policy.
#[derive(Clone, Debug)]
pub struct HashFn<F>(pub F);

impl<K: ?Sized, F: Fn(&K) -> i64> Hasher<K> for HashFn<F> {
    fn hash_code(&self, key: &K) -> i64 {
        (self.0)(key)
    }
}

/// Default ordering policy: the key type's own [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// The key type's [`Ord`] reversed, so traversal runs largest key first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

/// Adapts a closure `Fn(&K, &K) -> Ordering` into an ordering policy.
#[derive(Clone, Debug)]
pub struct OrderFn<F>(pub F);

impl<K: ?Sized, F: Fn(&K, &K) -> Ordering> Comparator<K> for OrderFn<F> {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}
