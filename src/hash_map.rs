//! Chained-bucket hash map with a pluggable hash policy.
//!
//! Buckets hold the heads of singly linked entry chains; the entries
//! themselves live in a slot arena, so chain links and cursor positions are
//! small generational keys rather than pointers. Each entry stores the raw
//! hash code its policy produced at insertion, and every later bucket
//! derivation (lookups aside) reuses that stored code; the policy is never
//! re-invoked for a live entry, including during rehash.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::guard::ReentryCheck;
use crate::policy::{Hasher, StdHasher};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Buckets allocated by [`HashMap::new`].
pub const DEFAULT_CAPACITY: usize = 11;

/// Load factor used when none is supplied.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    code: i64, // as produced by the policy at insertion
    next: Option<DefaultKey>,
}

/// Hash map over a caller-chosen [`Hasher`] policy.
///
/// Lookups, insertion, and removal are O(1) on average and O(chain) in the
/// worst case; nothing about the policy's distribution is assumed. The
/// bucket array starts at [`DEFAULT_CAPACITY`] and grows to `2c + 1`
/// whenever an insertion would push the entry count past
/// `floor(capacity * load_factor)`; it never shrinks.
pub struct HashMap<K, V, H = StdHasher> {
    hasher: H,
    buckets: Vec<Option<DefaultKey>>, // chain heads; length is the capacity
    slots: SlotMap<DefaultKey, Entry<K, V>>, // entry storage, generational keys
    threshold: usize,
    load_factor: f64,
    check: ReentryCheck,
}

fn threshold_for(capacity: usize, load_factor: f64) -> usize {
    (capacity as f64 * load_factor) as usize
}

fn bucket_index(code: i64, capacity: usize) -> usize {
    (code.unsigned_abs() % capacity as u64) as usize
}

/// Finds the next chain head at a bucket index below `from`, scanning
/// downward. Returns the bucket it stopped at and the head found there.
fn scan_down(buckets: &[Option<DefaultKey>], from: usize) -> (usize, Option<DefaultKey>) {
    let mut bucket = from;
    while bucket > 0 {
        bucket -= 1;
        if let Some(head) = buckets[bucket] {
            return (bucket, Some(head));
        }
    }
    (0, None)
}

impl<K, V> HashMap<K, V> {
    /// An empty map with [`DEFAULT_CAPACITY`] buckets, the default load
    /// factor, and the std hashing policy.
    pub fn new() -> Self {
        Self::with_hasher(StdHasher::default())
    }

    /// An empty map with the given bucket count. A capacity of 0 is coerced
    /// to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, StdHasher::default())
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> HashMap<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self::with_load_factor(capacity, DEFAULT_LOAD_FACTOR, hasher)
    }

    /// Full constructor. `load_factor` scales how full the bucket array may
    /// get before it grows; values of 1.0 and above simply let chains run
    /// longer.
    pub fn with_load_factor(capacity: usize, load_factor: f64, hasher: H) -> Self {
        debug_assert!(load_factor.is_finite() && load_factor > 0.0);
        let capacity = capacity.max(1);
        Self {
            hasher,
            buckets: vec![None; capacity],
            slots: SlotMap::with_key(),
            threshold: threshold_for(capacity, load_factor),
            load_factor,
            check: ReentryCheck::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Drops every entry. Capacity and threshold are retained.
    pub fn clear(&mut self) {
        let _t = self.check.enter();
        self.buckets.fill(None);
        self.slots.clear();
    }

    /// True if any entry holds `value`. Scans the whole arena.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let _t = self.check.enter();
        self.slots.values().any(|e| e.value == *value)
    }

    /// Iterates entries bucket by bucket from the highest index down, in
    /// chain order within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let (bucket, next) = scan_down(&self.buckets, self.buckets.len());
        Iter {
            slots: &self.slots,
            buckets: &self.buckets,
            bucket,
            next,
        }
    }

    /// A removal-capable cursor over the map, in [`iter`](Self::iter)
    /// order. The cursor borrows the map exclusively for its lifetime.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, H> {
        let (bucket, next) = scan_down(&self.buckets, self.buckets.len());
        CursorMut {
            map: self,
            bucket,
            next,
            last: None,
        }
    }

    /// Unlinks `slot` from its chain and frees it. The chain walk compares
    /// slot identity, not keys, so no policy code runs.
    fn detach(&mut self, slot: DefaultKey) -> Entry<K, V> {
        let idx = bucket_index(self.slots[slot].code, self.buckets.len());
        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[idx];
        while let Some(cur) = cursor {
            if cur == slot {
                break;
            }
            prev = Some(cur);
            cursor = self.slots[cur].next;
        }
        debug_assert_eq!(cursor, Some(slot), "entry must be linked in its bucket");
        let next = self.slots[slot].next;
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.buckets[idx] = next,
        }
        self.slots
            .remove(slot)
            .expect("detached entry is live in the arena")
    }

    /// Doubles-plus-one the bucket array and relinks every entry by its
    /// stored code. Entry count and slot keys are unchanged.
    fn grow(&mut self) {
        let new_capacity = self.buckets.len() * 2 + 1;
        let mut buckets = vec![None; new_capacity];
        for (slot, entry) in self.slots.iter_mut() {
            let idx = bucket_index(entry.code, new_capacity);
            entry.next = buckets[idx];
            buckets[idx] = Some(slot);
        }
        self.buckets = buckets;
        self.threshold = threshold_for(new_capacity, self.load_factor);
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq,
    H: Hasher<K>,
{
    /// Walks the chain at `idx` for `key`. Caller holds the reentry token;
    /// this runs `K: Eq`.
    fn probe(&self, idx: usize, key: &K) -> Option<DefaultKey> {
        let mut cursor = self.buckets[idx];
        while let Some(slot) = cursor {
            let entry = &self.slots[slot];
            if entry.key == *key {
                return Some(slot);
            }
            cursor = entry.next;
        }
        None
    }

    /// Inserts `key` → `value`. If the key is already present its value is
    /// replaced in place and the previous value returned; the stored key is
    /// kept. A brand-new entry may first grow the bucket array, after which
    /// its bucket index is derived again, then it is linked at the head of
    /// its chain.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (code, existing) = {
            let _t = self.check.enter();
            let code = self.hasher.hash_code(&key);
            let idx = bucket_index(code, self.buckets.len());
            (code, self.probe(idx, &key))
        };
        if let Some(slot) = existing {
            return Some(core::mem::replace(&mut self.slots[slot].value, value));
        }
        if self.slots.len() + 1 > self.threshold {
            self.grow();
        }
        let idx = bucket_index(code, self.buckets.len());
        let head = self.buckets[idx];
        let slot = self.slots.insert(Entry {
            key,
            value,
            code,
            next: head,
        });
        self.buckets[idx] = Some(slot);
        None
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        let _t = self.check.enter();
        let idx = bucket_index(self.hasher.hash_code(key), self.buckets.len());
        match self.probe(idx, key) {
            Some(slot) => Ok(&self.slots[slot].value),
            None => Err(Error::NotFound),
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let slot = {
            let _t = self.check.enter();
            let idx = bucket_index(self.hasher.hash_code(key), self.buckets.len());
            self.probe(idx, key)
        };
        match slot {
            Some(slot) => Ok(&mut self.slots[slot].value),
            None => Err(Error::NotFound),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let _t = self.check.enter();
        let idx = bucket_index(self.hasher.hash_code(key), self.buckets.len());
        self.probe(idx, key).is_some()
    }

    /// Removes `key`, returning its value, or [`Error::NotFound`] with the
    /// map untouched. Capacity is never given back.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let slot = {
            let _t = self.check.enter();
            let idx = bucket_index(self.hasher.hash_code(key), self.buckets.len());
            self.probe(idx, key)
        };
        match slot {
            Some(slot) => Ok(self.detach(slot).value),
            None => Err(Error::NotFound),
        }
    }
}

impl<K, V, H> Clone for HashMap<K, V, H>
where
    K: Eq + Clone,
    V: Clone,
    H: Hasher<K> + Clone,
{
    /// Deep copy: fresh storage sized at `max(2 * len, DEFAULT_CAPACITY)`
    /// buckets, same load factor, same policy instance.
    fn clone(&self) -> Self {
        let capacity = (2 * self.len()).max(DEFAULT_CAPACITY);
        let mut copy = Self::with_load_factor(capacity, self.load_factor, self.hasher.clone());
        for (key, value) in self.iter() {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: Hasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: Hasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(H::default());
        map.extend(iter);
        map
    }
}

impl<K, V, H> fmt::Debug for HashMap<K, V, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Immutable entry iterator. See [`HashMap::iter`] for the order.
pub struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    buckets: &'a [Option<DefaultKey>],
    bucket: usize,
    next: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        let slots = self.slots;
        let entry = &slots[slot];
        self.next = entry.next;
        if self.next.is_none() {
            let (bucket, next) = scan_down(self.buckets, self.bucket);
            self.bucket = bucket;
            self.next = next;
        }
        Some((&entry.key, &entry.value))
    }
}

/// Removal-capable cursor returned by [`HashMap::cursor_mut`].
pub struct CursorMut<'a, K, V, H> {
    map: &'a mut HashMap<K, V, H>,
    bucket: usize,
    next: Option<DefaultKey>,
    last: Option<DefaultKey>,
}

impl<K, V, H> Cursor for CursorMut<'_, K, V, H> {
    type Item<'c>
        = (&'c K, &'c mut V)
    where
        Self: 'c;
    type Removed = (K, V);

    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next(&mut self) -> Result<Self::Item<'_>> {
        let slot = self.next.ok_or(Error::NotFound)?;
        self.next = self.map.slots[slot].next;
        if self.next.is_none() {
            let (bucket, next) = scan_down(&self.map.buckets, self.bucket);
            self.bucket = bucket;
            self.next = next;
        }
        self.last = Some(slot);
        let entry = &mut self.map.slots[slot];
        Ok((&entry.key, &mut entry.value))
    }

    /// Unlinks the entry the last `next` yielded. The saved position is a
    /// different slot, so the rest of the traversal is undisturbed.
    fn remove(&mut self) -> Result<(K, V)> {
        let slot = self.last.take().ok_or(Error::InvalidCursor)?;
        let entry = self.map.detach(slot);
        Ok((entry.key, entry.value))
    }
}
