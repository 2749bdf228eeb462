//! mapset: hashed and ordered maps and sets with pluggable hash and
//! ordering policies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two small associative engines and their set faces, built in
//!   safe, verifiable layers so each piece can be reasoned about
//!   independently.
//! - Layers:
//!   - policy: `Hasher<K>` and `Comparator<K>` capability traits, carried
//!     by value. A container's behavior is fixed by the policy instance it
//!     was built with; `StdHasher`/`NaturalOrder` bridge `Hash`/`Ord`, and
//!     `HashFn`/`OrderFn` wrap closures.
//!   - HashMap<K, V, H>: chained-bucket table over a slot arena. Buckets
//!     hold chain heads; entries store their raw `i64` code at insertion
//!     and are relinked by it on growth, so the policy never runs again
//!     for a live entry.
//!   - TreeMap<K, V, C>: red-black tree over a slot arena with
//!     `Option<DefaultKey>` links; an absent link counts as a black nil.
//!     Rebalancing is link and color surgery only.
//!   - HashSet<T, H> / TreeSet<T, C>: the maps with `()` values and a
//!     narrowed, element-oriented surface.
//!   - Cursor: the shared removable-iteration protocol. A cursor holds an
//!     exclusive borrow of its container, yields elements forward, and can
//!     delete the one it last yielded.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no atomics).
//! - No per-entry heap allocations beyond each arena's own storage.
//! - Stable generational keys for all internal links and cursor positions.
//! - Hash ops are O(1) average with no assumption about code distribution;
//!   tree ops are O(log n).
//! - Reentrancy: disallowed during the probing sections that run policy
//!   code (`Hasher`, `Comparator`, `K: Eq`, `V: PartialEq`); a debug-only
//!   guard panics on nested entry, and release builds compile it away.
//!
//! Error model
//! - Absence is an error value, not a panic: lookups, keyed removal,
//!   `first`/`last` on empty containers, and `Cursor::next` past the end
//!   all return `Err(Error::NotFound)`. Misusing `Cursor::remove` returns
//!   `Err(Error::InvalidCursor)`. No failed operation leaves a container
//!   partially mutated.
//! - Set insert/remove report `bool` outcomes instead; absence is an
//!   ordinary answer for a set.
//!
//! Iteration and mutation
//! - Shared iterators (`iter`) implement `std::iter::Iterator` and borrow
//!   the container; structural mutation while one is live is a compile
//!   error.
//! - Cursors (`cursor_mut`) borrow exclusively, so `Cursor::remove` is the
//!   only structural change possible mid-traversal; it never skips or
//!   repeats the remaining elements. Hash traversal runs bucket-by-bucket
//!   from the highest index down, chain order within a bucket; tree
//!   traversal runs in ascending comparator order via successor links.
//!
//! Growth and shape invariants
//! - HashMap: capacity starts at 11 (caller-chosen capacities of 0 are
//!   coerced to 1) and steps to `2c + 1` whenever an insertion would push
//!   the entry count past `floor(capacity * load_factor)`; capacity never
//!   shrinks, and `clear` keeps it.
//! - TreeMap: black root, no red-red edge, and uniform black height after
//!   every mutation; removal of a two-child node rehouses its in-order
//!   predecessor in a fresh node at the removed position, so cursor
//!   positions held on successors stay valid.
//!
//! Notes and non-goals
//! - No thread-safe variants; wrap a container if you need sharing.
//! - Keys are immutable post-insert; there is no `key_mut`, and replacing
//!   a value keeps the originally stored key.
//! - Policies must be coherent (equal keys, equal codes; a total order);
//!   the containers do not verify this and a broken policy loses entries
//!   rather than corrupting memory.
//! - Public API surface is the four containers, the policy types, the
//!   `Cursor` trait, and `Error`; the guard and arenas are implementation
//!   details.

pub mod cursor;
mod error;
mod guard;
pub mod hash_map;
mod hash_map_proptest;
pub mod hash_set;
pub mod policy;
pub mod tree_map;
mod tree_map_proptest;
pub mod tree_set;

// Public surface
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use policy::{Comparator, HashFn, Hasher, NaturalOrder, OrderFn, ReverseOrder, StdHasher};
pub use tree_map::TreeMap;
pub use tree_set::TreeSet;
