//! Removable forward traversal shared by all containers.
//!
//! A cursor steps through a container one element at a time and can delete
//! the element it most recently yielded, without disturbing the rest of the
//! traversal. It holds an exclusive borrow of its container, so any other
//! mutation while a cursor is live is a compile error; `remove` is the one
//! structural change allowed mid-walk.
//!
//! The protocol is deliberately explicit rather than `std::iter::Iterator`:
//! `next` lends items tied to the cursor borrow (a generic associated type),
//! which is what lets `remove` take the element back immediately after.

use crate::error::Result;

/// Forward traversal with removal of the last yielded element.
///
/// `next` yields elements in the container's traversal order (bucket chains
/// from the highest bucket downward for hashed containers, ascending key
/// order for ordered ones) and fails with [`Error::NotFound`] once
/// exhausted. `remove` deletes the element the preceding `next` yielded and
/// fails with [`Error::InvalidCursor`] if there is no such element: before
/// the first `next`, or when it already removed one since.
///
/// [`Error::NotFound`]: crate::Error::NotFound
/// [`Error::InvalidCursor`]: crate::Error::InvalidCursor
pub trait Cursor {
    /// What `next` lends: `(&K, &mut V)` for maps, `&T` for sets.
    type Item<'c>
    where
        Self: 'c;

    /// What `remove` hands back: `(K, V)` for maps, `T` for sets.
    type Removed;

    /// Whether another element remains, without advancing.
    fn has_next(&self) -> bool;

    /// Yields the next element and advances past it.
    fn next(&mut self) -> Result<Self::Item<'_>>;

    /// Deletes the element the last `next` yielded and returns ownership.
    /// The elements not yet yielded are unaffected: none skipped, none
    /// repeated.
    fn remove(&mut self) -> Result<Self::Removed>;
}
