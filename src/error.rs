//! Crate error type and `Result` alias.

use thiserror::Error;

/// Errors reported by map, set, and cursor operations.
///
/// Both variants signal a condition local to the calling site; no operation
/// leaves the container partially mutated when it fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key or element is not present. Also reported by
    /// `first`/`last` accessors on an empty container and by
    /// [`Cursor::next`](crate::Cursor::next) once the traversal is
    /// exhausted.
    #[error("element not found")]
    NotFound,

    /// [`Cursor::remove`](crate::Cursor::remove) was called with no pending
    /// element: either before the first `next`, or twice without an
    /// intervening `next`.
    #[error("cursor has no pending element to remove")]
    InvalidCursor,
}

/// Shorthand for results carrying a crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: display strings are stable; callers match on the enum but
    /// log the messages.
    #[test]
    fn display_messages() {
        assert_eq!(Error::NotFound.to_string(), "element not found");
        assert_eq!(
            Error::InvalidCursor.to_string(),
            "cursor has no pending element to remove"
        );
    }

    /// Invariant: the error is a plain value type usable in assertions.
    #[test]
    fn comparable_and_copyable() {
        let e = Error::NotFound;
        let copy = e;
        assert_eq!(e, copy);
        assert_ne!(Error::NotFound, Error::InvalidCursor);
    }
}
