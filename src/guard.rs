//! Debug-only reentry detection.
//!
//! Container operations run caller-supplied policy code (hashing,
//! comparison, equality) while their links may be mid-update. Wrapping the
//! probing phase in `let _t = self.check.enter();` makes a nested call into
//! the same container panic in debug builds instead of corrupting it. In
//! release builds the check compiles away.
//!
//! The embedded raw-pointer marker also keeps every containing type
//! `!Send` and `!Sync`; the containers are single-threaded by contract.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-container reentry flag. Containers hold one and guard sections that
/// execute policy code with [`ReentryCheck::enter`].
#[derive(Debug)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    _single_threaded: PhantomData<*mut ()>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _single_threaded: PhantomData,
        }
    }

    /// Enters a guarded section, releasing it when the token drops. Panics
    /// in debug builds if the section is already entered.
    #[inline]
    pub(crate) fn enter(&self) -> ReentryToken<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.get(),
                "reentry detected: container operation called from inside \
                 another operation on the same container"
            );
            self.busy.set(true);
            return ReentryToken { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentryToken { _life: PhantomData };
        }
    }
}

impl Default for ReentryCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token returned by [`ReentryCheck::enter`].
pub(crate) struct ReentryToken<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentryCheck,
    #[cfg(not(debug_assertions))]
    _life: PhantomData<&'a ()>,
}

impl Drop for ReentryToken<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::ReentryCheck;

    /// Invariant: sequential guarded sections are fine; the token releases
    /// the flag on drop.
    #[test]
    fn sequential_entry() {
        let check = ReentryCheck::new();
        drop(check.enter());
        let _t = check.enter();
    }

    /// Invariant: nested entry panics while a token is live.
    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let check = ReentryCheck::new();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = check.enter();
            let _inner = check.enter();
        }));
        assert!(caught.is_err(), "nested enter must panic in debug builds");
    }

    /// Invariant: the panic path leaves the flag released once tokens are
    /// gone, so the container stays usable after a caught panic.
    #[cfg(debug_assertions)]
    #[test]
    fn recovers_after_caught_panic() {
        let check = ReentryCheck::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = check.enter();
            let _inner = check.enter();
        }));
        let _t = check.enter();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let check = ReentryCheck::new();
        let _a = check.enter();
        let _b = check.enter();
    }
}
