//! The per-thread "current context" registry.
//!
//! At most one `RenderContext` is current on a thread. Making another context
//! current replaces the previous one; contexts on other threads are unaffected.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-unique identity of a `RenderContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(usize);

static NEXT: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CURRENT: Cell<Option<ContextId>> = Cell::new(None);
}

impl ContextId {
    pub(crate) fn next() -> Self {
        ContextId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The context current on the calling thread, if any.
#[inline]
pub fn current() -> Option<ContextId> {
    CURRENT.with(|v| v.get())
}

#[inline]
pub(crate) fn set(id: ContextId) {
    CURRENT.with(|v| v.set(Some(id)));
}

/// Clears the registry if `id` is the current context.
pub(crate) fn reset(id: ContextId) {
    CURRENT.with(|v| {
        if v.get() == Some(id) {
            v.set(None);
        }
    });
}

#[inline]
pub(crate) fn is(id: ContextId) -> bool {
    current() == Some(id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn last_set_wins() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);

        set(a);
        set(b);
        assert!(!is(a));
        assert!(is(b));

        reset(a);
        assert_eq!(current(), Some(b));
        reset(b);
        assert_eq!(current(), None);
    }

    #[test]
    fn per_thread() {
        let a = ContextId::next();
        set(a);

        let other = std::thread::spawn(current).join().unwrap();
        assert_eq!(other, None);
        assert!(is(a));
        reset(a);
    }
}
