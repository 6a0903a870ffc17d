use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use super::handle::{HandleIndex, HandleLike};

/// `HandlePool` hands out handles with a continuous `index` field, recycles
/// freed indices (lowest first) and bumps the version on every reuse, so
/// stale handles never alias a live one.
///
/// An odd version marks a live slot, an even version a freed one.
#[derive(Debug)]
pub struct HandlePool<H: HandleLike> {
    versions: Vec<HandleIndex>,
    frees: BinaryHeap<Reverse<HandleIndex>>,
    _marker: PhantomData<H>,
}

impl<H: HandleLike> Default for HandlePool<H> {
    fn default() -> Self {
        HandlePool::new()
    }
}

impl<H: HandleLike> HandlePool<H> {
    /// Constructs a new, empty `HandlePool`.
    pub fn new() -> Self {
        HandlePool {
            versions: Vec::new(),
            frees: BinaryHeap::new(),
            _marker: PhantomData,
        }
    }

    /// Creates a unused handle.
    pub fn create(&mut self) -> H {
        if let Some(Reverse(index)) = self.frees.pop() {
            let index = index as usize;
            self.versions[index] += 1;
            H::new(index as HandleIndex, self.versions[index])
        } else {
            self.versions.push(1);
            H::new(self.versions.len() as HandleIndex - 1, 1)
        }
    }

    /// Returns true if this handle was created by this pool, and has not been
    /// freed yet.
    pub fn is_alive(&self, handle: H) -> bool {
        let index = handle.index() as usize;
        index < self.versions.len()
            && self.versions[index] & 0x1 == 1
            && self.versions[index] == handle.version()
    }

    /// Recycles the handle index, and mark its version as dead.
    pub fn free(&mut self, handle: H) -> bool {
        if !self.is_alive(handle) {
            return false;
        }

        self.versions[handle.index() as usize] += 1;
        self.frees.push(Reverse(handle.index()));
        true
    }

    /// Returns the total number of alive handle in this pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len() - self.frees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every alive handle, in index order.
    pub fn iter(&self) -> impl Iterator<Item = H> + '_ {
        self.versions
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v & 0x1 == 1)
            .map(|(i, &v)| H::new(i as HandleIndex, v))
    }
}

#[cfg(test)]
mod test {
    use super::super::handle::Handle;
    use super::*;

    #[test]
    fn recycle() {
        let mut pool: HandlePool<Handle> = HandlePool::new();
        let e1 = pool.create();
        let e2 = pool.create();
        assert!(pool.is_alive(e1));
        assert_eq!(pool.len(), 2);

        assert!(pool.free(e1));
        assert!(!pool.free(e1));
        assert!(!pool.is_alive(e1));

        let e3 = pool.create();
        assert_eq!(e3.index(), e1.index());
        assert_ne!(e3.version(), e1.version());
        assert!(!pool.is_alive(e1));
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![e3, e2]);
    }
}
