use super::handle::HandleLike;
use super::handle_pool::HandlePool;

/// Values addressed by generational handles. A value lives exactly as long
/// as its handle is alive in the pool.
#[derive(Debug)]
pub struct ObjectPool<H: HandleLike, T: Sized> {
    handles: HandlePool<H>,
    entries: Vec<Option<T>>,
}

impl<H: HandleLike, T: Sized> Default for ObjectPool<H, T> {
    fn default() -> Self {
        ObjectPool::new()
    }
}

impl<H: HandleLike, T: Sized> ObjectPool<H, T> {
    pub fn new() -> Self {
        ObjectPool {
            handles: HandlePool::new(),
            entries: Vec::new(),
        }
    }

    /// Stores `value` under a fresh handle.
    pub fn create(&mut self, value: T) -> H {
        let handle = self.handles.create();
        let index = handle.index() as usize;

        if index >= self.entries.len() {
            self.entries.resize_with(index + 1, || None);
        }

        self.entries[index] = Some(value);
        handle
    }

    #[inline]
    fn slot(&self, handle: H) -> Option<usize> {
        Some(handle.index() as usize).filter(|_| self.handles.is_alive(handle))
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        let index = self.slot(handle)?;
        self.entries[index].as_ref()
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        let index = self.slot(handle)?;
        self.entries[index].as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: H) -> bool {
        self.handles.is_alive(handle)
    }

    /// Takes the value out and invalidates `handle`.
    pub fn free(&mut self, handle: H) -> Option<T> {
        let index = self.slot(handle)?;
        self.handles.free(handle);
        self.entries[index].take()
    }

    /// Removes every object, returning them with their handles in index order.
    pub fn drain(&mut self) -> Vec<(H, T)> {
        let handles: Vec<H> = self.handles.iter().collect();
        handles
            .into_iter()
            .filter_map(|h| self.free(h).map(|v| (h, v)))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
