use super::handle::HandleLike;

/// Backend-side storage indexed by handles that were allocated elsewhere, usually
/// by an `ObjectPool` owned by the front-end.
#[derive(Debug)]
pub struct DataVec<T> {
    buf: Vec<Option<T>>,
    versions: Vec<u32>,
}

impl<T> Default for DataVec<T> {
    fn default() -> Self {
        DataVec::new()
    }
}

impl<T> DataVec<T> {
    pub fn new() -> Self {
        DataVec {
            buf: Vec::new(),
            versions: Vec::new(),
        }
    }

    pub fn get<H: HandleLike>(&self, handle: H) -> Option<&T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].as_ref(),
            _ => None,
        }
    }

    pub fn get_mut<H: HandleLike>(&mut self, handle: H) -> Option<&mut T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].as_mut(),
            _ => None,
        }
    }

    pub fn create<H: HandleLike>(&mut self, handle: H, value: T) {
        let index = handle.index() as usize;

        if self.buf.len() <= index {
            self.buf.resize_with(index + 1, || None);
            self.versions.resize(index + 1, 0);
        }

        self.buf[index] = Some(value);
        self.versions[index] = handle.version();
    }

    pub fn free<H: HandleLike>(&mut self, handle: H) -> Option<T> {
        let index = handle.index() as usize;
        match self.versions.get(index) {
            Some(&v) if v == handle.version() => self.buf[index].take(),
            _ => None,
        }
    }

    /// Takes every stored value out, newest slot first.
    pub fn drain_rev(&mut self) -> Vec<T> {
        self.buf.iter_mut().rev().filter_map(Option::take).collect()
    }
}
