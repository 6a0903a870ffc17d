use std::fmt;
use std::hash::Hash;

/// Both halves of a handle are 32 bits, so a handle fits in one 64-bit word.
pub type HandleIndex = u32;

/// A generational reference into a pool.
///
/// Pools recycle `index` once a handle is freed; `version` changes on every
/// reuse so a stale handle never resolves to the slot's new occupant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    index: HandleIndex,
    version: HandleIndex,
}

impl Handle {
    #[inline]
    pub fn new(index: HandleIndex, version: HandleIndex) -> Self {
        Handle { index, version }
    }

    /// The all-zero handle. No pool ever hands it out.
    #[inline]
    pub fn nil() -> Self {
        Handle::default()
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Handle::nil()
    }

    #[inline]
    pub fn index(self) -> HandleIndex {
        self.index
    }

    #[inline]
    pub fn version(self) -> HandleIndex {
        self.version
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handle ({}, {})", self.index, self.version)
    }
}

/// Implemented by `Handle` and every typed handle declared with
/// `impl_handle!`, so pools stay generic over them.
pub trait HandleLike: fmt::Debug + Copy + Hash + Eq {
    fn new(index: HandleIndex, version: HandleIndex) -> Self;
    fn index(&self) -> HandleIndex;
    fn version(&self) -> HandleIndex;
}

impl HandleLike for Handle {
    fn new(index: HandleIndex, version: HandleIndex) -> Self {
        Handle::new(index, version)
    }

    fn index(&self) -> HandleIndex {
        self.index
    }

    fn version(&self) -> HandleIndex {
        self.version
    }
}

/// Declares a typed handle, e.g. `impl_handle!(ShaderHandle)`. Typed handles
/// print as `ShaderHandle (index, version)`.
#[macro_export]
macro_rules! impl_handle {
    ($name:ident) => {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::utils::handle::Handle);

        impl From<$name> for $crate::utils::handle::Handle {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        impl From<$crate::utils::handle::Handle> for $name {
            fn from(handle: $crate::utils::handle::Handle) -> Self {
                $name(handle)
            }
        }

        impl $crate::utils::handle::HandleLike for $name {
            #[inline]
            fn new(
                index: $crate::utils::handle::HandleIndex,
                version: $crate::utils::handle::HandleIndex,
            ) -> Self {
                $name($crate::utils::handle::Handle::new(index, version))
            }

            #[inline]
            fn index(&self) -> $crate::utils::handle::HandleIndex {
                self.0.index()
            }

            #[inline]
            fn version(&self) -> $crate::utils::handle::HandleIndex {
                self.0.version()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(
                    f,
                    "{} ({}, {})",
                    stringify!($name),
                    self.0.index(),
                    self.0.version()
                )
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    impl_handle!(TestHandle);

    #[test]
    fn nil() {
        assert!(!Handle::nil().is_valid());
        assert!(Handle::new(0, 1).is_valid());
        assert_eq!(Handle::new(2, 4).to_string(), "Handle (2, 4)");
    }

    #[test]
    fn typed() {
        let h: TestHandle = HandleLike::new(3, 1);
        assert_eq!(HandleLike::index(&h), 3);
        assert_eq!(format!("{}", h), "TestHandle (3, 1)");
        assert_eq!(Handle::from(h), Handle::new(3, 1));
    }
}
