//! Crate-wide error plumbing for the outer layers (window, assets, application).
//! Subsystems with a closed set of failures keep their own `errors` module.

pub use failure::{Error, Fail, ResultExt};

pub type Result<T> = ::std::result::Result<T, Error>;
