//! Commonly used utilities like handles and pools.

#[macro_use]
pub mod handle;
pub mod data_vec;
pub mod handle_pool;
pub mod object_pool;

pub mod prelude {
    pub use super::data_vec::DataVec;
    pub use super::handle::{Handle, HandleIndex, HandleLike};
    pub use super::handle_pool::HandlePool;
    pub use super::object_pool::ObjectPool;
}
