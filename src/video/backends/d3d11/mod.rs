//! Direct3D 11 backend, available on Windows only.

mod types;
pub mod visitor;

pub use self::visitor::D3D11Visitor;
