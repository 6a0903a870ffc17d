pub mod capabilities;
mod types;
pub mod visitor;

pub use self::visitor::GLVisitor;
