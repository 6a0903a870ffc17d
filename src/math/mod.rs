//! The handful of math types the core needs, mostly re-exported from `cgmath`.

pub mod color;

pub mod prelude {
    pub use super::color::Color;
    pub use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};
}
