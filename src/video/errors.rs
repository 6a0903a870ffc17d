use crate::shader::errors::Error as ShaderError;
use crate::shader::prelude::{Attribute, DataType};

use super::resources::{IndexBufferHandle, ShaderHandle, VertexArrayHandle, VertexBufferHandle};
use super::Api;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "The render context is not current on this thread.")]
    ContextNotCurrent,
    #[fail(display = "{:?} is not available on this platform.", _0)]
    ApiUnavailable(Api),
    #[fail(display = "Window: {}", _0)]
    Window(String),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
    #[fail(display = "Shader: {}", _0)]
    Shader(#[cause] ShaderError),
    #[fail(display = "{} is invalid.", _0)]
    VertexBufferHandleInvalid(VertexBufferHandle),
    #[fail(display = "{} is invalid.", _0)]
    IndexBufferHandleInvalid(IndexBufferHandle),
    #[fail(display = "{} is invalid.", _0)]
    VertexArrayHandleInvalid(VertexArrayHandle),
    #[fail(display = "{} is invalid.", _0)]
    ShaderHandleInvalid(ShaderHandle),
    #[fail(display = "Vertex layout is invalid: {}", _0)]
    InvalidVertexLayout(String),
    #[fail(display = "Trying to update immutable buffer.")]
    UpdateImmutableBuffer,
    #[fail(display = "Out of bounds.")]
    OutOfBounds,
    #[fail(display = "No vertex array is bound.")]
    NoVertexArray,
    #[fail(display = "The bound vertex array has no index buffer.")]
    NoIndexBuffer,
    #[fail(display = "Attribute {} is missing from the vertex layout.", _0)]
    AttributeMissing(Attribute),
    #[fail(display = "Attribute {} needs {} components, but the vertex layout has {}.", _0, _1, _2)]
    AttributeSizeMismatch(Attribute, u8, u8),
    #[fail(display = "Uniform '{}' is not bound.", _0)]
    UniformMissing(String),
    #[fail(display = "Uniform '{}' is not declared by the shader.", _0)]
    UniformUndefined(String),
    #[fail(display = "The uniform {} needs a {} instead of {}.", _0, _1, _2)]
    UniformTypeMismatch(String, DataType, DataType),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<ShaderError> for Error {
    fn from(err: ShaderError) -> Error {
        Error::Shader(err)
    }
}

impl From<failure::Error> for Error {
    fn from(err: failure::Error) -> Error {
        Error::Backend(format!("{}", err))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<glutin::CreationError> for Error {
    fn from(err: glutin::CreationError) -> Error {
        Error::Window(format!("{}", err))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<glutin::ContextError> for Error {
    fn from(err: glutin::ContextError) -> Error {
        Error::Backend(format!("{}", err))
    }
}
