//! The backends of the render context, each responsible for only one thing:
//! turning validated front-end requests into native graphics API calls.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

#[cfg(windows)]
pub mod d3d11;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::shader::prelude::{ShaderSource, UniformValue};

use super::resources::*;
use super::ClearMask;

/// A draw request that already passed front-end validation.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub shader: ShaderHandle,
    pub vertex_array: VertexArrayHandle,
    /// Values of every declared uniform, in declaration order.
    pub uniforms: &'a [UniformValue],
    pub primitive: Primitive,
    pub first: u32,
    pub count: u32,
    pub indexed: bool,
}

pub trait Visitor {
    /// Binds the native context to the calling thread.
    unsafe fn make_current(&self) -> Result<()>;

    unsafe fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        params: &VertexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()>;

    unsafe fn update_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()>;

    unsafe fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()>;

    unsafe fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        params: &IndexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()>;

    unsafe fn update_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()>;

    unsafe fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()>;

    unsafe fn create_vertex_array(
        &mut self,
        handle: VertexArrayHandle,
        params: &VertexArrayParams,
    ) -> Result<()>;

    unsafe fn delete_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()>;

    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        params: &ShaderParams,
        source: &ShaderSource,
    ) -> Result<()>;

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()>;

    unsafe fn clear(&mut self, mask: ClearMask, color: Color) -> Result<()>;

    unsafe fn set_viewport(&mut self, position: Vector2<i32>, size: Vector2<u32>) -> Result<()>;

    /// Resizes the back buffer.
    unsafe fn resize(&mut self, dimensions: Vector2<u32>) -> Result<()>;

    unsafe fn draw(&mut self, call: DrawCall) -> Result<()>;

    /// Presents the back buffer.
    unsafe fn swap_buffers(&mut self) -> Result<()>;
}

/// The closed set of backends. Adding a backend means adding a variant here and
/// an arm to the dispatch below.
pub enum Device {
    Headless(headless::HeadlessVisitor),
    #[cfg(not(target_arch = "wasm32"))]
    GL(gl::GLVisitor),
    #[cfg(windows)]
    D3D11(d3d11::D3D11Visitor),
}

impl Device {
    pub fn visitor(&self) -> &dyn Visitor {
        match self {
            Device::Headless(v) => v,
            #[cfg(not(target_arch = "wasm32"))]
            Device::GL(v) => v,
            #[cfg(windows)]
            Device::D3D11(v) => v,
        }
    }

    pub fn visitor_mut(&mut self) -> &mut dyn Visitor {
        match self {
            Device::Headless(v) => v,
            #[cfg(not(target_arch = "wasm32"))]
            Device::GL(v) => v,
            #[cfg(windows)]
            Device::D3D11(v) => v,
        }
    }
}
