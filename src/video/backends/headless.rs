//! A backend without any native device. Buffers live in host memory so
//! everything above the device can run in tests and on machines without a GPU.

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::shader::prelude::ShaderSource;
use crate::utils::prelude::DataVec;

use super::super::resources::*;
use super::super::ClearMask;
use super::{DrawCall, Visitor};

#[derive(Default)]
pub struct HeadlessVisitor {
    vertex_buffers: DataVec<Vec<u8>>,
    index_buffers: DataVec<Vec<u8>>,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        Default::default()
    }
}

fn allocate(len: usize, data: Option<&[u8]>) -> Vec<u8> {
    let mut buf = vec![0; len];
    if let Some(v) = data {
        buf[..v.len()].copy_from_slice(v);
    }

    buf
}

fn write(buf: Option<&mut Vec<u8>>, offset: usize, data: &[u8]) -> Result<()> {
    let buf = buf.ok_or_else(|| format_err!("Buffer is not allocated."))?;
    buf[offset..offset + data.len()].copy_from_slice(data);
    Ok(())
}

impl Visitor for HeadlessVisitor {
    unsafe fn make_current(&self) -> Result<()> {
        Ok(())
    }

    unsafe fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        params: &VertexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        self.vertex_buffers.create(handle, allocate(params.len(), data));
        Ok(())
    }

    unsafe fn update_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        write(self.vertex_buffers.get_mut(handle), offset, data)
    }

    unsafe fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()> {
        self.vertex_buffers.free(handle);
        Ok(())
    }

    unsafe fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        params: &IndexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        self.index_buffers.create(handle, allocate(params.len(), data));
        Ok(())
    }

    unsafe fn update_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        write(self.index_buffers.get_mut(handle), offset, data)
    }

    unsafe fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()> {
        self.index_buffers.free(handle);
        Ok(())
    }

    unsafe fn create_vertex_array(&mut self, _: VertexArrayHandle, _: &VertexArrayParams) -> Result<()> {
        Ok(())
    }

    unsafe fn delete_vertex_array(&mut self, _: VertexArrayHandle) -> Result<()> {
        Ok(())
    }

    unsafe fn create_shader(&mut self, _: ShaderHandle, _: &ShaderParams, _: &ShaderSource) -> Result<()> {
        Ok(())
    }

    unsafe fn delete_shader(&mut self, _: ShaderHandle) -> Result<()> {
        Ok(())
    }

    unsafe fn clear(&mut self, _: ClearMask, _: Color) -> Result<()> {
        Ok(())
    }

    unsafe fn set_viewport(&mut self, _: Vector2<i32>, _: Vector2<u32>) -> Result<()> {
        Ok(())
    }

    unsafe fn resize(&mut self, _: Vector2<u32>) -> Result<()> {
        Ok(())
    }

    unsafe fn draw(&mut self, _: DrawCall) -> Result<()> {
        Ok(())
    }

    unsafe fn swap_buffers(&mut self) -> Result<()> {
        Ok(())
    }
}
