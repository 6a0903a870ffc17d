//! Byte layout of the `Globals` uniform block.

use crate::math::prelude::{Matrix4, Vector2, Vector3, Vector4};

use super::errors::{Error, Result};
use super::program::ShaderLayout;
use super::variable::DataType;

/// Packing rules of the uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// `layout(std140)` uniform blocks.
    Std140,
    /// HLSL constant buffers.
    Hlsl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMember {
    pub name: String,
    pub data_type: DataType,
    pub offset: usize,
}

/// Offsets of every non-sampler uniform of a program, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    packing: Packing,
    members: Vec<BlockMember>,
    size: usize,
}

fn size_of(t: DataType) -> usize {
    match t {
        DataType::Sampler2D => 0,
        _ => t.components() * 4,
    }
}

fn std140_alignment(t: DataType) -> usize {
    match t {
        DataType::Int | DataType::Float => 4,
        DataType::Vec2 => 8,
        DataType::Vec3 | DataType::Vec4 | DataType::Mat4 => 16,
        DataType::Sampler2D => 1,
    }
}

#[inline]
fn align(v: usize, alignment: usize) -> usize {
    (v + alignment - 1) / alignment * alignment
}

const REGISTER: usize = 16;

impl UniformBlock {
    pub fn new(packing: Packing, layout: &ShaderLayout) -> Self {
        let mut members = Vec::new();
        let mut cursor = 0;

        for v in layout.block_uniforms() {
            let size = size_of(v.data_type);
            let offset = match packing {
                Packing::Std140 => align(cursor, std140_alignment(v.data_type)),
                Packing::Hlsl => {
                    let used = cursor % REGISTER;
                    if v.data_type == DataType::Mat4 || (used != 0 && used + size > REGISTER) {
                        align(cursor, REGISTER)
                    } else {
                        cursor
                    }
                }
            };

            members.push(BlockMember {
                name: v.name.clone(),
                data_type: v.data_type,
                offset,
            });

            cursor = offset + size;
        }

        UniformBlock {
            packing,
            members,
            size: align(cursor, REGISTER),
        }
    }

    #[inline]
    pub fn packing(&self) -> Packing {
        self.packing
    }

    #[inline]
    pub fn members(&self) -> &[BlockMember] {
        &self.members
    }

    /// Total size in bytes, a multiple of 16.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, name: &str) -> Option<&BlockMember> {
        self.members.iter().find(|v| v.name == name)
    }

    /// Packs `value` into `buf` at the offset of member `name`.
    pub fn write(&self, buf: &mut [u8], name: &str, value: &UniformValue) -> Result<()> {
        let member = self
            .member(name)
            .ok_or_else(|| Error::UndefinedBlockMember(name.into()))?;

        if member.data_type != value.data_type() {
            return Err(Error::UniformTypeMismatch {
                name: name.into(),
                expected: member.data_type,
                found: value.data_type(),
            });
        }

        if buf.len() < self.size {
            return Err(Error::BufferTooSmall(self.size, buf.len()));
        }

        let dst = &mut buf[member.offset..];
        match *value {
            UniformValue::Sampler(_) => {}
            UniformValue::I32(v) => dst[..4].copy_from_slice(&v.to_le_bytes()),
            UniformValue::F32(v) => put_floats(dst, &[v]),
            UniformValue::Vector2f(ref v) => put_floats(dst, v),
            UniformValue::Vector3f(ref v) => put_floats(dst, v),
            UniformValue::Vector4f(ref v) => put_floats(dst, v),
            UniformValue::Matrix4f(ref m) => {
                for (i, column) in m.iter().enumerate() {
                    put_floats(&mut dst[i * 16..], column);
                }
            }
        }

        Ok(())
    }
}

fn put_floats(dst: &mut [u8], src: &[f32]) {
    for (chunk, v) in dst.chunks_mut(4).zip(src) {
        chunk.copy_from_slice(&v.to_bits().to_le_bytes());
    }
}

/// A value bound to a uniform slot for one draw. Matrices are columns, as in
/// `cgmath`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    /// The texture unit a sampler reads from.
    Sampler(u32),
    I32(i32),
    F32(f32),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
    Matrix4f([[f32; 4]; 4]),
}

impl UniformValue {
    pub fn data_type(&self) -> DataType {
        match *self {
            UniformValue::Sampler(_) => DataType::Sampler2D,
            UniformValue::I32(_) => DataType::Int,
            UniformValue::F32(_) => DataType::Float,
            UniformValue::Vector2f(_) => DataType::Vec2,
            UniformValue::Vector3f(_) => DataType::Vec3,
            UniformValue::Vector4f(_) => DataType::Vec4,
            UniformValue::Matrix4f(_) => DataType::Mat4,
        }
    }
}

impl Into<UniformValue> for i32 {
    fn into(self) -> UniformValue {
        UniformValue::I32(self)
    }
}

impl Into<UniformValue> for f32 {
    fn into(self) -> UniformValue {
        UniformValue::F32(self)
    }
}

impl Into<UniformValue> for [f32; 2] {
    fn into(self) -> UniformValue {
        UniformValue::Vector2f(self)
    }
}

impl Into<UniformValue> for [f32; 3] {
    fn into(self) -> UniformValue {
        UniformValue::Vector3f(self)
    }
}

impl Into<UniformValue> for [f32; 4] {
    fn into(self) -> UniformValue {
        UniformValue::Vector4f(self)
    }
}

impl Into<UniformValue> for [[f32; 4]; 4] {
    fn into(self) -> UniformValue {
        UniformValue::Matrix4f(self)
    }
}

impl Into<UniformValue> for Vector2<f32> {
    fn into(self) -> UniformValue {
        UniformValue::Vector2f(self.into())
    }
}

impl Into<UniformValue> for Vector3<f32> {
    fn into(self) -> UniformValue {
        UniformValue::Vector3f(self.into())
    }
}

impl Into<UniformValue> for Vector4<f32> {
    fn into(self) -> UniformValue {
        UniformValue::Vector4f(self.into())
    }
}

impl Into<UniformValue> for Matrix4<f32> {
    fn into(self) -> UniformValue {
        UniformValue::Matrix4f(self.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alignment() {
        assert_eq!(align(0, 16), 0);
        assert_eq!(align(4, 16), 16);
        assert_eq!(align(12, 8), 16);
        assert_eq!(align(17, 4), 20);
    }
}
