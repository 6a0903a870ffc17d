//! Parameters of the GPU objects a `RenderContext` owns.

use crate::shader::prelude::{Attribute, ShaderLayout, UniformBlock};

use super::errors::{Error, Result};

impl_handle!(VertexBufferHandle);
impl_handle!(IndexBufferHandle);
impl_handle!(VertexArrayHandle);
impl_handle!(ShaderHandle);

/// Hint abouts the intended update strategy of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum BufferHint {
    /// The resource is initialized with data and cannot be changed later, this
    /// is the most common and most efficient usage.
    Immutable,
    /// The resource is initialized without data and will be written by the CPU
    /// before use, updates will be infrequent.
    Dynamic,
    /// The resource is initialized without data, but will be be updated by the
    /// CPU in each frame.
    Stream,
}

/// Defines how the input vertex data is used to assemble primitives.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

impl Primitive {
    /// The number of triangles `count` vertices assemble into.
    pub fn assemble_triangles(self, count: u32) -> u32 {
        match self {
            Primitive::Triangles => count / 3,
            Primitive::TriangleStrip => count.saturating_sub(2),
            _ => 0,
        }
    }
}

/// Vertex indices can be either 16- or 32-bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// The data type in the vertex component.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum VertexFormat {
    Byte,
    UByte,
    Short,
    UShort,
    Float,
}

impl VertexFormat {
    #[inline]
    pub fn stride(self) -> u8 {
        match self {
            VertexFormat::Byte | VertexFormat::UByte => 1,
            VertexFormat::Short | VertexFormat::UShort => 2,
            VertexFormat::Float => 4,
        }
    }
}

/// The details of a vertex attribute.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct VertexAttribute {
    pub name: Attribute,
    /// The data type of each component of this element.
    pub format: VertexFormat,
    /// The number of components per vertex element, 1 to 4.
    pub size: u8,
    /// Whether fixed-point data values should be normalized.
    pub normalized: bool,
    /// Byte offset inside the vertex.
    pub offset: u8,
}

/// `VertexLayout` defines how a single vertex structure looks like. Elements
/// are packed in insertion order.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct VertexLayout {
    stride: u8,
    elements: Vec<VertexAttribute>,
}

impl VertexLayout {
    #[inline]
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::new()
    }

    /// Size in bytes of a single vertex.
    #[inline]
    pub fn stride(&self) -> u8 {
        self.stride
    }

    #[inline]
    pub fn elements(&self) -> &[VertexAttribute] {
        &self.elements
    }

    pub fn element(&self, name: Attribute) -> Option<&VertexAttribute> {
        self.elements.iter().find(|v| v.name == name)
    }
}

#[derive(Default)]
pub struct VertexLayoutBuilder {
    elements: Vec<(Attribute, VertexFormat, u8, bool)>,
}

impl VertexLayoutBuilder {
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends an element. Declaring the same attribute again replaces it in place.
    pub fn with(mut self, name: Attribute, format: VertexFormat, size: u8, normalized: bool) -> Self {
        let desc = (name, format, size, normalized);
        match self.elements.iter().position(|v| v.0 == name) {
            Some(i) => self.elements[i] = desc,
            None => self.elements.push(desc),
        }

        self
    }

    pub fn finish(self) -> Result<VertexLayout> {
        let mut layout = VertexLayout::default();
        let mut stride = 0usize;

        for (name, format, size, normalized) in self.elements {
            if size == 0 || size > 4 {
                return Err(Error::InvalidVertexLayout(format!(
                    "{} has {} components.",
                    name, size
                )));
            }

            if stride > 255 {
                return Err(Error::InvalidVertexLayout("Vertex is too large.".into()));
            }

            layout.elements.push(VertexAttribute {
                name,
                format,
                size,
                normalized,
                offset: stride as u8,
            });

            stride += usize::from(size) * usize::from(format.stride());
        }

        if stride > 255 {
            return Err(Error::InvalidVertexLayout("Vertex is too large.".into()));
        }

        layout.stride = stride as u8;
        Ok(layout)
    }
}

/// The setup parameters of a vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferParams {
    pub hint: BufferHint,
    pub layout: VertexLayout,
    pub num: usize,
}

impl VertexBufferParams {
    #[inline]
    pub fn len(&self) -> usize {
        self.num * usize::from(self.layout.stride())
    }
}

/// The setup parameters of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferParams {
    pub hint: BufferHint,
    pub format: IndexFormat,
    pub num: usize,
}

impl IndexBufferParams {
    #[inline]
    pub fn len(&self) -> usize {
        self.num * self.format.stride()
    }
}

/// A vertex buffer with an optional index buffer, bound together for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArrayParams {
    pub vertices: VertexBufferHandle,
    pub indices: Option<IndexBufferHandle>,
}

/// A compiled program as the front-end and backends see it.
#[derive(Debug, Clone)]
pub struct ShaderParams {
    pub layout: ShaderLayout,
    pub block: UniformBlock,
}
