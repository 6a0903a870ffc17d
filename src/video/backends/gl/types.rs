//! Maps backend-neutral resource descriptions onto GL enums.

use gl;
use gl::types::*;

use super::super::super::resources::*;
use super::super::super::ClearMask;

pub fn usage(hint: BufferHint) -> GLenum {
    match hint {
        BufferHint::Immutable => gl::STATIC_DRAW,
        BufferHint::Dynamic => gl::DYNAMIC_DRAW,
        BufferHint::Stream => gl::STREAM_DRAW,
    }
}

/// The component type of a vertex attribute.
pub fn component_type(format: VertexFormat) -> GLenum {
    match format {
        VertexFormat::Byte => gl::BYTE,
        VertexFormat::UByte => gl::UNSIGNED_BYTE,
        VertexFormat::Short => gl::SHORT,
        VertexFormat::UShort => gl::UNSIGNED_SHORT,
        VertexFormat::Float => gl::FLOAT,
    }
}

pub fn index_type(format: IndexFormat) -> GLenum {
    if format == IndexFormat::U16 {
        gl::UNSIGNED_SHORT
    } else {
        gl::UNSIGNED_INT
    }
}

pub fn mode(primitive: Primitive) -> GLenum {
    match primitive {
        Primitive::Points => gl::POINTS,
        Primitive::Lines => gl::LINES,
        Primitive::LineStrip => gl::LINE_STRIP,
        Primitive::Triangles => gl::TRIANGLES,
        Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
    }
}

pub fn clear_bits(mask: ClearMask) -> GLbitfield {
    [
        (ClearMask::COLOR, gl::COLOR_BUFFER_BIT),
        (ClearMask::DEPTH, gl::DEPTH_BUFFER_BIT),
        (ClearMask::STENCIL, gl::STENCIL_BUFFER_BIT),
    ]
    .iter()
    .filter(|(flag, _)| mask.contains(*flag))
    .fold(0, |bits, (_, bit)| bits | bit)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clear_mask() {
        assert_eq!(clear_bits(ClearMask::empty()), 0);
        assert_eq!(
            clear_bits(ClearMask::COLOR | ClearMask::STENCIL),
            gl::COLOR_BUFFER_BIT | gl::STENCIL_BUFFER_BIT
        );
    }
}
