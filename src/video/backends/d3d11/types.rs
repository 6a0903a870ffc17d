use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::errors::*;
use crate::shader::prelude::Version;

use super::super::super::resources::*;

pub fn vertex_format(format: VertexFormat, size: u8, normalized: bool) -> Result<DXGI_FORMAT> {
    let v = match (format, size, normalized) {
        (VertexFormat::Float, 1, _) => DXGI_FORMAT_R32_FLOAT,
        (VertexFormat::Float, 2, _) => DXGI_FORMAT_R32G32_FLOAT,
        (VertexFormat::Float, 3, _) => DXGI_FORMAT_R32G32B32_FLOAT,
        (VertexFormat::Float, 4, _) => DXGI_FORMAT_R32G32B32A32_FLOAT,

        (VertexFormat::Byte, 1, true) => DXGI_FORMAT_R8_SNORM,
        (VertexFormat::Byte, 2, true) => DXGI_FORMAT_R8G8_SNORM,
        (VertexFormat::Byte, 4, true) => DXGI_FORMAT_R8G8B8A8_SNORM,
        (VertexFormat::Byte, 1, false) => DXGI_FORMAT_R8_SINT,
        (VertexFormat::Byte, 2, false) => DXGI_FORMAT_R8G8_SINT,
        (VertexFormat::Byte, 4, false) => DXGI_FORMAT_R8G8B8A8_SINT,

        (VertexFormat::UByte, 1, true) => DXGI_FORMAT_R8_UNORM,
        (VertexFormat::UByte, 2, true) => DXGI_FORMAT_R8G8_UNORM,
        (VertexFormat::UByte, 4, true) => DXGI_FORMAT_R8G8B8A8_UNORM,
        (VertexFormat::UByte, 1, false) => DXGI_FORMAT_R8_UINT,
        (VertexFormat::UByte, 2, false) => DXGI_FORMAT_R8G8_UINT,
        (VertexFormat::UByte, 4, false) => DXGI_FORMAT_R8G8B8A8_UINT,

        (VertexFormat::Short, 1, true) => DXGI_FORMAT_R16_SNORM,
        (VertexFormat::Short, 2, true) => DXGI_FORMAT_R16G16_SNORM,
        (VertexFormat::Short, 4, true) => DXGI_FORMAT_R16G16B16A16_SNORM,
        (VertexFormat::Short, 1, false) => DXGI_FORMAT_R16_SINT,
        (VertexFormat::Short, 2, false) => DXGI_FORMAT_R16G16_SINT,
        (VertexFormat::Short, 4, false) => DXGI_FORMAT_R16G16B16A16_SINT,

        (VertexFormat::UShort, 1, true) => DXGI_FORMAT_R16_UNORM,
        (VertexFormat::UShort, 2, true) => DXGI_FORMAT_R16G16_UNORM,
        (VertexFormat::UShort, 4, true) => DXGI_FORMAT_R16G16B16A16_UNORM,
        (VertexFormat::UShort, 1, false) => DXGI_FORMAT_R16_UINT,
        (VertexFormat::UShort, 2, false) => DXGI_FORMAT_R16G16_UINT,
        (VertexFormat::UShort, 4, false) => DXGI_FORMAT_R16G16B16A16_UINT,

        _ => bail!(
            "[D3D11] {} components of {:?} can not be fetched as a vertex element.",
            size,
            format
        ),
    };

    Ok(v)
}

pub fn index_format(format: IndexFormat) -> DXGI_FORMAT {
    match format {
        IndexFormat::U16 => DXGI_FORMAT_R16_UINT,
        IndexFormat::U32 => DXGI_FORMAT_R32_UINT,
    }
}

pub fn topology(primitive: Primitive) -> D3D_PRIMITIVE_TOPOLOGY {
    match primitive {
        Primitive::Points => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        Primitive::Lines => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        Primitive::LineStrip => D3D_PRIMITIVE_TOPOLOGY_LINESTRIP,
        Primitive::Triangles => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        Primitive::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
    }
}

/// The HLSL dialect version a feature level supports.
pub fn feature_level_version(level: D3D_FEATURE_LEVEL) -> Version {
    match level {
        D3D_FEATURE_LEVEL_9_1 | D3D_FEATURE_LEVEL_9_2 => Version(9, 1),
        D3D_FEATURE_LEVEL_9_3 => Version(9, 3),
        D3D_FEATURE_LEVEL_10_0 => Version(10, 0),
        D3D_FEATURE_LEVEL_10_1 => Version(10, 1),
        _ => Version(11, 0),
    }
}

/// Splits a semantic like `TEXCOORD1` into its name and index.
pub fn split_semantic(semantic: &str) -> (&str, u32) {
    let digits = semantic
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();

    let (name, index) = semantic.split_at(semantic.len() - digits);
    (name, index.parse().unwrap_or(0))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn semantics() {
        assert_eq!(split_semantic("POSITION"), ("POSITION", 0));
        assert_eq!(split_semantic("TEXCOORD1"), ("TEXCOORD", 1));
        assert_eq!(split_semantic("COLOR0"), ("COLOR", 0));
    }
}
