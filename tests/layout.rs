extern crate lumen;

use lumen::shader::prelude::*;

fn layout() -> ShaderLayout {
    ShaderLayout::build()
        .with_uniform("u_a", DataType::Float)
        .with_uniform("u_b", DataType::Vec3)
        .with_uniform("u_texture", DataType::Sampler2D)
        .with_uniform("u_c", DataType::Vec2)
        .with_uniform("u_d", DataType::Mat4)
        .finish()
        .unwrap()
}

fn offsets(block: &UniformBlock) -> Vec<(&str, usize)> {
    block
        .members()
        .iter()
        .map(|v| (v.name.as_str(), v.offset))
        .collect()
}

#[test]
fn std140() {
    let block = UniformBlock::new(Packing::Std140, &layout());
    assert_eq!(
        offsets(&block),
        vec![("u_a", 0), ("u_b", 16), ("u_c", 32), ("u_d", 48)]
    );
    assert_eq!(block.size(), 112);
}

#[test]
fn hlsl() {
    let block = UniformBlock::new(Packing::Hlsl, &layout());
    assert_eq!(
        offsets(&block),
        vec![("u_a", 0), ("u_b", 4), ("u_c", 16), ("u_d", 32)]
    );
    assert_eq!(block.size(), 96);
}

#[test]
fn samplers_stay_outside() {
    let block = UniformBlock::new(Packing::Std140, &layout());
    assert!(block.member("u_texture").is_none());

    let empty = ShaderLayout::build()
        .with_uniform("u_texture", DataType::Sampler2D)
        .finish()
        .unwrap();

    let block = UniformBlock::new(Packing::Hlsl, &empty);
    assert!(block.is_empty());
    assert_eq!(block.size(), 0);
}

#[test]
fn write() {
    let block = UniformBlock::new(Packing::Std140, &layout());
    let mut buf = vec![0u8; block.size()];

    block.write(&mut buf, "u_a", &2.0f32.into()).unwrap();
    block.write(&mut buf, "u_c", &[1.0f32, -1.0].into()).unwrap();
    assert_eq!(&buf[0..4], &2.0f32.to_bits().to_le_bytes());
    assert_eq!(&buf[32..36], &1.0f32.to_bits().to_le_bytes());
    assert_eq!(&buf[36..40], &(-1.0f32).to_bits().to_le_bytes());

    let mut m = [[0.0f32; 4]; 4];
    m[1][2] = 5.0;
    block.write(&mut buf, "u_d", &m.into()).unwrap();
    let at = 48 + 16 + 8;
    assert_eq!(&buf[at..at + 4], &5.0f32.to_bits().to_le_bytes());

    assert_eq!(
        block.write(&mut buf, "u_b", &1.0f32.into()),
        Err(ShaderError::UniformTypeMismatch {
            name: "u_b".into(),
            expected: DataType::Vec3,
            found: DataType::Float,
        })
    );

    assert_eq!(
        block.write(&mut buf, "u_texture", &UniformValue::Sampler(0)),
        Err(ShaderError::UndefinedBlockMember("u_texture".into()))
    );

    let mut small = [0u8; 16];
    assert_eq!(
        block.write(&mut small, "u_a", &1.0f32.into()),
        Err(ShaderError::BufferTooSmall(112, 16))
    );
}
