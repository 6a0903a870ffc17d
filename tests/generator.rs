extern crate lumen;

use lumen::shader::errors::Result;
use lumen::shader::prelude::*;

struct Sprite(ShaderLayout);

impl Sprite {
    fn new() -> Self {
        let layout = ShaderLayout::build()
            .with_attribute(Attribute::Position, DataType::Vec3)
            .with_attribute(Attribute::Texcoord0, DataType::Vec2)
            .with_attribute(Attribute::Color0, DataType::Vec4)
            .with_varying("v_uv", DataType::Vec2)
            .with_uniform("u_mvp", DataType::Mat4)
            .with_uniform("u_tint", DataType::Vec4)
            .with_uniform("u_texture", DataType::Sampler2D)
            .finish()
            .unwrap();

        Sprite(layout)
    }
}

impl ShaderProgram for Sprite {
    fn layout(&self) -> &ShaderLayout {
        &self.0
    }

    fn vs_main(&self, stage: &mut VertexStage) -> Result<VertexOutput> {
        let position = stage.attribute(Attribute::Position)?;
        let uv = stage.attribute(Attribute::Texcoord0)?;
        let mvp = stage.uniform("u_mvp")?;

        let p = Vec4::from_vec3_scalar(&position, &Float::lit(1.0)?)?;
        let clip = stage.bind(&ops::mul(&mvp, &p)?)?;
        Ok(VertexOutput::new(clip).with_varying("v_uv", uv))
    }

    fn ps_main(&self, stage: &mut PixelStage) -> Result<PixelOutput> {
        let uv = stage.varying("v_uv")?;
        let texture = stage.uniform("u_texture")?;
        let tint = stage.uniform("u_tint")?;
        let color = ops::mul(&ops::sample(&texture, &uv)?, &tint)?;
        Ok(PixelOutput::new(color))
    }
}

fn generate(language: Language, version: Version) -> ShaderSource {
    let dialect = Dialect::resolve(language, version).unwrap();
    Generator::new(dialect).generate(&Sprite::new()).unwrap()
}

#[test]
fn glsl_330() {
    let src = generate(Language::Glsl, Version(3, 3));

    assert!(src.vs.starts_with("#version 330\n"));
    assert!(src.vs.contains("#define LUMEN_GLSL 1\n"));
    assert!(src.vs.contains("UNIFORM_BUFFER_BEGIN(Globals)\n"));
    assert!(src.vs.contains("    UNIFORM_MEMBER mat4 u_mvp;\n"));
    assert!(src.vs.contains("ATTRIBUTE vec3 a_Position;\n"));
    assert!(src.vs.contains("VARYING vec2 v_uv;\n"));
    assert!(src.vs.contains("    vec4 lumen_t0 = MUL(u_mvp, vec4(a_Position, 1.0));\n"));
    assert!(src.vs.contains("    v_uv = a_Texcoord0;\n"));
    assert!(src.vs.contains("    gl_Position = lumen_t0;\n"));

    assert!(src.fs.contains("uniform sampler2D u_texture;\n"));
    assert!(src.fs.contains("out vec4 lumen_FragColor;\n"));
    assert!(src.fs.contains("#define SAMPLE_TEXTURE(s, uv) texture(s, uv)\n"));
    assert!(src.fs.contains("    FRAG_COLOR = (SAMPLE_TEXTURE(u_texture, v_uv) * u_tint);\n"));
}

#[test]
fn glsl_es_100() {
    let src = generate(Language::GlslEs, Version(2, 0));

    assert!(src.fs.starts_with("#version 100\n"));
    assert!(src.fs.contains("precision mediump float;\n"));
    assert!(src.fs.contains("#define FRAG_COLOR gl_FragColor\n"));
    assert!(src.fs.contains("#define UNIFORM_MEMBER uniform\n"));
    assert!(!src.fs.contains("lumen_FragColor;"));
}

#[test]
fn hlsl_11() {
    let src = generate(Language::Hlsl, Version(11, 0));

    assert!(src.vs.starts_with("#define SHADER_MODEL_5_0\n"));
    assert!(src.vs.contains("#define LUMEN_HLSL 1\n"));
    assert!(src.vs.contains("    vec3 a_Position : POSITION;\n"));
    assert!(src.vs.contains("    vec2 v_uv : TEXCOORD0;\n"));
    assert!(src.vs.contains("VS_OUTPUT main(VS_INPUT lumen_input) {\n"));
    assert!(src.fs.contains("Texture2D u_texture : register(t0);\n"));
    assert!(src.fs.contains("SamplerState u_texture_sampler : register(s0);\n"));
    assert!(src.fs.contains("vec4 main(PS_INPUT lumen_input) : SV_TARGET {\n"));
}

#[test]
fn deterministic() {
    for &(language, version) in &[
        (Language::Glsl, Version(4, 3)),
        (Language::GlslEs, Version(3, 0)),
        (Language::Hlsl, Version(10, 0)),
    ] {
        assert_eq!(generate(language, version), generate(language, version));
    }
}

#[test]
fn unused_slots() {
    let src = generate(Language::Glsl, Version(4, 5));
    assert_eq!(src.unused, vec!["a_Color0".to_owned()]);
}

struct Heightmap(ShaderLayout);

impl ShaderProgram for Heightmap {
    fn layout(&self) -> &ShaderLayout {
        &self.0
    }

    fn vs_main(&self, stage: &mut VertexStage) -> Result<VertexOutput> {
        let uv = stage.attribute(Attribute::Texcoord0)?;
        let height = stage.uniform("u_height")?;
        Ok(VertexOutput::new(ops::sample(&height, &uv)?))
    }

    fn ps_main(&self, stage: &mut PixelStage) -> Result<PixelOutput> {
        Ok(PixelOutput::new(stage.uniform("u_color")?))
    }
}

#[test]
fn vertex_sampling() {
    let layout = ShaderLayout::build()
        .with_attribute(Attribute::Texcoord0, DataType::Vec2)
        .with_uniform("u_height", DataType::Sampler2D)
        .with_uniform("u_color", DataType::Vec4)
        .finish()
        .unwrap();
    let program = Heightmap(layout);

    let dialect = Dialect::resolve(Language::Hlsl, Version(11, 0)).unwrap();
    let src = Generator::new(dialect).generate(&program).unwrap();
    assert!(src
        .vs
        .contains("#define SAMPLE_TEXTURE(s, uv) s.SampleLevel(s##_sampler, uv, 0)\n"));
    assert!(src
        .vs
        .contains("    lumen_output.lumen_Position = SAMPLE_TEXTURE(u_height, a_Texcoord0);\n"));
    assert!(src
        .fs
        .contains("#define SAMPLE_TEXTURE(s, uv) s.Sample(s##_sampler, uv)\n"));

    let dialect = Dialect::resolve(Language::Glsl, Version(3, 3)).unwrap();
    let src = Generator::new(dialect).generate(&program).unwrap();
    assert!(src.vs.contains("    gl_Position = SAMPLE_TEXTURE(u_height, a_Texcoord0);\n"));
}

struct Broken(ShaderLayout, &'static str);

impl ShaderProgram for Broken {
    fn layout(&self) -> &ShaderLayout {
        &self.0
    }

    fn vs_main(&self, stage: &mut VertexStage) -> Result<VertexOutput> {
        let position = stage.attribute(Attribute::Position)?;
        let clip = Vec4::from_vec3_scalar(&position, &Float::lit(1.0)?)?;

        Ok(match self.1 {
            "position" => VertexOutput::new(position),
            "missing" => VertexOutput::new(clip),
            "twice" => VertexOutput::new(clip.clone())
                .with_varying("v_a", Float::lit(0.0)?)
                .with_varying("v_a", Float::lit(1.0)?),
            "undeclared" => VertexOutput::new(clip)
                .with_varying("v_a", Float::lit(0.0)?)
                .with_varying("v_b", Float::lit(0.0)?),
            _ => VertexOutput::new(clip).with_varying("v_a", Float::lit(0.0)?),
        })
    }

    fn ps_main(&self, stage: &mut PixelStage) -> Result<PixelOutput> {
        let a = stage.varying("v_a")?;
        match self.1 {
            "color" => Ok(PixelOutput::new(a)),
            _ => Ok(PixelOutput::new(Vec4::splat(&a)?)),
        }
    }
}

fn broken(case: &'static str) -> ShaderError {
    let layout = ShaderLayout::build()
        .with_attribute(Attribute::Position, DataType::Vec3)
        .with_varying("v_a", DataType::Float)
        .finish()
        .unwrap();

    let dialect = Dialect::resolve(Language::Glsl, Version(3, 3)).unwrap();
    match Generator::new(dialect).generate(&Broken(layout, case)) {
        Ok(_) => panic!("{} should fail", case),
        Err(err) => err,
    }
}

#[test]
fn output_errors() {
    assert_eq!(
        broken("position"),
        ShaderError::OutputTypeMismatch {
            slot: "position".into(),
            expected: DataType::Vec4,
            found: DataType::Vec3,
        }
    );

    assert_eq!(broken("missing"), ShaderError::VaryingNotWritten("v_a".into()));
    assert_eq!(broken("twice"), ShaderError::VaryingWrittenTwice("v_a".into()));
    assert_eq!(broken("undeclared"), ShaderError::UndeclaredVarying("v_b".into()));
    assert_eq!(
        broken("color"),
        ShaderError::OutputTypeMismatch {
            slot: "color".into(),
            expected: DataType::Vec4,
            found: DataType::Float,
        }
    );
}

#[test]
fn layout_errors() {
    let dup = ShaderLayout::build()
        .with_varying("v_a", DataType::Float)
        .with_uniform("v_a", DataType::Vec4)
        .finish();
    assert_eq!(dup, Err(ShaderError::DuplicatedSlot("v_a".into())));

    let reserved = ShaderLayout::build().with_uniform("gl_Color", DataType::Vec4).finish();
    assert_eq!(reserved, Err(ShaderError::InvalidIdentifier("gl_Color".into())));

    for &name in &[
        "VARYING",
        "ATTRIBUTE",
        "MUL",
        "FRAG_COLOR",
        "UNIFORM_MEMBER",
        "float",
        "vec4",
        "in",
        "texture",
        "float4",
    ] {
        let uniform = ShaderLayout::build().with_uniform(name, DataType::Vec4).finish();
        assert_eq!(uniform, Err(ShaderError::InvalidIdentifier(name.into())));

        let varying = ShaderLayout::build().with_varying(name, DataType::Vec2).finish();
        assert_eq!(varying, Err(ShaderError::InvalidIdentifier(name.into())));
    }

    let matrix = ShaderLayout::build().with_varying("v_m", DataType::Mat4).finish();
    assert_eq!(
        matrix,
        Err(ShaderError::InvalidSlotType("v_m".into(), DataType::Mat4))
    );

    let layout = ShaderLayout::build().finish().unwrap();
    let dialect = Dialect::resolve(Language::Glsl, Version(3, 3)).unwrap();
    let err = Generator::new(dialect).generate(&Broken(layout, "")).err();
    assert_eq!(err, Some(ShaderError::UndeclaredAttribute(Attribute::Position)));
}
