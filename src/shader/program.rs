//! Authored shader programs: declared slots, stage scopes and stage outputs.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::errors::{Error, Result};
use super::variable::{DataType, Variable};

/// The possible pre-defined and named attributes in the vertex component, describing
/// what the vertex component is used for.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Attribute {
    Position = 0,
    Normal = 1,
    Tangent = 2,
    Bitangent = 3,
    Color0 = 4,
    Color1 = 5,
    Indices = 6,
    Weight = 7,
    Texcoord0 = 8,
    Texcoord1 = 9,
    Texcoord2 = 10,
    Texcoord3 = 11,
}

impl Attribute {
    pub const ALL: [Attribute; 12] = [
        Attribute::Position,
        Attribute::Normal,
        Attribute::Tangent,
        Attribute::Bitangent,
        Attribute::Color0,
        Attribute::Color1,
        Attribute::Indices,
        Attribute::Weight,
        Attribute::Texcoord0,
        Attribute::Texcoord1,
        Attribute::Texcoord2,
        Attribute::Texcoord3,
    ];

    /// The fixed input location bound to this attribute on every backend.
    #[inline]
    pub fn location(self) -> u32 {
        self as u32
    }

    /// The identifier used in generated source, e.g. `a_Position`.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Position => "a_Position",
            Attribute::Normal => "a_Normal",
            Attribute::Tangent => "a_Tangent",
            Attribute::Bitangent => "a_Bitangent",
            Attribute::Color0 => "a_Color0",
            Attribute::Color1 => "a_Color1",
            Attribute::Indices => "a_Indices",
            Attribute::Weight => "a_Weight",
            Attribute::Texcoord0 => "a_Texcoord0",
            Attribute::Texcoord1 => "a_Texcoord1",
            Attribute::Texcoord2 => "a_Texcoord2",
            Attribute::Texcoord3 => "a_Texcoord3",
        }
    }

    /// The HLSL input semantic.
    pub fn semantic(self) -> &'static str {
        match self {
            Attribute::Position => "POSITION",
            Attribute::Normal => "NORMAL",
            Attribute::Tangent => "TANGENT",
            Attribute::Bitangent => "BINORMAL",
            Attribute::Color0 => "COLOR0",
            Attribute::Color1 => "COLOR1",
            Attribute::Indices => "BLENDINDICES",
            Attribute::Weight => "BLENDWEIGHT",
            Attribute::Texcoord0 => "TEXCOORD0",
            Attribute::Texcoord1 => "TEXCOORD1",
            Attribute::Texcoord2 => "TEXCOORD2",
            Attribute::Texcoord3 => "TEXCOORD3",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Skips the `a_` prefix.
        f.write_str(&self.name()[2..])
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Attribute::ALL
            .iter()
            .find(|v| &v.name()[2..] == s)
            .cloned()
            .ok_or_else(|| Error::InvalidIdentifier(s.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSlot {
    pub attribute: Attribute,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSlot {
    pub name: String,
    pub data_type: DataType,
}

/// The immutable set of attribute, varying and uniform slots of a shader program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderLayout {
    attributes: SmallVec<[AttributeSlot; 12]>,
    varyings: Vec<NamedSlot>,
    uniforms: Vec<NamedSlot>,
}

impl ShaderLayout {
    pub fn build() -> ShaderLayoutBuilder {
        ShaderLayoutBuilder::new()
    }

    #[inline]
    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    /// Varyings in declaration order.
    #[inline]
    pub fn varyings(&self) -> &[NamedSlot] {
        &self.varyings
    }

    #[inline]
    pub fn uniforms(&self) -> &[NamedSlot] {
        &self.uniforms
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<DataType> {
        self.attributes
            .iter()
            .find(|v| v.attribute == attribute)
            .map(|v| v.data_type)
    }

    pub fn varying(&self, name: &str) -> Option<DataType> {
        find(&self.varyings, name)
    }

    pub fn uniform(&self, name: &str) -> Option<DataType> {
        find(&self.uniforms, name)
    }

    /// Uniforms living inside the uniform block, i.e. everything but samplers.
    pub fn block_uniforms<'a>(&'a self) -> impl Iterator<Item = &'a NamedSlot> + 'a {
        self.uniforms
            .iter()
            .filter(|v| v.data_type != DataType::Sampler2D)
    }

    /// Sampler uniforms in declaration order. The position is the texture unit.
    pub fn samplers<'a>(&'a self) -> impl Iterator<Item = &'a NamedSlot> + 'a {
        self.uniforms
            .iter()
            .filter(|v| v.data_type == DataType::Sampler2D)
    }
}

fn find(slots: &[NamedSlot], name: &str) -> Option<DataType> {
    slots.iter().find(|v| v.name == name).map(|v| v.data_type)
}

const RESERVED_PREFIXES: [&str; 5] = ["gl_", "lumen_", "a_", "LUMEN_", "SHADER_MODEL_"];

/// Names the generator emits itself: the block and stage structs plus every
/// preamble macro of any dialect.
const GENERATED_NAMES: [&str; 15] = [
    "Globals",
    "main",
    "VS_INPUT",
    "VS_OUTPUT",
    "PS_INPUT",
    "VARYING",
    "ATTRIBUTE",
    "FRAG_COLOR",
    "UNIFORM_BUFFER_BEGIN",
    "UNIFORM_BUFFER_END",
    "UNIFORM_MEMBER",
    "MUL",
    "SAMPLE_TEXTURE",
    "mix",
    "lerp",
];

/// Keywords, builtin types and builtin functions of GLSL, GLSL ES and HLSL.
const KEYWORDS: &[&str] = &[
    // Shared
    "attribute", "break", "case", "const", "continue", "default", "discard", "do", "else",
    "false", "for", "if", "in", "inout", "out", "return", "struct", "switch", "true",
    "uniform", "varying", "void", "while", "centroid", "flat", "invariant", "layout",
    "precision", "highp", "mediump", "lowp", "smooth", "noperspective", "sample", "patch",
    "buffer", "shared", "coherent", "volatile", "restrict", "readonly", "writeonly",
    "subroutine", "packed", "asm", "class", "union", "enum", "typedef", "template", "this",
    "goto", "inline", "noinline", "public", "static", "extern", "external", "interface",
    "long", "short", "half", "fixed", "unsigned", "superp", "input", "output", "sizeof",
    "cast", "namespace", "using", "filter", "common", "partition", "active",
    // GLSL types
    "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "ivec2", "ivec3",
    "ivec4", "uvec2", "uvec3", "uvec4", "bvec2", "bvec3", "bvec4", "dvec2", "dvec3",
    "dvec4", "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3",
    "mat3x4", "mat4x2", "mat4x3", "mat4x4", "sampler1D", "sampler2D", "sampler3D",
    "samplerCube", "sampler2DShadow", "sampler2DArray", "isampler2D", "usampler2D",
    // HLSL types
    "float2", "float3", "float4", "float2x2", "float3x3", "float4x4", "int2", "int3",
    "int4", "uint2", "uint3", "uint4", "bool2", "bool3", "bool4", "half2", "half3",
    "half4", "double2", "double3", "double4", "matrix", "vector", "dword", "string",
    "Texture1D", "Texture2D", "Texture3D", "TextureCube", "Texture2DArray", "SamplerState",
    "SamplerComparisonState", "sampler", "texture", "cbuffer", "tbuffer", "register",
    "packoffset", "row_major", "column_major", "nointerpolation", "linear", "groupshared",
    "snorm", "unorm", "technique", "pass", "compile", "vertexshader",
    "pixelshader", "stateblock",
    // Builtin functions
    "abs", "acos", "asin", "atan", "atan2", "ceil", "clamp", "cos", "cross", "ddx", "ddy",
    "degrees", "determinant", "distance", "dot", "dFdx", "dFdy", "exp", "exp2", "faceforward",
    "floor", "fmod", "fract", "frac", "fwidth", "inversesqrt", "rsqrt", "length", "log",
    "log2", "max", "min", "mod", "mul", "normalize", "pow", "radians", "reflect", "refract",
    "round", "saturate", "sign", "sin", "smoothstep", "sqrt", "step", "tan", "transpose",
    "texture2D", "textureLod", "texture2DLod", "tex2D", "tex2Dlod",
];

fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    let tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let reserved = RESERVED_PREFIXES.iter().any(|v| name.starts_with(v))
        || GENERATED_NAMES.contains(&name)
        || KEYWORDS.contains(&name)
        || name.contains("__");

    if head && tail && !reserved {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.into()))
    }
}

fn validate_interpolated(name: &str, data_type: DataType) -> Result<()> {
    match data_type {
        DataType::Float | DataType::Vec2 | DataType::Vec3 | DataType::Vec4 => Ok(()),
        _ => Err(Error::InvalidSlotType(name.into(), data_type)),
    }
}

#[derive(Default)]
pub struct ShaderLayoutBuilder(ShaderLayout);

impl ShaderLayoutBuilder {
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn with_attribute(mut self, attribute: Attribute, data_type: DataType) -> Self {
        self.0.attributes.push(AttributeSlot {
            attribute,
            data_type,
        });
        self
    }

    #[inline]
    pub fn with_varying<T: Into<String>>(mut self, name: T, data_type: DataType) -> Self {
        self.0.varyings.push(NamedSlot {
            name: name.into(),
            data_type,
        });
        self
    }

    #[inline]
    pub fn with_uniform<T: Into<String>>(mut self, name: T, data_type: DataType) -> Self {
        self.0.uniforms.push(NamedSlot {
            name: name.into(),
            data_type,
        });
        self
    }

    /// Validates every slot and freezes the layout.
    pub fn finish(self) -> Result<ShaderLayout> {
        let layout = self.0;

        for (i, v) in layout.attributes.iter().enumerate() {
            validate_interpolated(v.attribute.name(), v.data_type)?;
            if layout.attributes[..i].iter().any(|w| w.attribute == v.attribute) {
                return Err(Error::DuplicatedSlot(v.attribute.name().into()));
            }
        }

        let names: Vec<&NamedSlot> = layout.varyings.iter().chain(&layout.uniforms).collect();
        for (i, v) in names.iter().enumerate() {
            validate_identifier(&v.name)?;
            if names[..i].iter().any(|w| w.name == v.name) {
                return Err(Error::DuplicatedSlot(v.name.clone()));
            }
        }

        for v in &layout.varyings {
            validate_interpolated(&v.name, v.data_type)?;
        }

        Ok(layout)
    }
}

const TEMPORARY_PREFIX: &str = "lumen_t";

/// State shared by both stages: uniforms and hoisted temporaries.
#[derive(Debug)]
pub(crate) struct Scope {
    pub(crate) uniforms: Vec<(String, Variable)>,
    pub(crate) temporaries: Vec<(String, Variable)>,
}

impl Scope {
    fn new(layout: &ShaderLayout) -> Self {
        let uniforms = layout
            .uniforms
            .iter()
            .map(|v| (v.name.clone(), Variable::new(v.name.as_str(), v.data_type)))
            .collect();

        Scope {
            uniforms,
            temporaries: Vec::new(),
        }
    }

    fn uniform(&self, name: &str) -> Result<Variable> {
        lookup(&self.uniforms, name).ok_or_else(|| Error::UndeclaredUniform(name.into()))
    }

    fn bind(&mut self, v: &Variable) -> Result<Variable> {
        if !v.data_type().is_numeric() {
            return Err(Error::TypeMismatch {
                constructor: "bind",
                expected: "numeric value".into(),
                found: v.data_type().name().into(),
            });
        }

        let name = format!("{}{}", TEMPORARY_PREFIX, self.temporaries.len());
        v.set_used();
        self.temporaries.push((name.clone(), v.clone()));
        Ok(Variable::new(name, v.data_type()))
    }
}

fn lookup(slots: &[(String, Variable)], name: &str) -> Option<Variable> {
    slots
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
}

/// The scope `ShaderProgram::vs_main` runs in.
#[derive(Debug)]
pub struct VertexStage {
    pub(crate) attributes: Vec<(Attribute, Variable)>,
    pub(crate) scope: Scope,
}

impl VertexStage {
    pub(crate) fn new(layout: &ShaderLayout) -> Self {
        let attributes = layout
            .attributes
            .iter()
            .map(|v| (v.attribute, Variable::new(v.attribute.name(), v.data_type)))
            .collect();

        VertexStage {
            attributes,
            scope: Scope::new(layout),
        }
    }

    /// The per-vertex input bound to `attribute`.
    pub fn attribute(&self, attribute: Attribute) -> Result<Variable> {
        self.attributes
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| Error::UndeclaredAttribute(attribute))
    }

    pub fn uniform(&self, name: &str) -> Result<Variable> {
        self.scope.uniform(name)
    }

    /// Hoists `v` into a local of the entry point and returns the local.
    pub fn bind(&mut self, v: &Variable) -> Result<Variable> {
        self.scope.bind(v)
    }
}

/// The scope `ShaderProgram::ps_main` runs in.
#[derive(Debug)]
pub struct PixelStage {
    pub(crate) varyings: Vec<(String, Variable)>,
    pub(crate) scope: Scope,
}

impl PixelStage {
    pub(crate) fn new(layout: &ShaderLayout) -> Self {
        let varyings = layout
            .varyings
            .iter()
            .map(|v| (v.name.clone(), Variable::new(v.name.as_str(), v.data_type)))
            .collect();

        PixelStage {
            varyings,
            scope: Scope::new(layout),
        }
    }

    /// The interpolated value of a varying written by the vertex stage.
    pub fn varying(&self, name: &str) -> Result<Variable> {
        lookup(&self.varyings, name).ok_or_else(|| Error::UndeclaredVarying(name.into()))
    }

    pub fn uniform(&self, name: &str) -> Result<Variable> {
        self.scope.uniform(name)
    }

    /// Hoists `v` into a local of the entry point and returns the local.
    pub fn bind(&mut self, v: &Variable) -> Result<Variable> {
        self.scope.bind(v)
    }
}

/// What the vertex stage writes: clip-space position and varyings.
#[derive(Debug, Clone)]
pub struct VertexOutput {
    pub(crate) position: Variable,
    pub(crate) varyings: Vec<(String, Variable)>,
}

impl VertexOutput {
    pub fn new(position: Variable) -> Self {
        VertexOutput {
            position,
            varyings: Vec::new(),
        }
    }

    pub fn with_varying<T: Into<String>>(mut self, name: T, value: Variable) -> Self {
        self.varyings.push((name.into(), value));
        self
    }
}

/// What the pixel stage writes.
#[derive(Debug, Clone)]
pub struct PixelOutput {
    pub(crate) color: Variable,
}

impl PixelOutput {
    pub fn new(color: Variable) -> Self {
        PixelOutput { color }
    }
}

/// A user-authored shader. The generator runs both entry points against fresh
/// stages every time it emits source, so implementations must not depend on
/// state mutated between calls.
pub trait ShaderProgram {
    fn layout(&self) -> &ShaderLayout;
    fn vs_main(&self, stage: &mut VertexStage) -> Result<VertexOutput>;
    fn ps_main(&self, stage: &mut PixelStage) -> Result<PixelOutput>;
}
