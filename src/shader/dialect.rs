//! Data-driven description of the shading languages the generator targets.
//!
//! A `Dialect` is resolved once from a `(Language, Version)` request by scanning
//! a static table from the newest entry to the oldest; the first entry whose
//! threshold is not above the requested version wins. Every feature gate and
//! qualifier macro is derived from the matched threshold, so the same request
//! always yields the same text.

use std::fmt;

use super::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Desktop GLSL.
    Glsl,
    /// Embedded GLSL (OpenGL ES / WebGL).
    GlslEs,
    /// Direct3D HLSL, versioned by feature level.
    Hlsl,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Language::Glsl => f.write_str("GLSL"),
            Language::GlslEs => f.write_str("GLSL ES"),
            Language::Hlsl => f.write_str("HLSL"),
        }
    }
}

/// A `major.minor` version. Ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u8, pub u8);

impl Version {
    #[inline]
    pub fn new(major: u8, minor: u8) -> Self {
        Version(major, minor)
    }

    #[inline]
    pub fn major(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn minor(self) -> u8 {
        self.1
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// The pipeline stage a piece of source is emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Pixel,
}

type Entry = (Version, &'static str);

const GLSL: [Entry; 13] = [
    (Version(4, 6), "460"),
    (Version(4, 5), "450"),
    (Version(4, 4), "440"),
    (Version(4, 3), "430"),
    (Version(4, 2), "420"),
    (Version(4, 1), "410"),
    (Version(4, 0), "400"),
    (Version(3, 3), "330"),
    (Version(3, 2), "150"),
    (Version(3, 1), "140"),
    (Version(3, 0), "130"),
    (Version(2, 1), "120"),
    (Version(2, 0), "110"),
];

const GLSL_ES: [Entry; 4] = [
    (Version(3, 2), "320 es"),
    (Version(3, 1), "310 es"),
    (Version(3, 0), "300 es"),
    (Version(2, 0), "100"),
];

const HLSL: [Entry; 5] = [
    (Version(11, 0), "5_0"),
    (Version(10, 1), "4_1"),
    (Version(10, 0), "4_0"),
    (Version(9, 3), "4_0_level_9_3"),
    (Version(9, 1), "4_0_level_9_1"),
];

/// A `#define` line of the preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// Name, including the parameter list of function-like macros.
    pub name: &'static str,
    pub body: String,
}

impl Macro {
    fn new<T: Into<String>>(name: &'static str, body: T) -> Self {
        Macro {
            name,
            body: body.into(),
        }
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "#define {}", self.name)
        } else {
            write!(f, "#define {} {}", self.name, self.body)
        }
    }
}

/// A resolved dialect: the language, the requested version and the table entry
/// it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    language: Language,
    requested: Version,
    threshold: Version,
    profile: &'static str,
}

impl Dialect {
    pub fn resolve(language: Language, version: Version) -> Result<Dialect> {
        let table: &[Entry] = match language {
            Language::Glsl => &GLSL,
            Language::GlslEs => &GLSL_ES,
            Language::Hlsl => &HLSL,
        };

        let &(threshold, profile) = table
            .iter()
            .find(|(since, _)| version >= *since)
            .ok_or_else(|| Error::UnsupportedDialect(language, version))?;

        Ok(Dialect {
            language,
            requested: version,
            threshold,
            profile,
        })
    }

    #[inline]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The version this dialect was resolved from.
    #[inline]
    pub fn version(&self) -> Version {
        self.requested
    }

    /// The table threshold the requested version matched.
    #[inline]
    pub fn threshold(&self) -> Version {
        self.threshold
    }

    /// The bare directive value, e.g. `430`, `300 es` or `5_0`.
    #[inline]
    pub fn profile(&self) -> &'static str {
        self.profile
    }

    /// The first line of every emitted stage.
    pub fn header(&self) -> String {
        match self.language {
            Language::Hlsl => format!("#define SHADER_MODEL_{}\n", self.profile),
            _ => format!("#version {}\n", self.profile),
        }
    }

    /// The HLSL compile target of `stage`, e.g. `vs_5_0`.
    pub fn target(&self, stage: Stage) -> String {
        match stage {
            Stage::Vertex => format!("vs_{}", self.profile),
            Stage::Pixel => format!("ps_{}", self.profile),
        }
    }

    #[inline]
    pub fn is_hlsl(&self) -> bool {
        self.language == Language::Hlsl
    }

    fn at_least(&self, glsl: Version, es: Version) -> bool {
        match self.language {
            Language::Glsl => self.threshold >= glsl,
            Language::GlslEs => self.threshold >= es,
            Language::Hlsl => true,
        }
    }

    pub fn uniform_buffers(&self) -> bool {
        self.at_least(Version(3, 1), Version(3, 0))
    }

    pub fn in_out_varyings(&self) -> bool {
        self.at_least(Version(3, 3), Version(3, 0))
    }

    pub fn explicit_frag_output(&self) -> bool {
        self.at_least(Version(3, 3), Version(3, 0))
    }

    /// The default float precision statement. Embedded dialects only.
    pub fn default_precision(&self) -> Option<&'static str> {
        match self.language {
            Language::GlslEs => Some("precision mediump float;"),
            _ => None,
        }
    }

    /// The 2D texture lookup builtin of GLSL dialects.
    pub fn texture_function(&self) -> &'static str {
        if self.at_least(Version(3, 0), Version(3, 0)) {
            "texture"
        } else {
            "texture2D"
        }
    }

    /// The marker macro identifying the dialect in emitted source.
    pub fn marker(&self) -> &'static str {
        match self.language {
            Language::Glsl => "LUMEN_GLSL",
            Language::GlslEs => "LUMEN_GLSL_ES",
            Language::Hlsl => "LUMEN_HLSL",
        }
    }

    /// The qualifier macros of `stage`, resolved once for this dialect.
    pub fn macros(&self, stage: Stage) -> Vec<Macro> {
        if self.is_hlsl() {
            return vec![
                Macro::new("UNIFORM_BUFFER_BEGIN(name)", "cbuffer name : register(b0) {"),
                Macro::new("UNIFORM_BUFFER_END", "};"),
                Macro::new("UNIFORM_MEMBER", ""),
                Macro::new("MUL(a, b)", "mul(b, a)"),
                Macro::new(
                    "SAMPLE_TEXTURE(s, uv)",
                    match stage {
                        // Implicit derivatives exist in the pixel stage only.
                        Stage::Vertex => "s.SampleLevel(s##_sampler, uv, 0)",
                        Stage::Pixel => "s.Sample(s##_sampler, uv)",
                    },
                ),
                Macro::new("vec2", "float2"),
                Macro::new("vec3", "float3"),
                Macro::new("vec4", "float4"),
                Macro::new("mat4", "float4x4"),
                Macro::new("mix", "lerp"),
            ];
        }

        let io = self.in_out_varyings();
        let mut macros = Vec::with_capacity(8);

        match stage {
            Stage::Vertex => {
                macros.push(Macro::new("VARYING", if io { "out" } else { "varying" }));
                macros.push(Macro::new("ATTRIBUTE", if io { "in" } else { "attribute" }));
            }
            Stage::Pixel => {
                macros.push(Macro::new("VARYING", if io { "in" } else { "varying" }));
                macros.push(Macro::new(
                    "FRAG_COLOR",
                    if self.explicit_frag_output() {
                        "lumen_FragColor"
                    } else {
                        "gl_FragColor"
                    },
                ));
            }
        }

        if self.uniform_buffers() {
            macros.push(Macro::new(
                "UNIFORM_BUFFER_BEGIN(name)",
                "layout(std140) uniform name {",
            ));
            macros.push(Macro::new("UNIFORM_BUFFER_END", "};"));
            macros.push(Macro::new("UNIFORM_MEMBER", ""));
        } else {
            macros.push(Macro::new("UNIFORM_BUFFER_BEGIN(name)", ""));
            macros.push(Macro::new("UNIFORM_BUFFER_END", ""));
            macros.push(Macro::new("UNIFORM_MEMBER", "uniform"));
        }

        macros.push(Macro::new("MUL(a, b)", "((a) * (b))"));
        macros.push(Macro::new(
            "SAMPLE_TEXTURE(s, uv)",
            format!("{}(s, uv)", self.texture_function()),
        ));

        macros
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.language, self.requested, self.profile)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_are_sorted() {
        for table in &[&GLSL[..], &GLSL_ES[..], &HLSL[..]] {
            for w in table.windows(2) {
                assert!(w[0].0 > w[1].0);
            }
        }
    }

    #[test]
    fn hlsl_sampling_per_stage() {
        let d = Dialect::resolve(Language::Hlsl, Version(11, 0)).unwrap();
        let sample = |stage| {
            d.macros(stage)
                .into_iter()
                .find(|v| v.name == "SAMPLE_TEXTURE(s, uv)")
                .map(|v| v.body)
                .unwrap()
        };

        assert_eq!(sample(Stage::Vertex), "s.SampleLevel(s##_sampler, uv, 0)");
        assert_eq!(sample(Stage::Pixel), "s.Sample(s##_sampler, uv)");
    }

    #[test]
    fn macro_lines() {
        assert_eq!(Macro::new("UNIFORM_MEMBER", "").to_string(), "#define UNIFORM_MEMBER");
        assert_eq!(Macro::new("VARYING", "out").to_string(), "#define VARYING out");
    }
}
