//! Emits complete vertex and pixel stage source for a resolved dialect.

use super::dialect::{Dialect, Stage};
use super::errors::{Error, Result};
use super::program::{
    PixelOutput, PixelStage, ShaderLayout, ShaderProgram, VertexOutput, VertexStage,
};
use super::variable::{DataType, Variable};

/// Name of the block holding every non-sampler uniform.
pub const UNIFORM_BLOCK: &str = "Globals";

/// Source text of both stages of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vs: String,
    pub fs: String,
    /// Declared slots never consumed by either entry point.
    pub unused: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Generator {
    dialect: Dialect,
}

impl Generator {
    pub fn new(dialect: Dialect) -> Self {
        Generator { dialect }
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Runs both entry points against fresh stages and emits their source.
    /// Generation is pure: identical programs give byte-identical text.
    pub fn generate(&self, program: &dyn ShaderProgram) -> Result<ShaderSource> {
        let layout = program.layout();

        let mut vs = VertexStage::new(layout);
        let vo = program.vs_main(&mut vs)?;
        let varyings = validate_vertex_output(layout, &vo)?;

        let mut ps = PixelStage::new(layout);
        let po = program.ps_main(&mut ps)?;
        validate_pixel_output(&po)?;

        // Outputs are consumed by the stage itself.
        vo.position.set_used();
        po.color.set_used();
        for v in &varyings {
            v.set_used();
        }

        let unused = collect_unused(&vs, &ps);
        for name in &unused {
            warn!(
                "Shader slot `{}` is declared but never used by {}.",
                name, self.dialect
            );
        }

        Ok(ShaderSource {
            vs: self.emit_vertex(layout, &vs, &vo, &varyings),
            fs: self.emit_pixel(layout, &ps, &po),
            unused,
        })
    }

    fn preamble(&self, out: &mut Emitter, layout: &ShaderLayout, stage: Stage) {
        let d = &self.dialect;

        out.push(&d.header());
        out.line(format!("#define {} 1", d.marker()));
        if let Some(precision) = d.default_precision() {
            out.line(precision);
        }

        if d.is_hlsl() {
            out.line("#pragma pack_matrix(row_major)");
        }

        for v in d.macros(stage) {
            out.line(v.to_string());
        }

        out.blank();

        if layout.block_uniforms().next().is_some() {
            out.line(format!("UNIFORM_BUFFER_BEGIN({})", UNIFORM_BLOCK));
            for v in layout.block_uniforms() {
                out.line(format!("    UNIFORM_MEMBER {} {};", v.data_type, v.name));
            }
            out.line("UNIFORM_BUFFER_END");
        }

        for (unit, v) in layout.samplers().enumerate() {
            if d.is_hlsl() {
                out.line(format!("Texture2D {} : register(t{});", v.name, unit));
                out.line(format!(
                    "SamplerState {}_sampler : register(s{});",
                    v.name, unit
                ));
            } else {
                out.line(format!("uniform sampler2D {};", v.name));
            }
        }
    }

    fn interpolants(&self, out: &mut Emitter, name: &str, layout: &ShaderLayout) {
        out.line(format!("struct {} {{", name));
        out.line(format!("    {} lumen_Position : SV_POSITION;", DataType::Vec4));
        for (i, v) in layout.varyings().iter().enumerate() {
            out.line(format!("    {} {} : TEXCOORD{};", v.data_type, v.name, i));
        }
        out.line("};");
    }

    fn emit_vertex(
        &self,
        layout: &ShaderLayout,
        stage: &VertexStage,
        output: &VertexOutput,
        varyings: &[Variable],
    ) -> String {
        let mut out = Emitter::default();
        self.preamble(&mut out, layout, Stage::Vertex);

        if self.dialect.is_hlsl() {
            out.blank();
            out.line("struct VS_INPUT {");
            for v in layout.attributes() {
                out.line(format!(
                    "    {} {} : {};",
                    v.data_type,
                    v.attribute.name(),
                    v.attribute.semantic()
                ));
            }
            out.line("};");
            out.blank();
            self.interpolants(&mut out, "VS_OUTPUT", layout);
            out.blank();

            out.line("VS_OUTPUT main(VS_INPUT lumen_input) {");
            for v in layout.attributes() {
                let name = v.attribute.name();
                out.line(format!(
                    "    {} {} = lumen_input.{};",
                    v.data_type, name, name
                ));
            }
            temporaries(&mut out, &stage.scope.temporaries);
            out.line("    VS_OUTPUT lumen_output;");
            for (slot, v) in layout.varyings().iter().zip(varyings) {
                out.line(format!("    lumen_output.{} = {};", slot.name, v.value()));
            }
            out.line(format!(
                "    lumen_output.lumen_Position = {};",
                output.position.value()
            ));
            out.line("    return lumen_output;");
            out.line("}");
        } else {
            for v in layout.attributes() {
                out.line(format!("ATTRIBUTE {} {};", v.data_type, v.attribute.name()));
            }
            for v in layout.varyings() {
                out.line(format!("VARYING {} {};", v.data_type, v.name));
            }
            out.blank();

            out.line("void main() {");
            temporaries(&mut out, &stage.scope.temporaries);
            for (slot, v) in layout.varyings().iter().zip(varyings) {
                out.line(format!("    {} = {};", slot.name, v.value()));
            }
            out.line(format!("    gl_Position = {};", output.position.value()));
            out.line("}");
        }

        out.finish()
    }

    fn emit_pixel(&self, layout: &ShaderLayout, stage: &PixelStage, output: &PixelOutput) -> String {
        let mut out = Emitter::default();
        self.preamble(&mut out, layout, Stage::Pixel);

        if self.dialect.is_hlsl() {
            out.blank();
            self.interpolants(&mut out, "PS_INPUT", layout);
            out.blank();

            out.line("vec4 main(PS_INPUT lumen_input) : SV_TARGET {");
            for v in layout.varyings() {
                out.line(format!(
                    "    {} {} = lumen_input.{};",
                    v.data_type, v.name, v.name
                ));
            }
            temporaries(&mut out, &stage.scope.temporaries);
            out.line(format!("    return {};", output.color.value()));
            out.line("}");
        } else {
            for v in layout.varyings() {
                out.line(format!("VARYING {} {};", v.data_type, v.name));
            }
            if self.dialect.explicit_frag_output() {
                out.line(format!("out {} lumen_FragColor;", DataType::Vec4));
            }
            out.blank();

            out.line("void main() {");
            temporaries(&mut out, &stage.scope.temporaries);
            out.line(format!("    FRAG_COLOR = {};", output.color.value()));
            out.line("}");
        }

        out.finish()
    }
}

fn temporaries(out: &mut Emitter, temporaries: &[(String, Variable)]) {
    for (name, v) in temporaries {
        out.line(format!("    {} {} = {};", v.data_type(), name, v.value()));
    }
}

/// Checks the vertex outputs and returns the written varyings in declaration
/// order.
fn validate_vertex_output(layout: &ShaderLayout, output: &VertexOutput) -> Result<Vec<Variable>> {
    expect_type("position", DataType::Vec4, &output.position)?;

    for (i, (name, v)) in output.varyings.iter().enumerate() {
        let expected = layout
            .varying(name)
            .ok_or_else(|| Error::UndeclaredVarying(name.clone()))?;

        if output.varyings[..i].iter().any(|(n, _)| n == name) {
            return Err(Error::VaryingWrittenTwice(name.clone()));
        }

        expect_type(name, expected, v)?;
    }

    layout
        .varyings()
        .iter()
        .map(|slot| {
            output
                .varyings
                .iter()
                .find(|(n, _)| *n == slot.name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| Error::VaryingNotWritten(slot.name.clone()))
        })
        .collect()
}

fn validate_pixel_output(output: &PixelOutput) -> Result<()> {
    expect_type("color", DataType::Vec4, &output.color)
}

fn expect_type(slot: &str, expected: DataType, v: &Variable) -> Result<()> {
    if v.data_type() == expected {
        Ok(())
    } else {
        Err(Error::OutputTypeMismatch {
            slot: slot.into(),
            expected,
            found: v.data_type(),
        })
    }
}

fn collect_unused(vs: &VertexStage, ps: &PixelStage) -> Vec<String> {
    let mut unused = Vec::new();

    for (attribute, v) in &vs.attributes {
        if !v.is_used() {
            unused.push(attribute.name().to_owned());
        }
    }

    for (name, v) in &ps.varyings {
        if !v.is_used() {
            unused.push(name.clone());
        }
    }

    for ((name, a), (_, b)) in vs.scope.uniforms.iter().zip(&ps.scope.uniforms) {
        if !a.is_used() && !b.is_used() {
            unused.push(name.clone());
        }
    }

    unused
}

#[derive(Default)]
struct Emitter {
    buf: String,
}

impl Emitter {
    fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn line<T: AsRef<str>>(&mut self, text: T) {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn finish(self) -> String {
        self.buf
    }
}
