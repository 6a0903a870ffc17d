//! A typed shader-authoring DSL and a generator that turns authored programs
//! into GLSL, GLSL ES or HLSL source.
//!
//! Programs are written once against dialect-neutral `Variable`s. Builders
//! check operand types as expressions are built, so an ill-typed expression is
//! an `Err` at the point it is written. The generator resolves every dialect
//! difference through a preamble of qualifier macros.
//!
//! ```rust,ignore
//! struct Tint(ShaderLayout);
//!
//! impl ShaderProgram for Tint {
//!     fn layout(&self) -> &ShaderLayout {
//!         &self.0
//!     }
//!
//!     fn vs_main(&self, stage: &mut VertexStage) -> Result<VertexOutput> {
//!         let position = stage.attribute(Attribute::Position)?;
//!         let mvp = stage.uniform("u_mvp")?;
//!         let clip = ops::mul(&mvp, &Vec4::from_vec3_scalar(&position, &Float::lit(1.0)?)?)?;
//!         Ok(VertexOutput::new(clip))
//!     }
//!
//!     fn ps_main(&self, stage: &mut PixelStage) -> Result<PixelOutput> {
//!         Ok(PixelOutput::new(stage.uniform("u_color")?))
//!     }
//! }
//! ```

pub mod builders;
pub mod dialect;
pub mod errors;
pub mod generator;
pub mod layout;
pub mod ops;
pub mod program;
pub mod variable;

pub mod prelude {
    pub use super::builders::{Float, Int, Mat4, Vec2, Vec3, Vec4};
    pub use super::dialect::{Dialect, Language, Stage, Version};
    pub use super::errors::Error as ShaderError;
    pub use super::generator::{Generator, ShaderSource};
    pub use super::layout::{Packing, UniformBlock, UniformValue};
    pub use super::ops;
    pub use super::program::{
        Attribute, PixelOutput, PixelStage, ShaderLayout, ShaderProgram, VertexOutput,
        VertexStage,
    };
    pub use super::variable::{DataType, Variable};
}
