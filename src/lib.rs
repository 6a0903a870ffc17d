//! A small, portable rendering core with a typed shader generator.
//!
//! Shader programs are written once in Rust against typed expression
//! builders, then emitted as GLSL, GLSL ES or HLSL depending on the dialect
//! of the render context that compiles them:
//!
//! ```rust,ignore
//! use lumen::prelude::*;
//!
//! let mut ctx = RenderContext::headless()?;
//! let shader = ctx.create_shader(&MyProgram::new()?)?;
//! ```
//!
//! The crate is split into a few subsystems: `shader` builds and emits
//! programs, `video` owns the render context and its GPU objects, `window`
//! and `assets` are the narrow collaborators around it, and `application`
//! ties everything into a frame loop.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod errors;
#[macro_use]
pub mod utils;
pub mod math;

pub mod shader;
pub mod video;

pub mod assets;
pub mod window;

pub mod application;
pub mod prelude;
