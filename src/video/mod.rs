//! The render context and the GPU objects it owns.
//!
//! A `RenderContext` wraps one native graphics context (OpenGL, Direct3D 11 or
//! a headless device) together with the shader dialect it understands. Every
//! GPU-touching call goes through the context, and only succeeds while the
//! context is current on the calling thread:
//!
//! ```rust,ignore
//! let mut ctx = RenderContext::headless()?;
//! assert!(ctx.is_current());
//!
//! ctx.set_clear_color(Color::black());
//! ctx.clear(ClearMask::COLOR | ClearMask::DEPTH)?;
//! ctx.swap_buffers()?;
//! ```
//!
//! Resources are addressed by generational handles. Deleting a resource
//! invalidates its handle, later uses report `HandleInvalid` errors instead of
//! touching freed native objects.

pub mod backends;
pub mod context;
pub mod current;
pub mod errors;
pub mod resources;

pub mod prelude {
    pub use super::context::{FrameInfo, RenderContext};
    pub use super::current::{current, ContextId};
    pub use super::errors::Error as VideoError;
    pub use super::resources::*;
    pub use super::{Api, ClearMask, ContextParams};
}

use crate::math::prelude::Color;

/// The native graphics API behind a render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Api {
    OpenGL,
    Direct3D11,
    /// No native device, useful for tests and tools.
    Headless,
}

impl Api {
    /// Direct3D 11 on Windows, OpenGL everywhere else.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Api::Direct3D11
        } else {
            Api::OpenGL
        }
    }

    /// Returns true if this build has a backend for the api.
    pub fn is_available(self) -> bool {
        match self {
            Api::Headless => true,
            Api::OpenGL => cfg!(not(target_arch = "wasm32")),
            Api::Direct3D11 => cfg!(windows),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// The api to use, `None` picks `Api::platform_default`.
    pub api: Option<Api>,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    pub clear_color: Color,
}

impl Default for ContextParams {
    fn default() -> Self {
        ContextParams {
            api: None,
            vsync: false,
            multisample: 0,
            clear_color: Color::black(),
        }
    }
}

impl ContextParams {
    #[inline]
    pub fn api(&self) -> Api {
        self.api.unwrap_or_else(Api::platform_default)
    }
}

bitflags::bitflags! {
    /// The buffers a `clear` resets.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ClearMask: u8 {
        const COLOR = 0x1;
        const DEPTH = 0x2;
        const STENCIL = 0x4;
    }
}
