//! Represents the window or environment a render context draws into.
//!
//! The window is a narrow collaborator: it reports geometry and a small set of
//! events, and hands its native surface to `RenderContext::new`.

pub mod events;

mod backends;

pub mod prelude {
    pub use super::events::Event;
    pub use super::{Window, WindowParams};
}

pub(crate) use self::backends::Surface;

use crate::errors::*;
use crate::math::prelude::Vector2;
use crate::video::{Api, ContextParams};

use self::backends::Visitor;
use self::events::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: Vector2<u32>,
    /// Whether the window is visible right after creation.
    pub visible: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Window".to_owned(),
            size: Vector2::new(640, 320),
            visible: true,
        }
    }
}

pub struct Window {
    visitor: Box<dyn Visitor>,
    open: bool,
}

impl Window {
    /// Creates a native window whose surface suits the api of `context`.
    pub fn new(params: WindowParams, context: &ContextParams) -> Result<Self> {
        let api = context.api();
        info!("Creating window {:?} for {:?}.", params.title, api);

        let visitor: Box<dyn Visitor> = match api {
            Api::Headless => Box::new(backends::headless::HeadlessVisitor::new(&params)),

            #[cfg(not(target_arch = "wasm32"))]
            Api::OpenGL => Box::new(backends::glutin::GlutinVisitor::gl(&params, context)?),

            #[cfg(windows)]
            Api::Direct3D11 => Box::new(backends::glutin::GlutinVisitor::native(&params)?),

            #[allow(unreachable_patterns)]
            _ => bail!("{:?} is not available on this platform.", api),
        };

        Ok(Window {
            visitor,
            open: true,
        })
    }

    /// Creates a window that only exists in memory.
    pub fn headless(params: WindowParams) -> Self {
        Window {
            visitor: Box::new(backends::headless::HeadlessVisitor::new(&params)),
            open: true,
        }
    }

    /// Returns true until the window has been closed.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Shows the window if it was hidden.
    #[inline]
    pub fn show(&mut self) {
        self.visitor.show();
    }

    /// Hides the window if it was visible.
    #[inline]
    pub fn hide(&mut self) {
        self.visitor.hide();
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visitor.is_visible()
    }

    /// Returns the position of the top-left hand corner of the window relative
    /// to the top-left hand corner of the desktop.
    #[inline]
    pub fn position(&self) -> Vector2<i32> {
        self.visitor.position()
    }

    #[inline]
    pub fn set_position(&mut self, position: Vector2<i32>) {
        self.visitor.set_position(position);
    }

    /// Returns the size in *pixels* of the client area of the window, which is
    /// the size of the back buffer.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.visitor.dimensions()
    }

    /// Sets the size in *points* of the client area of the window.
    #[inline]
    pub fn set_size(&mut self, size: Vector2<u32>) {
        self.visitor.set_size(size);
    }

    /// Returns the ratio between the backing framebuffer resolution and the
    /// window size in screen pixels.
    #[inline]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.visitor.device_pixel_ratio()
    }

    /// Appends the events since the last poll. A `Closed` event closes the
    /// window.
    pub fn poll_events(&mut self, events: &mut Vec<Event>) {
        let from = events.len();
        self.visitor.poll_events(events);

        if events[from..].iter().any(|v| *v == Event::Closed) {
            debug!("Window closed.");
            self.open = false;
        }
    }

    #[inline]
    pub(crate) fn surface(&self) -> Surface {
        self.visitor.surface()
    }
}
