use std::rc::Rc;

use glutin;

use crate::errors::*;
use crate::math::prelude::Vector2;
use crate::video::ContextParams;

use super::super::super::events::Event;
use super::super::super::WindowParams;
use super::super::{Surface, Visitor};

enum Native {
    GL(Rc<glutin::GlWindow>),
    #[cfg(windows)]
    Window(Rc<glutin::Window>),
}

pub struct GlutinVisitor {
    native: Native,
    visible: bool,
    events_loop: glutin::EventsLoop,
}

fn builder(params: &WindowParams) -> glutin::WindowBuilder {
    glutin::WindowBuilder::new()
        .with_title(params.title.clone())
        .with_dimensions(glutin::dpi::LogicalSize::new(
            f64::from(params.size.x),
            f64::from(params.size.y),
        ))
        .with_visibility(params.visible)
}

impl GlutinVisitor {
    /// Creates a window with an OpenGL context attached.
    pub fn gl(params: &WindowParams, context: &ContextParams) -> Result<Self> {
        let events_loop = glutin::EventsLoop::new();

        let ctx = glutin::ContextBuilder::new()
            .with_multisampling(context.multisample)
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl(glutin::GlRequest::Latest)
            .with_vsync(context.vsync);

        let window = glutin::GlWindow::new(builder(params), ctx, &events_loop)?;
        Ok(GlutinVisitor {
            native: Native::GL(Rc::new(window)),
            visible: params.visible,
            events_loop,
        })
    }

    /// Creates a window without any graphics context.
    #[cfg(windows)]
    pub fn native(params: &WindowParams) -> Result<Self> {
        let events_loop = glutin::EventsLoop::new();
        let window = builder(params).build(&events_loop)?;

        Ok(GlutinVisitor {
            native: Native::Window(Rc::new(window)),
            visible: params.visible,
            events_loop,
        })
    }

    fn window(&self) -> &glutin::Window {
        match self.native {
            Native::GL(ref v) => v.window(),
            #[cfg(windows)]
            Native::Window(ref v) => v,
        }
    }
}

impl Visitor for GlutinVisitor {
    #[inline]
    fn show(&mut self) {
        self.window().show();
        self.visible = true;
    }

    #[inline]
    fn hide(&mut self) {
        self.window().hide();
        self.visible = false;
    }

    #[inline]
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn position(&self) -> Vector2<i32> {
        self.window()
            .get_position()
            .map(|v| Vector2::new(v.x as i32, v.y as i32))
            .unwrap_or_else(|| Vector2::new(0, 0))
    }

    fn dimensions(&self) -> Vector2<u32> {
        let window = self.window();
        let dpi = window.get_hidpi_factor();
        window
            .get_inner_size()
            .map(|v| v.to_physical(dpi))
            .map(|v| Vector2::new(v.width as u32, v.height as u32))
            .unwrap_or_else(|| Vector2::new(0, 0))
    }

    #[inline]
    fn device_pixel_ratio(&self) -> f32 {
        self.window().get_hidpi_factor() as f32
    }

    fn set_position(&mut self, position: Vector2<i32>) {
        let position = glutin::dpi::LogicalPosition::new(f64::from(position.x), f64::from(position.y));
        self.window().set_position(position);
    }

    fn set_size(&mut self, size: Vector2<u32>) {
        let size = glutin::dpi::LogicalSize::new(f64::from(size.x), f64::from(size.y));
        self.window().set_inner_size(size);
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        let dpi = self.window().get_hidpi_factor();
        self.events_loop.poll_events(|v| {
            if let glutin::Event::WindowEvent { event, .. } = v {
                if let Some(e) = from_window_event(&event, dpi) {
                    events.push(e);
                }
            }
        });
    }

    fn surface(&self) -> Surface {
        match self.native {
            Native::GL(ref v) => Surface::GL(v.clone()),
            #[cfg(windows)]
            Native::Window(ref v) => Surface::Native(v.clone()),
        }
    }
}

fn from_window_event(source: &glutin::WindowEvent, dpi: f64) -> Option<Event> {
    match *source {
        glutin::WindowEvent::CloseRequested | glutin::WindowEvent::Destroyed => Some(Event::Closed),

        glutin::WindowEvent::Focused(v) => Some(Event::Focused(v)),

        glutin::WindowEvent::Resized(size) => {
            let size = size.to_physical(dpi);
            Some(Event::Resized(Vector2::new(size.width as u32, size.height as u32)))
        }

        glutin::WindowEvent::Moved(position) => Some(Event::Moved(Vector2::new(
            position.x as i32,
            position.y as i32,
        ))),

        _ => None,
    }
}
