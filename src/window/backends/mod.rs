pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod glutin;

#[cfg(not(target_arch = "wasm32"))]
use std::rc::Rc;

use crate::math::prelude::Vector2;

use super::events::Event;

pub trait Visitor {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    fn position(&self) -> Vector2<i32>;
    fn dimensions(&self) -> Vector2<u32>;
    fn device_pixel_ratio(&self) -> f32;
    fn set_position(&mut self, position: Vector2<i32>);
    fn set_size(&mut self, size: Vector2<u32>);
    fn poll_events(&mut self, events: &mut Vec<Event>);
    fn surface(&self) -> Surface;
}

/// The native object a render context draws into.
#[derive(Clone)]
pub enum Surface {
    Headless,
    /// A window with an OpenGL context attached.
    #[cfg(not(target_arch = "wasm32"))]
    GL(Rc<::glutin::GlWindow>),
    /// A bare window, the device creates its own swap chain.
    #[cfg(windows)]
    Native(Rc<::glutin::Window>),
}
