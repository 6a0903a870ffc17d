use crate::math::prelude::Vector2;

use super::super::events::Event;
use super::super::WindowParams;
use super::{Surface, Visitor};

/// A window that only exists in memory. Geometry changes are reported as
/// events on the next poll, like a native window would.
pub struct HeadlessVisitor {
    position: Vector2<i32>,
    dimensions: Vector2<u32>,
    visible: bool,
    pending: Vec<Event>,
}

impl HeadlessVisitor {
    pub fn new(params: &WindowParams) -> Self {
        HeadlessVisitor {
            position: Vector2::new(0, 0),
            dimensions: params.size,
            visible: params.visible,
            pending: Vec::new(),
        }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn show(&mut self) {
        self.visible = true;
    }

    #[inline]
    fn hide(&mut self) {
        self.visible = false;
    }

    #[inline]
    fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    fn position(&self) -> Vector2<i32> {
        self.position
    }

    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    #[inline]
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    fn set_position(&mut self, position: Vector2<i32>) {
        if self.position != position {
            self.position = position;
            self.pending.push(Event::Moved(position));
        }
    }

    fn set_size(&mut self, size: Vector2<u32>) {
        if self.dimensions != size {
            self.dimensions = size;
            self.pending.push(Event::Resized(size));
        }
    }

    #[inline]
    fn poll_events(&mut self, events: &mut Vec<Event>) {
        events.extend(self.pending.drain(..));
    }

    #[inline]
    fn surface(&self) -> Surface {
        Surface::Headless
    }
}
