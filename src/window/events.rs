use crate::math::prelude::Vector2;

/// The window events a `Window` reports through `poll_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The window has been closed. A closed window stays closed.
    Closed,
    /// The size of the client area has changed, in pixels.
    Resized(Vector2<u32>),
    /// The position of window has changed.
    Moved(Vector2<i32>),
    /// The window gained or lost focus of user input.
    Focused(bool),
}
