//! A minimal frame loop around a window and its render context.
//!
//! `run` creates the window and the context from `Settings`, then repeats
//! poll events, `Application::on_update` and `swap_buffers` until the window
//! closes or the application asks to exit.

pub mod settings;
pub mod time;

pub mod prelude {
    pub use super::settings::Settings;
    pub use super::time::{FrameTimer, TimeParams};
    pub use super::{run, Application};
}

use std::time::Duration;

use crate::errors::*;
use crate::video::prelude::{Api, RenderContext};
use crate::window::prelude::{Event, Window};

use self::settings::Settings;
use self::time::FrameTimer;

/// `Application` defines the per-frame callbacks of the loop.
pub trait Application {
    /// Called once per frame between polling events and presenting. Returns
    /// `false` to leave the loop.
    fn on_update(&mut self, ctx: &mut RenderContext, dt: Duration) -> Result<bool>;

    /// Called for every window event, after the context handled it.
    fn on_event(&mut self, _: &Event) -> Result<()> {
        Ok(())
    }

    /// Called once after the loop ends, while the context is still alive.
    fn on_exit(&mut self, _: &mut RenderContext) -> Result<()> {
        Ok(())
    }
}

/// Runs the frame loop. `init` builds the application once the context is
/// current.
pub fn run<T, F>(settings: Settings, init: F) -> Result<()>
where
    T: Application,
    F: FnOnce(&mut RenderContext) -> Result<T>,
{
    let mut window = if settings.context.api() == Api::Headless {
        Window::headless(settings.window.clone())
    } else {
        Window::new(settings.window.clone(), &settings.context)?
    };

    let mut ctx = RenderContext::new(&window, settings.context)?;
    let mut app = init(&mut ctx)?;

    let mut timer = FrameTimer::new(settings.time);
    let mut events = Vec::new();
    let mut focused = true;
    let mut frames = 0u64;

    while window.is_open() {
        events.clear();
        window.poll_events(&mut events);

        for v in &events {
            match *v {
                Event::Resized(dimensions) => ctx.resize(dimensions)?,
                Event::Focused(v) => focused = v,
                _ => {}
            }

            app.on_event(v)?;
        }

        if !window.is_open() {
            break;
        }

        let dt = timer.advance(focused);
        if !app.on_update(&mut ctx, dt)? {
            break;
        }

        ctx.swap_buffers()?;
        frames += 1;
    }

    app.on_exit(&mut ctx)?;
    info!("Frame loop finished after {} frames.", frames);
    Ok(())
}
