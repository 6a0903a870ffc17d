extern crate env_logger;
extern crate lumen;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use lumen::prelude::*;

#[test]
fn defaults() {
    let settings = Settings::from_json("{}").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.window.size, Vector2::new(640, 320));
    assert_eq!(settings.context.api, None);
    assert_eq!(settings.time.max_fps, 60);
}

#[test]
fn partial() {
    let text = r#"{
        "window": { "title": "Demo", "size": { "x": 800, "y": 600 } },
        "context": { "api": "Headless", "vsync": true },
        "time": { "max_fps": 30 }
    }"#;

    let settings = Settings::from_json(text).unwrap();
    assert_eq!(settings.window.title, "Demo");
    assert_eq!(settings.window.size, Vector2::new(800, 600));
    assert!(settings.window.visible);
    assert_eq!(settings.context.api(), Api::Headless);
    assert!(settings.context.vsync);
    assert_eq!(settings.time.max_fps, 30);
    assert_eq!(settings.time.min_fps, 0);
}

#[test]
fn malformed() {
    assert!(Settings::from_json("{ \"window\": 1 }").is_err());
    assert!(Settings::load("/definitely/missing/settings.json").is_err());
}

struct Counter {
    frames: Rc<Cell<u32>>,
    exited: Rc<Cell<bool>>,
}

impl Application for Counter {
    fn on_update(&mut self, ctx: &mut RenderContext, _: Duration) -> Result<bool> {
        ctx.clear(ClearMask::COLOR)?;
        self.frames.set(self.frames.get() + 1);
        Ok(self.frames.get() < 3)
    }

    fn on_exit(&mut self, ctx: &mut RenderContext) -> Result<()> {
        assert!(ctx.is_current());
        self.exited.set(true);
        Ok(())
    }
}

#[test]
fn headless_loop() {
    let _ = env_logger::try_init();

    let mut settings = Settings::default();
    settings.context.api = Some(Api::Headless);
    settings.time.max_fps = 0;

    let frames = Rc::new(Cell::new(0));
    let exited = Rc::new(Cell::new(false));
    let app = Counter {
        frames: frames.clone(),
        exited: exited.clone(),
    };

    run(settings, move |ctx| {
        assert_eq!(ctx.api(), Api::Headless);
        Ok(app)
    })
    .unwrap();

    assert_eq!(frames.get(), 3);
    assert!(exited.get());
    assert_eq!(current(), None);
}
