extern crate lumen;

use lumen::prelude::*;

#[test]
fn headless_events() {
    let mut window = Window::headless(WindowParams::default());
    assert!(window.is_open());
    assert_eq!(window.dimensions(), Vector2::new(640, 320));
    assert_eq!(window.device_pixel_ratio(), 1.0);

    let mut events = Vec::new();
    window.poll_events(&mut events);
    assert!(events.is_empty());

    window.set_size(Vector2::new(800, 600));
    window.set_size(Vector2::new(800, 600));
    window.set_position(Vector2::new(10, 20));

    window.poll_events(&mut events);
    assert_eq!(
        events,
        vec![
            Event::Resized(Vector2::new(800, 600)),
            Event::Moved(Vector2::new(10, 20)),
        ]
    );

    assert_eq!(window.dimensions(), Vector2::new(800, 600));
    assert_eq!(window.position(), Vector2::new(10, 20));

    events.clear();
    window.poll_events(&mut events);
    assert!(events.is_empty());
}

#[test]
fn visibility() {
    let params = WindowParams {
        visible: false,
        ..WindowParams::default()
    };

    let mut window = Window::headless(params);
    assert!(!window.is_visible());
    window.show();
    assert!(window.is_visible());
    window.hide();
    assert!(!window.is_visible());
}

#[test]
fn close() {
    let mut window = Window::headless(WindowParams::default());
    window.close();
    assert!(!window.is_open());
}

#[test]
fn headless_window_from_params() {
    let params = ContextParams {
        api: Some(Api::Headless),
        ..ContextParams::default()
    };

    let window = Window::new(WindowParams::default(), &params).unwrap();
    assert!(window.is_open());
    assert!(window.is_visible());
}
