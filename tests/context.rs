extern crate lumen;

use lumen::prelude::*;
use lumen::shader::errors::Result as ShaderResult;

struct Colored(ShaderLayout);

impl Colored {
    fn new() -> Self {
        let layout = ShaderLayout::build()
            .with_attribute(Attribute::Position, DataType::Vec2)
            .with_varying("v_color", DataType::Vec4)
            .with_uniform("u_color", DataType::Vec4)
            .with_uniform("u_scale", DataType::Float)
            .finish()
            .unwrap();

        Colored(layout)
    }
}

impl ShaderProgram for Colored {
    fn layout(&self) -> &ShaderLayout {
        &self.0
    }

    fn vs_main(&self, stage: &mut VertexStage) -> ShaderResult<VertexOutput> {
        let position = stage.attribute(Attribute::Position)?;
        let scale = stage.uniform("u_scale")?;
        let p = ops::mul(&position, &scale)?;
        let clip = Vec4::from_vec2_scalars(&p, &Float::lit(0.0)?, &Float::lit(1.0)?)?;
        let color = stage.uniform("u_color")?;
        Ok(VertexOutput::new(clip).with_varying("v_color", color))
    }

    fn ps_main(&self, stage: &mut PixelStage) -> ShaderResult<PixelOutput> {
        Ok(PixelOutput::new(stage.varying("v_color")?))
    }
}

fn vertex_layout(size: u8) -> VertexLayout {
    VertexLayout::build()
        .with(Attribute::Position, VertexFormat::Float, size, false)
        .finish()
        .unwrap()
}

fn quad(ctx: &mut RenderContext) -> (VertexBufferHandle, IndexBufferHandle, VertexArrayHandle) {
    let params = VertexBufferParams {
        hint: BufferHint::Immutable,
        layout: vertex_layout(2),
        num: 4,
    };

    let vb = ctx.create_vertex_buffer(params, Some(&[0u8; 32][..])).unwrap();

    let params = IndexBufferParams {
        hint: BufferHint::Dynamic,
        format: IndexFormat::U16,
        num: 6,
    };

    let ib = ctx.create_index_buffer(params, None).unwrap();
    let va = ctx.create_vertex_array(vb, Some(ib)).unwrap();
    (vb, ib, va)
}

fn uniforms() -> Vec<(&'static str, UniformValue)> {
    vec![
        ("u_color", [1.0f32, 0.0, 0.0, 1.0].into()),
        ("u_scale", 0.5f32.into()),
    ]
}

#[test]
fn make_current() {
    let a = RenderContext::headless().unwrap();
    assert!(a.is_current());

    let b = RenderContext::headless().unwrap();
    assert!(!a.is_current());
    assert!(b.is_current());

    a.make_current().unwrap();
    assert!(a.is_current());
    assert!(!b.is_current());
    assert_eq!(current(), Some(a.id()));

    b.make_current().unwrap();
    assert!(!a.is_current());
    assert!(b.is_current());

    b.reset_current();
    assert_eq!(current(), None);
}

#[test]
fn drop_resets_current() {
    let a = RenderContext::headless().unwrap();
    let id = a.id();
    assert_eq!(current(), Some(id));

    drop(a);
    assert_eq!(current(), None);

    let a = RenderContext::headless().unwrap();
    let b = RenderContext::headless().unwrap();
    drop(a);
    assert!(b.is_current());
}

#[test]
fn drop_while_not_current() {
    let mut a = RenderContext::headless().unwrap();
    quad(&mut a);

    let mut b = RenderContext::headless().unwrap();
    let (_, _, va) = quad(&mut b);
    let shader = b.create_shader(&Colored::new()).unwrap();

    drop(a);
    assert_eq!(current(), Some(b.id()));

    b.bind_vertex_array(va).unwrap();
    b.draw(shader, &uniforms(), Primitive::Triangles, 0, 3).unwrap();
    b.swap_buffers().unwrap();
    assert_eq!(b.frame_info().alive_vertex_arrays, 1);
    assert_eq!(b.frame_info().alive_shaders, 1);
}

#[test]
fn not_current() {
    let mut a = RenderContext::headless().unwrap();
    let (vb, _, va) = quad(&mut a);
    let shader = a.create_shader(&Colored::new()).unwrap();

    let _b = RenderContext::headless().unwrap();

    match a.clear(ClearMask::COLOR) {
        Err(VideoError::ContextNotCurrent) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(a.update_vertex_buffer(vb, 0, &[0; 4]).is_err());
    assert!(a.delete_vertex_array(va).is_err());
    assert!(a.bind_vertex_array(va).is_err());
    assert!(a.swap_buffers().is_err());
    assert!(a
        .draw(shader, &uniforms(), Primitive::Triangles, 0, 3)
        .is_err());

    // Nothing was touched while not current.
    a.make_current().unwrap();
    assert!(a.vertex_buffer(vb).is_some());
    a.bind_vertex_array(va).unwrap();
}

#[test]
fn handles_invalidate_on_delete() {
    let mut ctx = RenderContext::headless().unwrap();
    let (vb, ib, va) = quad(&mut ctx);

    assert!(ctx.vertex_buffer(vb).is_some());
    assert_eq!(ctx.index_buffer(ib).map(|v| v.len()), Some(12));

    ctx.delete_vertex_array(va).unwrap();
    match ctx.delete_vertex_array(va) {
        Err(VideoError::VertexArrayHandleInvalid(h)) => assert_eq!(h, va),
        other => panic!("unexpected {:?}", other),
    }

    ctx.delete_vertex_buffer(vb).unwrap();
    assert!(ctx.vertex_buffer(vb).is_none());
    assert!(ctx.update_vertex_buffer(vb, 0, &[]).is_err());
    assert!(ctx.create_vertex_array(vb, None).is_err());

    ctx.delete_index_buffer(ib).unwrap();
    assert!(ctx.index_buffer(ib).is_none());

    let shader = ctx.create_shader(&Colored::new()).unwrap();
    assert!(ctx.shader(shader).is_some());
    ctx.delete_shader(shader).unwrap();
    assert!(ctx.shader(shader).is_none());
    assert!(ctx.delete_shader(shader).is_err());
}

#[test]
fn buffer_updates() {
    let mut ctx = RenderContext::headless().unwrap();
    let (vb, ib, _) = quad(&mut ctx);

    match ctx.update_vertex_buffer(vb, 0, &[0; 8]) {
        Err(VideoError::UpdateImmutableBuffer) => {}
        other => panic!("unexpected {:?}", other),
    }

    ctx.update_index_buffer(ib, 0, &[0; 12]).unwrap();
    ctx.update_index_buffer(ib, 10, &[0; 2]).unwrap();

    match ctx.update_index_buffer(ib, 10, &[0; 4]) {
        Err(VideoError::OutOfBounds) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(ctx.update_index_buffer(ib, std::usize::MAX, &[0; 1]).is_err());

    let params = VertexBufferParams {
        hint: BufferHint::Stream,
        layout: vertex_layout(2),
        num: 4,
    };

    match ctx.create_vertex_buffer(params, Some(&[0u8; 16][..])) {
        Err(VideoError::OutOfBounds) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn draw() {
    let mut ctx = RenderContext::headless().unwrap();
    let (_, _, va) = quad(&mut ctx);
    let shader = ctx.create_shader(&Colored::new()).unwrap();

    match ctx.draw(shader, &uniforms(), Primitive::Triangles, 0, 3) {
        Err(VideoError::NoVertexArray) => {}
        other => panic!("unexpected {:?}", other),
    }

    ctx.bind_vertex_array(va).unwrap();
    ctx.draw(shader, &uniforms(), Primitive::Triangles, 0, 3).unwrap();
    ctx.draw_indexed(shader, &uniforms(), Primitive::Triangles, 0, 6)
        .unwrap();
    ctx.draw(shader, &uniforms(), Primitive::TriangleStrip, 0, 4)
        .unwrap();

    match ctx.draw(shader, &uniforms(), Primitive::Triangles, 2, 3) {
        Err(VideoError::OutOfBounds) => {}
        other => panic!("unexpected {:?}", other),
    }

    match ctx.draw_indexed(shader, &uniforms(), Primitive::Triangles, 3, 6) {
        Err(VideoError::OutOfBounds) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(ctx
        .draw(shader, &uniforms(), Primitive::Points, std::u32::MAX, 2)
        .is_err());

    ctx.swap_buffers().unwrap();
    let info = ctx.frame_info();
    assert_eq!(info.draw_calls, 3);
    assert_eq!(info.triangles, 1 + 2 + 2);
    assert_eq!(info.alive_vertex_buffers, 1);
    assert_eq!(info.alive_index_buffers, 1);
    assert_eq!(info.alive_vertex_arrays, 1);
    assert_eq!(info.alive_shaders, 1);

    ctx.swap_buffers().unwrap();
    assert_eq!(ctx.frame_info().draw_calls, 0);
}

#[test]
fn draw_validation() {
    let mut ctx = RenderContext::headless().unwrap();
    let shader = ctx.create_shader(&Colored::new()).unwrap();

    let params = VertexBufferParams {
        hint: BufferHint::Dynamic,
        layout: vertex_layout(3),
        num: 3,
    };

    let vb = ctx.create_vertex_buffer(params, None).unwrap();
    let va = ctx.create_vertex_array(vb, None).unwrap();
    ctx.bind_vertex_array(va).unwrap();

    match ctx.draw(shader, &uniforms(), Primitive::Triangles, 0, 3) {
        Err(VideoError::AttributeSizeMismatch(Attribute::Position, 2, 3)) => {}
        other => panic!("unexpected {:?}", other),
    }

    let params = VertexBufferParams {
        hint: BufferHint::Dynamic,
        layout: vertex_layout(2),
        num: 3,
    };

    let vb = ctx.create_vertex_buffer(params, None).unwrap();
    let va = ctx.create_vertex_array(vb, None).unwrap();
    ctx.bind_vertex_array(va).unwrap();

    match ctx.draw(shader, &uniforms()[..1], Primitive::Triangles, 0, 3) {
        Err(VideoError::UniformMissing(name)) => assert_eq!(name, "u_scale"),
        other => panic!("unexpected {:?}", other),
    }

    let mut extra = uniforms();
    extra.push(("u_unknown", 1.0f32.into()));
    match ctx.draw(shader, &extra, Primitive::Triangles, 0, 3) {
        Err(VideoError::UniformUndefined(name)) => assert_eq!(name, "u_unknown"),
        other => panic!("unexpected {:?}", other),
    }

    let wrong: Vec<(&str, UniformValue)> = vec![("u_color", 1.0f32.into()), ("u_scale", 1.0f32.into())];
    match ctx.draw(shader, &wrong, Primitive::Triangles, 0, 3) {
        Err(VideoError::UniformTypeMismatch(name, DataType::Vec4, DataType::Float)) => {
            assert_eq!(name, "u_color")
        }
        other => panic!("unexpected {:?}", other),
    }

    // The last binding of a name wins.
    let mut twice = wrong.clone();
    twice.push(("u_color", [0.0f32; 4].into()));
    ctx.draw(shader, &twice, Primitive::Triangles, 0, 3).unwrap();

    match ctx.draw_indexed(shader, &uniforms(), Primitive::Triangles, 0, 3) {
        Err(VideoError::NoIndexBuffer) => {}
        other => panic!("unexpected {:?}", other),
    }

    ctx.delete_vertex_array(va).unwrap();
    match ctx.draw(shader, &uniforms(), Primitive::Triangles, 0, 3) {
        Err(VideoError::NoVertexArray) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn surface_state() {
    let mut ctx = RenderContext::headless().unwrap();
    assert_eq!(ctx.api(), Api::Headless);
    assert_eq!(ctx.dialect().header(), "#version 330\n");

    ctx.set_clear_color(Color::white());
    assert_eq!(ctx.clear_color(), Color::white());
    ctx.clear(ClearMask::COLOR | ClearMask::DEPTH | ClearMask::STENCIL)
        .unwrap();

    ctx.resize(Vector2::new(320, 240)).unwrap();
    assert_eq!(ctx.dimensions(), Vector2::new(320, 240));
    ctx.set_viewport(Vector2::new(0, 0), Vector2::new(160, 120))
        .unwrap();
}

#[test]
fn headless_window_context() {
    let window = Window::headless(WindowParams::default());
    let params = ContextParams {
        api: Some(Api::Headless),
        ..ContextParams::default()
    };

    let ctx = RenderContext::new(&window, params).unwrap();
    assert!(ctx.is_current());
    assert_eq!(ctx.dimensions(), window.dimensions());
}
