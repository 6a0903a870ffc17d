use std::marker::PhantomData;

use crate::math::prelude::{Color, Vector2};
use crate::shader::prelude::{
    Dialect, Generator, Language, Packing, ShaderProgram, UniformBlock, UniformValue, Version,
};
use crate::utils::prelude::ObjectPool;
use crate::window::{Surface, Window};

use super::backends::headless::HeadlessVisitor;
use super::backends::{Device, DrawCall};
use super::current::{self, ContextId};
use super::errors::*;
use super::resources::*;
use super::{Api, ClearMask, ContextParams};

#[cfg(not(target_arch = "wasm32"))]
use super::backends::gl::GLVisitor;

#[cfg(windows)]
use super::backends::d3d11::D3D11Visitor;

/// The statistics of a frame, collected between two `swap_buffers`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub draw_calls: u32,
    pub triangles: u32,
    pub alive_vertex_buffers: u32,
    pub alive_index_buffers: u32,
    pub alive_vertex_arrays: u32,
    pub alive_shaders: u32,
}

impl FrameInfo {
    /// Counters saturate instead of wrapping on very large frames.
    fn record_draw(&mut self, triangles: u32) {
        self.draw_calls = self.draw_calls.saturating_add(1);
        self.triangles = self.triangles.saturating_add(triangles);
    }
}

/// A native graphics context and the resources created through it.
///
/// Every method that touches the GPU fails with `Error::ContextNotCurrent`
/// unless this context is the current one of the calling thread. A context
/// is current right after creation.
pub struct RenderContext {
    id: ContextId,
    api: Api,
    dialect: Dialect,
    clear_color: Color,
    dimensions: Vector2<u32>,

    vertex_buffers: ObjectPool<VertexBufferHandle, VertexBufferParams>,
    index_buffers: ObjectPool<IndexBufferHandle, IndexBufferParams>,
    vertex_arrays: ObjectPool<VertexArrayHandle, VertexArrayParams>,
    shaders: ObjectPool<ShaderHandle, ShaderParams>,
    bound: Option<VertexArrayHandle>,

    frame: FrameInfo,
    last_frame: FrameInfo,

    device: Device,
    // Native contexts are bound to the thread that made them current.
    _unsend: PhantomData<*const ()>,
}

impl RenderContext {
    /// Creates a context drawing into `window`, and makes it current.
    pub fn new(window: &Window, params: ContextParams) -> Result<Self> {
        let api = params.api();
        if !api.is_available() {
            return Err(Error::ApiUnavailable(api));
        }

        let (device, dialect) = match (api, window.surface()) {
            (Api::Headless, _) => (Device::Headless(HeadlessVisitor::new()), headless_dialect()?),

            #[cfg(not(target_arch = "wasm32"))]
            (Api::OpenGL, Surface::GL(surface)) => {
                let visitor = unsafe { GLVisitor::new(surface)? };
                let dialect = visitor.dialect();
                (Device::GL(visitor), dialect)
            }

            #[cfg(windows)]
            (Api::Direct3D11, Surface::Native(surface)) => {
                let visitor = unsafe { D3D11Visitor::new(surface, params.vsync, params.multisample)? };
                let dialect = visitor.dialect();
                (Device::D3D11(visitor), dialect)
            }

            #[allow(unreachable_patterns)]
            (api, _) => {
                return Err(Error::Window(format!(
                    "The window surface can not host a {:?} context.",
                    api
                )));
            }
        };

        let ctx = RenderContext::with_device(api, dialect, device, params.clear_color, window.dimensions())?;
        info!("Created {:?} render context {:?} with {}.", api, ctx.id, dialect);
        Ok(ctx)
    }

    /// Creates a context without any native device, and makes it current.
    pub fn headless() -> Result<Self> {
        let device = Device::Headless(HeadlessVisitor::new());
        let ctx = RenderContext::with_device(
            Api::Headless,
            headless_dialect()?,
            device,
            Color::black(),
            Vector2::new(0, 0),
        )?;

        info!("Created headless render context {:?}.", ctx.id);
        Ok(ctx)
    }

    fn with_device(
        api: Api,
        dialect: Dialect,
        device: Device,
        clear_color: Color,
        dimensions: Vector2<u32>,
    ) -> Result<Self> {
        let ctx = RenderContext {
            id: ContextId::next(),
            api,
            dialect,
            clear_color,
            dimensions,
            vertex_buffers: ObjectPool::new(),
            index_buffers: ObjectPool::new(),
            vertex_arrays: ObjectPool::new(),
            shaders: ObjectPool::new(),
            bound: None,
            frame: FrameInfo::default(),
            last_frame: FrameInfo::default(),
            device,
            _unsend: PhantomData,
        };

        ctx.make_current()?;
        Ok(ctx)
    }

    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[inline]
    pub fn api(&self) -> Api {
        self.api
    }

    /// The shader dialect the live backend consumes.
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// The statistics of the last completed frame.
    #[inline]
    pub fn frame_info(&self) -> FrameInfo {
        self.last_frame
    }

    /// Binds this context to the calling thread, demoting whichever context
    /// was current before.
    pub fn make_current(&self) -> Result<()> {
        unsafe {
            self.device.visitor().make_current()?;
        }

        current::set(self.id);
        Ok(())
    }

    /// Leaves the calling thread without a current context if this one was
    /// current.
    #[inline]
    pub fn reset_current(&self) {
        current::reset(self.id);
    }

    #[inline]
    pub fn is_current(&self) -> bool {
        current::is(self.id)
    }

    #[inline]
    fn check(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(Error::ContextNotCurrent)
        }
    }
}

impl RenderContext {
    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    #[inline]
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn clear(&mut self, mask: ClearMask) -> Result<()> {
        self.check()?;
        unsafe { self.device.visitor_mut().clear(mask, self.clear_color)? };
        Ok(())
    }

    pub fn set_viewport(&mut self, position: Vector2<i32>, size: Vector2<u32>) -> Result<()> {
        self.check()?;
        unsafe { self.device.visitor_mut().set_viewport(position, size)? };
        Ok(())
    }

    /// Resizes the back buffer and resets the viewport to cover it.
    pub fn resize(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        self.check()?;
        unsafe { self.device.visitor_mut().resize(dimensions)? };
        self.dimensions = dimensions;
        Ok(())
    }

    /// Presents the back buffer and starts a new frame.
    pub fn swap_buffers(&mut self) -> Result<()> {
        self.check()?;
        unsafe { self.device.visitor_mut().swap_buffers()? };

        self.frame.alive_vertex_buffers = self.vertex_buffers.len() as u32;
        self.frame.alive_index_buffers = self.index_buffers.len() as u32;
        self.frame.alive_vertex_arrays = self.vertex_arrays.len() as u32;
        self.frame.alive_shaders = self.shaders.len() as u32;
        self.last_frame = self.frame;
        self.frame = FrameInfo::default();
        Ok(())
    }
}

impl RenderContext {
    /// Creates a vertex buffer. `data`, when given, must cover the whole
    /// buffer.
    pub fn create_vertex_buffer(
        &mut self,
        params: VertexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<VertexBufferHandle> {
        self.check()?;
        check_initial_data(params.len(), data)?;

        let handle = self.vertex_buffers.create(params.clone());
        let result = unsafe {
            self.device
                .visitor_mut()
                .create_vertex_buffer(handle, &params, data)
        };

        if let Err(err) = result {
            self.vertex_buffers.free(handle);
            return Err(err.into());
        }

        debug!("Created {} with {} bytes.", handle, params.len());
        Ok(handle)
    }

    /// Writes `data` into the buffer starting at byte `offset`.
    pub fn update_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        self.check()?;

        let params = self
            .vertex_buffers
            .get(handle)
            .ok_or(Error::VertexBufferHandleInvalid(handle))?;

        check_update(params.hint, params.len(), offset, data)?;
        unsafe {
            self.device
                .visitor_mut()
                .update_vertex_buffer(handle, offset, data)?
        };

        Ok(())
    }

    pub fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()> {
        self.check()?;

        self.vertex_buffers
            .free(handle)
            .ok_or(Error::VertexBufferHandleInvalid(handle))?;

        unsafe { self.device.visitor_mut().delete_vertex_buffer(handle)? };
        debug!("Deleted {}.", handle);
        Ok(())
    }

    #[inline]
    pub fn vertex_buffer(&self, handle: VertexBufferHandle) -> Option<&VertexBufferParams> {
        self.vertex_buffers.get(handle)
    }

    /// Creates an index buffer. `data`, when given, must cover the whole
    /// buffer.
    pub fn create_index_buffer(
        &mut self,
        params: IndexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<IndexBufferHandle> {
        self.check()?;
        check_initial_data(params.len(), data)?;

        let handle = self.index_buffers.create(params);
        let result = unsafe {
            self.device
                .visitor_mut()
                .create_index_buffer(handle, &params, data)
        };

        if let Err(err) = result {
            self.index_buffers.free(handle);
            return Err(err.into());
        }

        debug!("Created {} with {} bytes.", handle, params.len());
        Ok(handle)
    }

    pub fn update_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        self.check()?;

        let params = self
            .index_buffers
            .get(handle)
            .ok_or(Error::IndexBufferHandleInvalid(handle))?;

        check_update(params.hint, params.len(), offset, data)?;
        unsafe {
            self.device
                .visitor_mut()
                .update_index_buffer(handle, offset, data)?
        };

        Ok(())
    }

    pub fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()> {
        self.check()?;

        self.index_buffers
            .free(handle)
            .ok_or(Error::IndexBufferHandleInvalid(handle))?;

        unsafe { self.device.visitor_mut().delete_index_buffer(handle)? };
        debug!("Deleted {}.", handle);
        Ok(())
    }

    #[inline]
    pub fn index_buffer(&self, handle: IndexBufferHandle) -> Option<&IndexBufferParams> {
        self.index_buffers.get(handle)
    }

    /// Pairs a vertex buffer with an optional index buffer for drawing.
    pub fn create_vertex_array(
        &mut self,
        vertices: VertexBufferHandle,
        indices: Option<IndexBufferHandle>,
    ) -> Result<VertexArrayHandle> {
        self.check()?;

        if !self.vertex_buffers.contains(vertices) {
            return Err(Error::VertexBufferHandleInvalid(vertices));
        }

        if let Some(v) = indices {
            if !self.index_buffers.contains(v) {
                return Err(Error::IndexBufferHandleInvalid(v));
            }
        }

        let params = VertexArrayParams { vertices, indices };
        let handle = self.vertex_arrays.create(params);
        let result = unsafe {
            self.device
                .visitor_mut()
                .create_vertex_array(handle, &params)
        };

        if let Err(err) = result {
            self.vertex_arrays.free(handle);
            return Err(err.into());
        }

        debug!("Created {}.", handle);
        Ok(handle)
    }

    pub fn delete_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()> {
        self.check()?;

        self.vertex_arrays
            .free(handle)
            .ok_or(Error::VertexArrayHandleInvalid(handle))?;

        if self.bound == Some(handle) {
            self.bound = None;
        }

        unsafe { self.device.visitor_mut().delete_vertex_array(handle)? };
        debug!("Deleted {}.", handle);
        Ok(())
    }

    /// Selects the vertex array following draws read from.
    pub fn bind_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()> {
        self.check()?;

        if !self.vertex_arrays.contains(handle) {
            return Err(Error::VertexArrayHandleInvalid(handle));
        }

        self.bound = Some(handle);
        Ok(())
    }

    /// Generates source for the dialect of this context and compiles it into
    /// a native program.
    pub fn create_shader(&mut self, program: &dyn ShaderProgram) -> Result<ShaderHandle> {
        self.check()?;

        let source = Generator::new(self.dialect).generate(program)?;
        let layout = program.layout().clone();
        let packing = if self.dialect.is_hlsl() {
            Packing::Hlsl
        } else {
            Packing::Std140
        };

        let block = UniformBlock::new(packing, &layout);
        let params = ShaderParams { layout, block };

        let handle = self.shaders.create(params.clone());
        let result = unsafe {
            self.device
                .visitor_mut()
                .create_shader(handle, &params, &source)
        };

        if let Err(err) = result {
            self.shaders.free(handle);
            return Err(err.into());
        }

        debug!("Created {} for {}.", handle, self.dialect);
        Ok(handle)
    }

    pub fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        self.check()?;

        self.shaders
            .free(handle)
            .ok_or(Error::ShaderHandleInvalid(handle))?;

        unsafe { self.device.visitor_mut().delete_shader(handle)? };
        debug!("Deleted {}.", handle);
        Ok(())
    }

    #[inline]
    pub fn shader(&self, handle: ShaderHandle) -> Option<&ShaderParams> {
        self.shaders.get(handle)
    }
}

impl RenderContext {
    /// Draws `count` vertices of the bound vertex array starting at `first`.
    ///
    /// Every uniform the shader declares must be bound in `uniforms` with a
    /// value of its declared type.
    pub fn draw(
        &mut self,
        shader: ShaderHandle,
        uniforms: &[(&str, UniformValue)],
        primitive: Primitive,
        first: u32,
        count: u32,
    ) -> Result<()> {
        self.submit(shader, uniforms, primitive, first, count, false)
    }

    /// Draws `count` indices of the index buffer of the bound vertex array
    /// starting at `first`.
    pub fn draw_indexed(
        &mut self,
        shader: ShaderHandle,
        uniforms: &[(&str, UniformValue)],
        primitive: Primitive,
        first: u32,
        count: u32,
    ) -> Result<()> {
        self.submit(shader, uniforms, primitive, first, count, true)
    }

    fn submit(
        &mut self,
        shader: ShaderHandle,
        uniforms: &[(&str, UniformValue)],
        primitive: Primitive,
        first: u32,
        count: u32,
        indexed: bool,
    ) -> Result<()> {
        self.check()?;

        let vertex_array = self.bound.ok_or(Error::NoVertexArray)?;
        let va = *self
            .vertex_arrays
            .get(vertex_array)
            .ok_or(Error::VertexArrayHandleInvalid(vertex_array))?;

        let vb = self
            .vertex_buffers
            .get(va.vertices)
            .ok_or(Error::VertexBufferHandleInvalid(va.vertices))?;

        let sp = self
            .shaders
            .get(shader)
            .ok_or(Error::ShaderHandleInvalid(shader))?;

        for slot in sp.layout.attributes() {
            let element = vb
                .layout
                .element(slot.attribute)
                .ok_or(Error::AttributeMissing(slot.attribute))?;

            let expected = slot.data_type.components();
            if usize::from(element.size) != expected {
                return Err(Error::AttributeSizeMismatch(
                    slot.attribute,
                    expected as u8,
                    element.size,
                ));
            }
        }

        let values = bind_uniforms(sp, uniforms)?;

        let end = u64::from(first) + u64::from(count);
        if indexed {
            let ib = va.indices.ok_or(Error::NoIndexBuffer)?;
            let params = self
                .index_buffers
                .get(ib)
                .ok_or(Error::IndexBufferHandleInvalid(ib))?;

            if end > params.num as u64 {
                return Err(Error::OutOfBounds);
            }
        } else if end > vb.num as u64 {
            return Err(Error::OutOfBounds);
        }

        let call = DrawCall {
            shader,
            vertex_array,
            uniforms: &values,
            primitive,
            first,
            count,
            indexed,
        };

        unsafe { self.device.visitor_mut().draw(call)? };

        self.frame.record_draw(primitive.assemble_triangles(count));
        Ok(())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if !self.is_current() {
            // GL objects live until the window owning the native context closes.
            let alive = self.vertex_buffers.len()
                + self.index_buffers.len()
                + self.vertex_arrays.len()
                + self.shaders.len();
            warn!(
                "Render context {:?} dropped while not current, {} resources stay allocated with the native context.",
                self.id, alive
            );
            return;
        }

        let visitor = self.device.visitor_mut();
        unsafe {
            for (handle, _) in self.vertex_arrays.drain() {
                if let Err(err) = visitor.delete_vertex_array(handle) {
                    warn!("Failed to delete {}: {}", handle, err);
                }
            }

            for (handle, _) in self.shaders.drain() {
                if let Err(err) = visitor.delete_shader(handle) {
                    warn!("Failed to delete {}: {}", handle, err);
                }
            }

            for (handle, _) in self.index_buffers.drain() {
                if let Err(err) = visitor.delete_index_buffer(handle) {
                    warn!("Failed to delete {}: {}", handle, err);
                }
            }

            for (handle, _) in self.vertex_buffers.drain() {
                if let Err(err) = visitor.delete_vertex_buffer(handle) {
                    warn!("Failed to delete {}: {}", handle, err);
                }
            }
        }

        current::reset(self.id);
        debug!("Render context {:?} released.", self.id);
    }
}

fn headless_dialect() -> Result<Dialect> {
    Ok(Dialect::resolve(Language::Glsl, Version(3, 3))?)
}

fn check_initial_data(len: usize, data: Option<&[u8]>) -> Result<()> {
    match data {
        Some(v) if v.len() != len => Err(Error::OutOfBounds),
        _ => Ok(()),
    }
}

fn check_update(hint: BufferHint, len: usize, offset: usize, data: &[u8]) -> Result<()> {
    if hint == BufferHint::Immutable {
        return Err(Error::UpdateImmutableBuffer);
    }

    match offset.checked_add(data.len()) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds),
    }
}

/// Orders the bound values like the declarations of the shader. A name bound
/// twice takes the last value.
fn bind_uniforms(sp: &ShaderParams, uniforms: &[(&str, UniformValue)]) -> Result<Vec<UniformValue>> {
    for &(name, _) in uniforms {
        if sp.layout.uniform(name).is_none() {
            return Err(Error::UniformUndefined(name.into()));
        }
    }

    sp.layout
        .uniforms()
        .iter()
        .map(|slot| {
            let value = uniforms
                .iter()
                .rev()
                .find(|v| v.0 == slot.name)
                .map(|v| v.1)
                .ok_or_else(|| Error::UniformMissing(slot.name.clone()))?;

            if value.data_type() != slot.data_type {
                return Err(Error::UniformTypeMismatch(
                    slot.name.clone(),
                    slot.data_type,
                    value.data_type(),
                ));
            }

            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_counters_saturate() {
        let mut frame = FrameInfo {
            draw_calls: u32::max_value() - 1,
            triangles: u32::max_value() - 10,
            ..FrameInfo::default()
        };

        frame.record_draw(4);
        assert_eq!(frame.draw_calls, u32::max_value());
        assert_eq!(frame.triangles, u32::max_value() - 6);

        frame.record_draw(100);
        assert_eq!(frame.draw_calls, u32::max_value());
        assert_eq!(frame.triangles, u32::max_value());
    }
}
