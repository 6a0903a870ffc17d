use std::ffi::CString;
use std::os::raw::c_void;
use std::rc::Rc;

use gl;
use gl::types::*;
use glutin;
use glutin::GlContext;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::shader::prelude::{DataType, Dialect, ShaderSource, UniformValue};
use crate::utils::prelude::DataVec;

use super::super::super::resources::*;
use super::super::super::ClearMask;
use super::super::{DrawCall, Visitor};
use super::capabilities::Capabilities;
use super::types;

#[derive(Debug, Clone, Copy)]
struct GLBufferData {
    id: GLuint,
    len: usize,
}

#[derive(Debug, Clone, Copy)]
struct GLVertexArrayData {
    id: GLuint,
    index_format: Option<IndexFormat>,
}

#[derive(Debug)]
struct GLShaderData {
    id: GLuint,
    /// The `Globals` uniform buffer, if the block is not empty and the dialect
    /// declares it as a uniform buffer.
    ubo: Option<(GLuint, Vec<u8>)>,
    /// Locations in declaration order, `-1` for uniforms living in `ubo`.
    locations: Vec<GLint>,
    params: ShaderParams,
}

pub struct GLVisitor {
    window: Rc<glutin::GlWindow>,
    capabilities: Capabilities,
    dialect: Dialect,
    vertex_buffers: DataVec<(GLBufferData, VertexLayout)>,
    index_buffers: DataVec<(GLBufferData, IndexFormat)>,
    vertex_arrays: DataVec<GLVertexArrayData>,
    shaders: DataVec<GLShaderData>,
    binded_shader: Option<GLuint>,
}

impl GLVisitor {
    pub unsafe fn new(window: Rc<glutin::GlWindow>) -> Result<Self> {
        window.make_current()?;
        gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);

        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);
        capabilities.check()?;

        let dialect = capabilities.version.dialect()?;
        let visitor = GLVisitor {
            window,
            capabilities,
            dialect,
            vertex_buffers: DataVec::new(),
            index_buffers: DataVec::new(),
            vertex_arrays: DataVec::new(),
            shaders: DataVec::new(),
            binded_shader: None,
        };

        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        check()?;
        Ok(visitor)
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl Visitor for GLVisitor {
    unsafe fn make_current(&self) -> Result<()> {
        self.window.make_current()?;
        Ok(())
    }

    unsafe fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        params: &VertexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let len = params.len();
        let id = create_buffer(gl::ARRAY_BUFFER, params.hint, len, data)?;
        self.vertex_buffers
            .create(handle, (GLBufferData { id, len }, params.layout.clone()));
        Ok(())
    }

    unsafe fn update_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        let vbo = self
            .vertex_buffers
            .get(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        update_buffer(gl::ARRAY_BUFFER, (vbo.0).id, offset, data)
    }

    unsafe fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()> {
        let (vbo, _) = self
            .vertex_buffers
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        gl::DeleteBuffers(1, &vbo.id);
        check()
    }

    unsafe fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        params: &IndexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let len = params.len();

        // Unbinds any vertex array so it does not capture this buffer.
        gl::BindVertexArray(0);
        let id = create_buffer(gl::ELEMENT_ARRAY_BUFFER, params.hint, len, data)?;
        self.index_buffers
            .create(handle, (GLBufferData { id, len }, params.format));
        Ok(())
    }

    unsafe fn update_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        let ibo = self
            .index_buffers
            .get(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        gl::BindVertexArray(0);
        update_buffer(gl::ELEMENT_ARRAY_BUFFER, (ibo.0).id, offset, data)
    }

    unsafe fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()> {
        let (ibo, _) = self
            .index_buffers
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        gl::DeleteBuffers(1, &ibo.id);
        check()
    }

    unsafe fn create_vertex_array(
        &mut self,
        handle: VertexArrayHandle,
        params: &VertexArrayParams,
    ) -> Result<()> {
        let (vbo, layout) = self
            .vertex_buffers
            .get(params.vertices)
            .ok_or_else(|| format_err!("{} is invalid.", params.vertices))?;

        let ibo = match params.indices {
            Some(v) => Some(
                *self
                    .index_buffers
                    .get(v)
                    .ok_or_else(|| format_err!("{} is invalid.", v))?,
            ),
            None => None,
        };

        let mut id = 0;
        gl::GenVertexArrays(1, &mut id);
        if id == 0 {
            bail!("[GL] Failed to generate vertex array.");
        }

        gl::BindVertexArray(id);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo.id);

        // Attribute locations are fixed per semantic, so the same vertex array
        // serves every program.
        for element in layout.elements() {
            let location = element.name.location();
            gl::EnableVertexAttribArray(location);
            gl::VertexAttribPointer(
                location,
                GLint::from(element.size),
                types::component_type(element.format),
                element.normalized as GLboolean,
                GLsizei::from(layout.stride()),
                element.offset as usize as *const c_void,
            );
        }

        if let Some((ibo, _)) = ibo {
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ibo.id);
        }

        gl::BindVertexArray(0);
        check()?;

        self.vertex_arrays.create(
            handle,
            GLVertexArrayData {
                id,
                index_format: ibo.map(|v| v.1),
            },
        );

        Ok(())
    }

    unsafe fn delete_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()> {
        let vao = self
            .vertex_arrays
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        gl::DeleteVertexArrays(1, &vao.id);
        check()
    }

    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        params: &ShaderParams,
        source: &ShaderSource,
    ) -> Result<()> {
        let vs = compile(gl::VERTEX_SHADER, &source.vs)?;
        let fs = match compile(gl::FRAGMENT_SHADER, &source.fs) {
            Ok(v) => v,
            Err(err) => {
                gl::DeleteShader(vs);
                return Err(err);
            }
        };

        let attributes: Vec<_> = params
            .layout
            .attributes()
            .iter()
            .map(|v| (v.attribute.location(), v.attribute.name()))
            .collect();

        let linked = link(&[vs, fs], &attributes);
        gl::DeleteShader(vs);
        gl::DeleteShader(fs);
        let id = linked?;

        match self.setup_uniforms(id, params) {
            Ok((ubo, locations)) => {
                let shader = GLShaderData {
                    id,
                    ubo,
                    locations,
                    params: params.clone(),
                };

                self.shaders.create(handle, shader);
                Ok(())
            }
            Err(err) => {
                gl::DeleteProgram(id);
                Err(err)
            }
        }
    }

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        let shader = self
            .shaders
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        if self.binded_shader == Some(shader.id) {
            self.binded_shader = None;
        }

        if let Some((ubo, _)) = shader.ubo {
            gl::DeleteBuffers(1, &ubo);
        }

        gl::DeleteProgram(shader.id);
        check()
    }

    unsafe fn clear(&mut self, mask: ClearMask, color: Color) -> Result<()> {
        if mask.contains(ClearMask::COLOR) {
            gl::ClearColor(color.r, color.g, color.b, color.a);
        }

        if mask.contains(ClearMask::DEPTH) {
            gl::DepthMask(gl::TRUE);
            gl::ClearDepth(1.0);
        }

        if mask.contains(ClearMask::STENCIL) {
            gl::ClearStencil(0);
        }

        let bits = types::clear_bits(mask);
        if bits != 0 {
            gl::Clear(bits);
        }

        check()
    }

    unsafe fn set_viewport(&mut self, position: Vector2<i32>, size: Vector2<u32>) -> Result<()> {
        gl::Viewport(position.x, position.y, size.x as i32, size.y as i32);
        check()
    }

    unsafe fn resize(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        let size = glutin::dpi::PhysicalSize::new(f64::from(dimensions.x), f64::from(dimensions.y));
        self.window.resize(size);
        self.set_viewport(Vector2::new(0, 0), dimensions)
    }

    unsafe fn draw(&mut self, call: DrawCall) -> Result<()> {
        let vao = *self
            .vertex_arrays
            .get(call.vertex_array)
            .ok_or_else(|| format_err!("{} is invalid.", call.vertex_array))?;

        let shader = self
            .shaders
            .get_mut(call.shader)
            .ok_or_else(|| format_err!("{} is invalid.", call.shader))?;

        if self.binded_shader != Some(shader.id) {
            gl::UseProgram(shader.id);
            self.binded_shader = Some(shader.id);
        }

        bind_uniforms(shader, call.uniforms)?;

        gl::BindVertexArray(vao.id);
        if call.indexed {
            let format = vao
                .index_format
                .ok_or_else(|| format_err!("{} has no index buffer.", call.vertex_array))?;

            let offset = call.first as usize * format.stride();
            gl::DrawElements(
                types::mode(call.primitive),
                call.count as GLsizei,
                types::index_type(format),
                offset as *const c_void,
            );
        } else {
            gl::DrawArrays(
                types::mode(call.primitive),
                call.first as GLint,
                call.count as GLsizei,
            );
        }

        gl::BindVertexArray(0);
        check()
    }

    unsafe fn swap_buffers(&mut self) -> Result<()> {
        self.window.swap_buffers()?;
        Ok(())
    }
}

impl GLVisitor {
    unsafe fn setup_uniforms(
        &self,
        id: GLuint,
        params: &ShaderParams,
    ) -> Result<(Option<(GLuint, Vec<u8>)>, Vec<GLint>)> {
        let ubo = if self.dialect.uniform_buffers() && !params.block.is_empty() {
            if !self.capabilities.has_uniform_buffers() {
                bail!("The OpenGL implementation does not supports uniform buffer objects.");
            }

            let name = cstring("Globals")?;
            let index = gl::GetUniformBlockIndex(id, name.as_ptr());
            if index == gl::INVALID_INDEX {
                bail!("Uniform block `Globals` is undefined in shader sources.");
            }

            gl::UniformBlockBinding(id, index, 0);

            let size = params.block.size();
            let ubo = create_buffer(gl::UNIFORM_BUFFER, BufferHint::Stream, size, None)?;
            Some((ubo, vec![0; size]))
        } else {
            None
        };

        let mut locations = Vec::with_capacity(params.layout.uniforms().len());
        for v in params.layout.uniforms() {
            let in_block = ubo.is_some() && v.data_type != DataType::Sampler2D;
            if in_block {
                locations.push(-1);
                continue;
            }

            let name = cstring(&v.name)?;
            let location = gl::GetUniformLocation(id, name.as_ptr());
            check()?;

            // Inactive uniforms are optimized out by the driver; writes to -1 are ignored.
            if location == -1 {
                debug!("Uniform `{}` is inactive in the linked program.", v.name);
            }

            locations.push(location);
        }

        Ok((ubo, locations))
    }
}

unsafe fn bind_uniforms(shader: &mut GLShaderData, values: &[UniformValue]) -> Result<()> {
    for ((slot, value), &location) in shader
        .params
        .layout
        .uniforms()
        .iter()
        .zip(values)
        .zip(&shader.locations)
    {
        if location == -1 {
            if let Some((_, ref mut buf)) = shader.ubo {
                if slot.data_type != DataType::Sampler2D {
                    shader.params.block.write(buf, &slot.name, value)?;
                }
            }

            continue;
        }

        match *value {
            UniformValue::Sampler(unit) => gl::Uniform1i(location, unit as GLint),
            UniformValue::I32(v) => gl::Uniform1i(location, v),
            UniformValue::F32(v) => gl::Uniform1f(location, v),
            UniformValue::Vector2f(v) => gl::Uniform2f(location, v[0], v[1]),
            UniformValue::Vector3f(v) => gl::Uniform3f(location, v[0], v[1], v[2]),
            UniformValue::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
            UniformValue::Matrix4f(v) => gl::UniformMatrix4fv(location, 1, gl::FALSE, v.as_ptr() as *const f32),
        }
    }

    if let Some((ubo, ref buf)) = shader.ubo {
        gl::BindBuffer(gl::UNIFORM_BUFFER, ubo);
        gl::BufferSubData(
            gl::UNIFORM_BUFFER,
            0,
            buf.len() as GLsizeiptr,
            buf.as_ptr() as *const c_void,
        );
        gl::BindBufferBase(gl::UNIFORM_BUFFER, 0, ubo);
    }

    check()
}

fn cstring(name: &str) -> Result<CString> {
    CString::new(name.as_bytes()).map_err(|_| format_err!("`{}` contains a nul byte.", name))
}

unsafe fn info_log(id: GLuint, program: bool) -> String {
    let mut len = 0;
    if program {
        gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
    } else {
        gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
    }

    if len <= 1 {
        return String::new();
    }

    let mut buf = vec![0u8; len as usize];
    if program {
        gl::GetProgramInfoLog(id, len, ::std::ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    } else {
        gl::GetShaderInfoLog(id, len, ::std::ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
    }

    // Skips the trailing null character.
    buf.truncate(len as usize - 1);
    String::from_utf8_lossy(&buf).into_owned()
}

unsafe fn compile(shader: GLenum, src: &str) -> Result<GLuint> {
    let c_str = cstring(src)?;
    let shader = gl::CreateShader(shader);
    gl::ShaderSource(shader, 1, &c_str.as_ptr(), ::std::ptr::null());
    gl::CompileShader(shader);

    let mut status = GLint::from(gl::FALSE);
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let log = info_log(shader, false);
        gl::DeleteShader(shader);
        bail!("{}\n{}", log, src);
    }

    Ok(shader)
}

unsafe fn link(shaders: &[GLuint], attributes: &[(GLuint, &str)]) -> Result<GLuint> {
    let program = gl::CreateProgram();
    for &shader in shaders {
        gl::AttachShader(program, shader);
    }

    for &(location, name) in attributes {
        let name = cstring(name)?;
        gl::BindAttribLocation(program, location, name.as_ptr());
    }

    gl::LinkProgram(program);

    for &shader in shaders {
        gl::DetachShader(program, shader);
    }

    let mut status = GLint::from(gl::FALSE);
    gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

    if status != GLint::from(gl::TRUE) {
        let log = info_log(program, true);
        gl::DeleteProgram(program);
        bail!("{}", log);
    }

    Ok(program)
}

unsafe fn create_buffer(tp: GLenum, hint: BufferHint, size: usize, data: Option<&[u8]>) -> Result<GLuint> {
    let mut id = 0;
    gl::GenBuffers(1, &mut id);
    if id == 0 {
        bail!("[GL] Failed to generate buffer.");
    }

    gl::BindBuffer(tp, id);

    let value = match data {
        Some(v) if !v.is_empty() => v.as_ptr() as *const c_void,
        _ => ::std::ptr::null(),
    };

    gl::BufferData(tp, size as GLsizeiptr, value, types::usage(hint));
    check()?;
    Ok(id)
}

unsafe fn update_buffer(tp: GLenum, id: GLuint, offset: usize, data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }

    gl::BindBuffer(tp, id);
    gl::BufferSubData(
        tp,
        offset as GLintptr,
        data.len() as GLsizeiptr,
        data.as_ptr() as *const c_void,
    );
    check()
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),

        gl::INVALID_ENUM => {
            bail!("[GL] An unacceptable value is specified for an enumerated argument.")
        }

        gl::INVALID_VALUE => bail!("[GL] A numeric argument is out of range."),

        gl::INVALID_OPERATION => {
            bail!("[GL] The specified operation is not allowed in the current state.")
        }

        gl::INVALID_FRAMEBUFFER_OPERATION => bail!(
            "[GL] The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        ),

        gl::OUT_OF_MEMORY => bail!("[GL] There is not enough memory left to execute the command."),
        _ => bail!("[GL] Oops, Unknown OpenGL error."),
    }
}
