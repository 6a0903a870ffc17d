use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::rc::Rc;

use glutin;
use glutin::os::windows::WindowExt;
use windows::core::PCSTR;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::shader::prelude::{DataType, Dialect, Language, ShaderSource, Stage};
use crate::utils::prelude::DataVec;

use super::super::super::resources::*;
use super::super::super::ClearMask;
use super::super::{DrawCall, Visitor};
use super::types;

struct D3D11Buffer {
    buffer: ID3D11Buffer,
    len: usize,
}

struct D3D11Shader {
    vs: ID3D11VertexShader,
    ps: ID3D11PixelShader,
    /// Bytecode of the vertex stage, input layouts are validated against it.
    vs_bytecode: Vec<u8>,
    cbuffer: Option<(ID3D11Buffer, Vec<u8>)>,
    params: ShaderParams,
}

/// Views of the back buffer, recreated on every resize.
struct Views {
    rtv: ID3D11RenderTargetView,
    dsv: ID3D11DepthStencilView,
}

pub struct D3D11Visitor {
    // Fields drop in declaration order: views and resources go before the
    // immediate context, which goes before the swap chain and device.
    views: Option<Views>,
    input_layouts: HashMap<(ShaderHandle, VertexArrayHandle), ID3D11InputLayout>,
    shaders: DataVec<D3D11Shader>,
    vertex_arrays: DataVec<VertexArrayParams>,
    vertex_buffers: DataVec<(D3D11Buffer, VertexLayout)>,
    index_buffers: DataVec<(D3D11Buffer, IndexFormat)>,
    context: ID3D11DeviceContext,
    swapchain: IDXGISwapChain,
    device: ID3D11Device,
    dialect: Dialect,
    vsync: bool,
    multisample: u16,
    window: Rc<glutin::Window>,
}

impl D3D11Visitor {
    pub unsafe fn new(window: Rc<glutin::Window>, vsync: bool, multisample: u16) -> Result<Self> {
        let hwnd = HWND(window.get_hwnd() as isize);
        let (w, h) = physical_dimensions(&window);

        let desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: w,
                Height: h,
                RefreshRate: DXGI_RATIONAL {
                    Numerator: 0,
                    Denominator: 1,
                },
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                ..Default::default()
            },
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: u32::from(multisample.max(1)),
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: 1,
            OutputWindow: hwnd,
            Windowed: TRUE,
            SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
            ..Default::default()
        };

        let levels = [
            D3D_FEATURE_LEVEL_11_0,
            D3D_FEATURE_LEVEL_10_1,
            D3D_FEATURE_LEVEL_10_0,
            D3D_FEATURE_LEVEL_9_3,
            D3D_FEATURE_LEVEL_9_1,
        ];

        let mut swapchain = None;
        let mut device = None;
        let mut context = None;
        let mut level = D3D_FEATURE_LEVEL_9_1;

        D3D11CreateDeviceAndSwapChain(
            None::<&IDXGIAdapter>,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE::default(),
            D3D11_CREATE_DEVICE_FLAG(0),
            Some(&levels),
            D3D11_SDK_VERSION,
            Some(&desc),
            Some(&mut swapchain),
            Some(&mut device),
            Some(&mut level),
            Some(&mut context),
        )
        .map_err(|err| format_err!("[D3D11] Failed to create device: {}", err))?;

        let swapchain = swapchain.ok_or_else(|| format_err!("[D3D11] No swap chain."))?;
        let device = device.ok_or_else(|| format_err!("[D3D11] No device."))?;
        let context = context.ok_or_else(|| format_err!("[D3D11] No device context."))?;

        let version = types::feature_level_version(level);
        let dialect = Dialect::resolve(Language::Hlsl, version)?;
        info!(
            "D3D11Visitor feature level {:?}, dialect {}.",
            level.0, dialect
        );

        let mut visitor = D3D11Visitor {
            views: None,
            input_layouts: HashMap::new(),
            shaders: DataVec::new(),
            vertex_arrays: DataVec::new(),
            vertex_buffers: DataVec::new(),
            index_buffers: DataVec::new(),
            context,
            swapchain,
            device,
            dialect,
            vsync,
            multisample,
            window,
        };

        visitor.create_views(w, h)?;
        visitor.set_viewport(Vector2::new(0, 0), Vector2::new(w, h))?;
        Ok(visitor)
    }

    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    unsafe fn create_views(&mut self, w: u32, h: u32) -> Result<()> {
        let backbuffer: ID3D11Texture2D = self
            .swapchain
            .GetBuffer(0)
            .map_err(|err| format_err!("[D3D11] {}", err))?;

        let mut rtv = None;
        self.device
            .CreateRenderTargetView(&backbuffer, None, Some(&mut rtv))
            .map_err(|err| format_err!("[D3D11] {}", err))?;

        let desc = D3D11_TEXTURE2D_DESC {
            Width: w.max(1),
            Height: h.max(1),
            MipLevels: 1,
            ArraySize: 1,
            Format: DXGI_FORMAT_D24_UNORM_S8_UINT,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: u32::from(self.multisample.max(1)),
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_DEPTH_STENCIL.0 as u32,
            CPUAccessFlags: 0,
            MiscFlags: 0,
        };

        let mut depth = None;
        self.device
            .CreateTexture2D(&desc, None, Some(&mut depth))
            .map_err(|err| format_err!("[D3D11] {}", err))?;
        let depth = depth.ok_or_else(|| format_err!("[D3D11] No depth buffer."))?;

        let mut dsv = None;
        self.device
            .CreateDepthStencilView(&depth, None, Some(&mut dsv))
            .map_err(|err| format_err!("[D3D11] {}", err))?;

        let views = Views {
            rtv: rtv.ok_or_else(|| format_err!("[D3D11] No render target view."))?,
            dsv: dsv.ok_or_else(|| format_err!("[D3D11] No depth stencil view."))?,
        };

        self.context
            .OMSetRenderTargets(Some(&[Some(views.rtv.clone())]), &views.dsv);
        self.views = Some(views);
        Ok(())
    }

    unsafe fn create_buffer(
        &self,
        bind: D3D11_BIND_FLAG,
        hint: BufferHint,
        len: usize,
        data: Option<&[u8]>,
    ) -> Result<ID3D11Buffer> {
        // Immutable buffers need their content upfront.
        let usage = match (hint, data) {
            (BufferHint::Immutable, Some(_)) => D3D11_USAGE_IMMUTABLE,
            _ => D3D11_USAGE_DEFAULT,
        };

        let desc = D3D11_BUFFER_DESC {
            ByteWidth: len.max(1) as u32,
            Usage: usage,
            BindFlags: bind.0 as u32,
            CPUAccessFlags: 0,
            MiscFlags: 0,
            StructureByteStride: 0,
        };

        let init = data.map(|v| D3D11_SUBRESOURCE_DATA {
            pSysMem: v.as_ptr() as *const c_void,
            SysMemPitch: 0,
            SysMemSlicePitch: 0,
        });

        let mut buffer = None;
        self.device
            .CreateBuffer(
                &desc,
                init.as_ref().map(|v| v as *const _),
                Some(&mut buffer),
            )
            .map_err(|err| format_err!("[D3D11] Failed to create buffer: {}", err))?;

        buffer.ok_or_else(|| format_err!("[D3D11] Failed to create buffer."))
    }

    unsafe fn update_buffer(&self, buffer: &ID3D11Buffer, offset: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        let region = D3D11_BOX {
            left: offset as u32,
            right: (offset + data.len()) as u32,
            top: 0,
            bottom: 1,
            front: 0,
            back: 1,
        };

        self.context.UpdateSubresource(
            buffer,
            0,
            Some(&region),
            data.as_ptr() as *const c_void,
            0,
            0,
        );
    }

    unsafe fn input_layout(
        &mut self,
        shader: ShaderHandle,
        vertex_array: VertexArrayHandle,
    ) -> Result<ID3D11InputLayout> {
        if let Some(v) = self.input_layouts.get(&(shader, vertex_array)) {
            return Ok(v.clone());
        }

        let sp = self
            .shaders
            .get(shader)
            .ok_or_else(|| format_err!("{} is invalid.", shader))?;

        let va = self
            .vertex_arrays
            .get(vertex_array)
            .ok_or_else(|| format_err!("{} is invalid.", vertex_array))?;

        let (_, layout) = self
            .vertex_buffers
            .get(va.vertices)
            .ok_or_else(|| format_err!("{} is invalid.", va.vertices))?;

        let mut names = Vec::new();
        let mut elements = Vec::new();
        for slot in sp.params.layout.attributes() {
            let element = layout
                .element(slot.attribute)
                .ok_or_else(|| format_err!("{} is missing.", slot.attribute))?;

            let (name, index) = types::split_semantic(slot.attribute.semantic());
            names.push(CString::new(name)?);
            elements.push((index, element));
        }

        let mut descs = Vec::with_capacity(elements.len());
        for (name, &(index, element)) in names.iter().zip(&elements) {
            descs.push(D3D11_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(name.as_ptr() as *const u8),
                SemanticIndex: index,
                Format: types::vertex_format(element.format, element.size, element.normalized)?,
                InputSlot: 0,
                AlignedByteOffset: u32::from(element.offset),
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            });
        }

        let mut input = None;
        self.device
            .CreateInputLayout(&descs, &sp.vs_bytecode, Some(&mut input))
            .map_err(|err| format_err!("[D3D11] Failed to create input layout: {}", err))?;

        let input = input.ok_or_else(|| format_err!("[D3D11] No input layout."))?;
        self.input_layouts
            .insert((shader, vertex_array), input.clone());
        Ok(input)
    }
}

impl Visitor for D3D11Visitor {
    unsafe fn make_current(&self) -> Result<()> {
        // A D3D11 device is not bound to threads.
        Ok(())
    }

    unsafe fn create_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        params: &VertexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let len = params.len();
        let buffer = self.create_buffer(D3D11_BIND_VERTEX_BUFFER, params.hint, len, data)?;
        self.vertex_buffers
            .create(handle, (D3D11Buffer { buffer, len }, params.layout.clone()));
        Ok(())
    }

    unsafe fn update_vertex_buffer(
        &mut self,
        handle: VertexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        let (vb, _) = self
            .vertex_buffers
            .get(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        if offset + data.len() > vb.len {
            bail!("[D3D11] Out of bounds.");
        }

        self.update_buffer(&vb.buffer, offset, data);
        Ok(())
    }

    unsafe fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()> {
        self.vertex_buffers
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;
        Ok(())
    }

    unsafe fn create_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        params: &IndexBufferParams,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let len = params.len();
        let buffer = self.create_buffer(D3D11_BIND_INDEX_BUFFER, params.hint, len, data)?;
        self.index_buffers
            .create(handle, (D3D11Buffer { buffer, len }, params.format));
        Ok(())
    }

    unsafe fn update_index_buffer(
        &mut self,
        handle: IndexBufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        let (ib, _) = self
            .index_buffers
            .get(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        if offset + data.len() > ib.len {
            bail!("[D3D11] Out of bounds.");
        }

        self.update_buffer(&ib.buffer, offset, data);
        Ok(())
    }

    unsafe fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()> {
        self.index_buffers
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;
        Ok(())
    }

    unsafe fn create_vertex_array(
        &mut self,
        handle: VertexArrayHandle,
        params: &VertexArrayParams,
    ) -> Result<()> {
        // Input layouts depend on the shader too, they are built lazily on draw.
        self.vertex_arrays.create(handle, *params);
        Ok(())
    }

    unsafe fn delete_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()> {
        self.vertex_arrays
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        self.input_layouts.retain(|k, _| k.1 != handle);
        Ok(())
    }

    unsafe fn create_shader(
        &mut self,
        handle: ShaderHandle,
        params: &ShaderParams,
        source: &ShaderSource,
    ) -> Result<()> {
        let vs_bytecode = compile(&source.vs, &self.dialect.target(Stage::Vertex))?;
        let ps_bytecode = compile(&source.fs, &self.dialect.target(Stage::Pixel))?;

        let mut vs = None;
        self.device
            .CreateVertexShader(&vs_bytecode, None::<&ID3D11ClassLinkage>, Some(&mut vs))
            .map_err(|err| format_err!("[D3D11] Failed to create vertex shader: {}", err))?;

        let mut ps = None;
        self.device
            .CreatePixelShader(&ps_bytecode, None::<&ID3D11ClassLinkage>, Some(&mut ps))
            .map_err(|err| format_err!("[D3D11] Failed to create pixel shader: {}", err))?;

        let cbuffer = if params.block.is_empty() {
            None
        } else {
            let size = params.block.size();
            let buffer = self.create_buffer(D3D11_BIND_CONSTANT_BUFFER, BufferHint::Stream, size, None)?;
            Some((buffer, vec![0; size]))
        };

        let shader = D3D11Shader {
            vs: vs.ok_or_else(|| format_err!("[D3D11] No vertex shader."))?,
            ps: ps.ok_or_else(|| format_err!("[D3D11] No pixel shader."))?,
            vs_bytecode,
            cbuffer,
            params: params.clone(),
        };

        self.shaders.create(handle, shader);
        Ok(())
    }

    unsafe fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        self.shaders
            .free(handle)
            .ok_or_else(|| format_err!("{} is invalid.", handle))?;

        self.input_layouts.retain(|k, _| k.0 != handle);
        Ok(())
    }

    unsafe fn clear(&mut self, mask: ClearMask, color: Color) -> Result<()> {
        let views = self
            .views
            .as_ref()
            .ok_or_else(|| format_err!("[D3D11] Back buffer is not available."))?;

        if mask.contains(ClearMask::COLOR) {
            let rgba = [color.r, color.g, color.b, color.a];
            self.context.ClearRenderTargetView(&views.rtv, rgba.as_ptr());
        }

        let mut flags = 0;
        if mask.contains(ClearMask::DEPTH) {
            flags |= D3D11_CLEAR_DEPTH.0 as u32;
        }

        if mask.contains(ClearMask::STENCIL) {
            flags |= D3D11_CLEAR_STENCIL.0 as u32;
        }

        if flags != 0 {
            self.context.ClearDepthStencilView(&views.dsv, flags, 1.0, 0);
        }

        Ok(())
    }

    unsafe fn set_viewport(&mut self, position: Vector2<i32>, size: Vector2<u32>) -> Result<()> {
        let viewport = D3D11_VIEWPORT {
            TopLeftX: position.x as f32,
            TopLeftY: position.y as f32,
            Width: size.x as f32,
            Height: size.y as f32,
            MinDepth: 0.0,
            MaxDepth: 1.0,
        };

        self.context.RSSetViewports(Some(&[viewport]));
        Ok(())
    }

    unsafe fn resize(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        // Every reference to the back buffer must be released before resizing.
        self.context
            .OMSetRenderTargets(None, None::<&ID3D11DepthStencilView>);
        self.views = None;

        self.swapchain
            .ResizeBuffers(
                0,
                dimensions.x.max(1),
                dimensions.y.max(1),
                DXGI_FORMAT_UNKNOWN,
                Default::default(),
            )
            .map_err(|err| format_err!("[D3D11] Failed to resize swap chain: {}", err))?;

        self.create_views(dimensions.x, dimensions.y)?;
        self.set_viewport(Vector2::new(0, 0), dimensions)
    }

    unsafe fn draw(&mut self, call: DrawCall) -> Result<()> {
        let input = self.input_layout(call.shader, call.vertex_array)?;

        let va = *self
            .vertex_arrays
            .get(call.vertex_array)
            .ok_or_else(|| format_err!("{} is invalid.", call.vertex_array))?;

        let (vb, layout) = self
            .vertex_buffers
            .get(va.vertices)
            .ok_or_else(|| format_err!("{} is invalid.", va.vertices))?;

        let shader = self
            .shaders
            .get_mut(call.shader)
            .ok_or_else(|| format_err!("{} is invalid.", call.shader))?;

        if let Some((ref cbuffer, ref mut buf)) = shader.cbuffer {
            for (slot, value) in shader.params.layout.uniforms().iter().zip(call.uniforms) {
                // Textures are not managed by the context, sampler units are ignored here.
                if slot.data_type != DataType::Sampler2D {
                    shader.params.block.write(buf, &slot.name, value)?;
                }
            }

            self.context
                .UpdateSubresource(cbuffer, 0, None, buf.as_ptr() as *const c_void, 0, 0);

            let buffers = [Some(cbuffer.clone())];
            self.context.VSSetConstantBuffers(0, Some(&buffers));
            self.context.PSSetConstantBuffers(0, Some(&buffers));
        }

        self.context.IASetInputLayout(&input);
        self.context.IASetPrimitiveTopology(types::topology(call.primitive));

        let stride = u32::from(layout.stride());
        let offset = 0u32;
        self.context.IASetVertexBuffers(
            0,
            1,
            Some(&Some(vb.buffer.clone())),
            Some(&stride),
            Some(&offset),
        );

        self.context.VSSetShader(&shader.vs, None);
        self.context.PSSetShader(&shader.ps, None);

        if call.indexed {
            let indices = va
                .indices
                .ok_or_else(|| format_err!("{} has no index buffer.", call.vertex_array))?;

            let (ib, format) = self
                .index_buffers
                .get(indices)
                .ok_or_else(|| format_err!("{} is invalid.", indices))?;

            self.context
                .IASetIndexBuffer(&ib.buffer, types::index_format(*format), 0);
            self.context.DrawIndexed(call.count, call.first, 0);
        } else {
            self.context.Draw(call.count, call.first);
        }

        Ok(())
    }

    unsafe fn swap_buffers(&mut self) -> Result<()> {
        let interval = if self.vsync { 1 } else { 0 };
        self.swapchain
            .Present(interval, Default::default())
            .ok()
            .map_err(|err| format_err!("[D3D11] Failed to present: {}", err))?;
        Ok(())
    }
}

fn physical_dimensions(window: &glutin::Window) -> (u32, u32) {
    let dpi = window.get_hidpi_factor();
    window
        .get_inner_size()
        .map(|v| v.to_physical(dpi))
        .map(|v| (v.width as u32, v.height as u32))
        .unwrap_or((1, 1))
}

unsafe fn compile(source: &str, target: &str) -> Result<Vec<u8>> {
    let entry = CString::new("main")?;
    let target = CString::new(target)?;

    let mut blob: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;

    let hr = D3DCompile(
        source.as_ptr() as *const c_void,
        source.len(),
        None,
        None,
        None,
        PCSTR(entry.as_ptr() as *const u8),
        PCSTR(target.as_ptr() as *const u8),
        D3DCOMPILE_ENABLE_STRICTNESS,
        0,
        &mut blob,
        Some(&mut errors),
    );

    if hr.is_err() {
        let log = errors
            .map(|v| blob_bytes(&v))
            .map(|v| String::from_utf8_lossy(&v).into_owned())
            .unwrap_or_default();

        bail!("[D3D11] Failed to compile shader: {}\n{}", log, source);
    }

    let blob = blob.ok_or_else(|| format_err!("[D3D11] Shader compilation gave no output."))?;
    Ok(blob_bytes(&blob))
}

unsafe fn blob_bytes(blob: &ID3DBlob) -> Vec<u8> {
    std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()).to_vec()
}
