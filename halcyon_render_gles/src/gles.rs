/// GlesContext - `Gl` implementation on top of a `glow` OpenGL ES context

use std::cell::RefCell;
use glow::HasContext;
use rustc_hash::FxHashMap;

use halcyon_render::halcyon::RendererConfig;
use halcyon_render::halcyon::gl::{
    Gl, GlError, TextureId, FramebufferId, ProgramId, ShaderId, UniformLocation,
    TextureTarget, TexParameter, FramebufferTarget, FramebufferStatus,
    Capability, BlendFactor, DrawMode, ShaderStage, ClearMask, AttribData,
};
use halcyon_render::{engine_debug, engine_error, engine_info};

use crate::gles_convert as convert;

/// OpenGL ES 2/3 driver for the render layer
///
/// Client-side vertex arrays are uploaded to one scratch buffer object per
/// attribute location, re-filled on every `vertex_attrib_pointer` call, so
/// the same code runs on core-profile style drivers that reject client
/// pointers. Every call assumes the wrapped context is current.
pub struct GlesContext {
    gl: glow::Context,
    scratch_buffers: RefCell<FxHashMap<u32, glow::Buffer>>,
}

impl GlesContext {
    /// Wrap a context created by the GPU context provider
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        engine_info!(
            "halcyon::gles",
            "GLES context {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );

        Self {
            gl,
            scratch_buffers: RefCell::new(FxHashMap::default()),
        }
    }

    /// Renderer configuration for this backend
    ///
    /// GL error checks are on in debug builds and whenever the
    /// `gl-error-checks` feature is enabled.
    pub fn renderer_config() -> RendererConfig {
        RendererConfig {
            check_gl_errors: cfg!(debug_assertions) || cfg!(feature = "gl-error-checks"),
            ..RendererConfig::default()
        }
    }

    /// The wrapped `glow` context
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Delete the scratch vertex buffers; the context must be current
    ///
    /// `Renderer::shutdown()` runs this through the `Gl` seam.
    pub fn release_scratch_buffers(&self) {
        let mut buffers = self.scratch_buffers.borrow_mut();
        for (_, buffer) in buffers.drain() {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    fn scratch_buffer(&self, location: u32) -> Result<glow::Buffer, String> {
        let mut buffers = self.scratch_buffers.borrow_mut();
        if let Some(buffer) = buffers.get(&location) {
            return Ok(*buffer);
        }

        let buffer = unsafe { self.gl.create_buffer()? };
        engine_debug!("halcyon::gles", "Scratch vertex buffer for attribute {}", location);
        buffers.insert(location, buffer);
        Ok(buffer)
    }
}

// ===== Handle conversions =====

fn native_texture(texture: TextureId) -> glow::Texture {
    glow::NativeTexture(texture.0)
}

fn native_framebuffer(framebuffer: FramebufferId) -> glow::Framebuffer {
    glow::NativeFramebuffer(framebuffer.0)
}

fn native_program(program: ProgramId) -> glow::Program {
    glow::NativeProgram(program.0)
}

fn native_shader(shader: ShaderId) -> glow::Shader {
    glow::NativeShader(shader.0)
}

fn native_location(location: Option<UniformLocation>) -> Option<glow::UniformLocation> {
    location.map(|l| glow::NativeUniformLocation(l.0))
}

impl Gl for GlesContext {
    fn get_error(&self) -> Option<GlError> {
        convert::gl_error(unsafe { self.gl.get_error() })
    }

    // ===== Textures =====

    fn create_texture(&self) -> Result<TextureId, String> {
        let texture = unsafe { self.gl.create_texture()? };
        Ok(TextureId(texture.0))
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { self.gl.delete_texture(native_texture(texture)) };
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>) {
        unsafe {
            self.gl.bind_texture(convert::texture_target(target), texture.map(native_texture));
        }
    }

    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter) {
        let (pname, value) = convert::tex_parameter(parameter);
        unsafe { self.gl.tex_parameter_i32(convert::texture_target(target), pname, value) };
    }

    fn tex_image_2d_rgba(&self, width: i32, height: i32) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    // ===== Framebuffers =====

    fn create_framebuffer(&self) -> Result<FramebufferId, String> {
        let framebuffer = unsafe { self.gl.create_framebuffer()? };
        Ok(FramebufferId(framebuffer.0))
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferId) {
        unsafe { self.gl.delete_framebuffer(native_framebuffer(framebuffer)) };
    }

    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        unsafe {
            self.gl.bind_framebuffer(
                convert::framebuffer_target(target),
                framebuffer.map(native_framebuffer),
            );
        }
    }

    fn framebuffer_texture_2d(&self, texture: TextureId) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(native_texture(texture)),
                0,
            );
        }
    }

    fn check_framebuffer_status(&self) -> FramebufferStatus {
        convert::framebuffer_status(unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) })
    }

    // ===== Shaders and programs =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let shader = unsafe { self.gl.create_shader(convert::shader_stage(stage))? };
        Ok(ShaderId(shader.0))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        unsafe { self.gl.shader_source(native_shader(shader), source) };
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { self.gl.compile_shader(native_shader(shader)) };
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        unsafe { self.gl.get_shader_compile_status(native_shader(shader)) }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        unsafe { self.gl.get_shader_info_log(native_shader(shader)) }
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(native_shader(shader)) };
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let program = unsafe { self.gl.create_program()? };
        Ok(ProgramId(program.0))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { self.gl.attach_shader(native_program(program), native_shader(shader)) };
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { self.gl.link_program(native_program(program)) };
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        unsafe { self.gl.get_program_link_status(native_program(program)) }
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        unsafe { self.gl.get_program_info_log(native_program(program)) }
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { self.gl.delete_program(native_program(program)) };
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { self.gl.use_program(program.map(native_program)) };
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(native_program(program), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(native_program(program), name) }
    }

    fn uniform_1_i32(&self, location: Option<UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(native_location(location).as_ref(), value) };
    }

    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32) {
        unsafe { self.gl.uniform_1_f32(native_location(location).as_ref(), value) };
    }

    fn uniform_2_f32(&self, location: Option<UniformLocation>, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(native_location(location).as_ref(), x, y) };
    }

    fn uniform_4_f32(&self, location: Option<UniformLocation>, value: [f32; 4]) {
        let [x, y, z, w] = value;
        unsafe { self.gl.uniform_4_f32(native_location(location).as_ref(), x, y, z, w) };
    }

    fn uniform_matrix_4_f32(&self, location: Option<UniformLocation>, value: &[f32; 16]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(native_location(location).as_ref(), false, value);
        }
    }

    // ===== Vertex attributes =====

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(location) };
    }

    fn vertex_attrib_pointer(&self, location: u32, size: i32, stride: i32, data: AttribData<'_>) {
        let buffer = match self.scratch_buffer(location) {
            Ok(buffer) => buffer,
            Err(err) => {
                engine_error!(
                    "halcyon::gles",
                    "Failed to create vertex buffer for attribute {}: {}",
                    location,
                    err
                );
                return;
            }
        };

        let (bytes, data_type): (&[u8], u32) = match data {
            AttribData::Float(values) => (bytemuck::cast_slice(values), glow::FLOAT),
            AttribData::UnsignedByte(values) => (values, glow::UNSIGNED_BYTE),
        };

        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STREAM_DRAW);
            self.gl.vertex_attrib_pointer_f32(location, size, data_type, false, stride, 0);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn vertex_attrib_divisor(&self, location: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(location, divisor) };
    }

    // ===== Fixed function state =====

    fn enable(&self, capability: Capability) {
        unsafe { self.gl.enable(convert::capability(capability)) };
    }

    fn disable(&self, capability: Capability) {
        unsafe { self.gl.disable(convert::capability(capability)) };
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.blend_func(convert::blend_factor(src), convert::blend_factor(dst)) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(convert::clear_mask(mask)) };
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(convert::draw_mode(mode), first, count) };
    }

    // ===== Teardown =====

    fn release_backend_resources(&self) {
        self.release_scratch_buffers();
    }
}
