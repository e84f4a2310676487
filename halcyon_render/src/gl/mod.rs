//! GL driver seam
//!
//! `Gl` is the subset of OpenGL ES entry points the render layer issues.
//! The core crate never talks to a driver directly; the `halcyon_render_gles`
//! crate implements this trait on top of `glow`, and tests use a recording
//! mock. Handles are typed and non-zero: `None` stands for the GL "0" object
//! (default framebuffer, null program, unbound texture).

use std::fmt;
use std::num::NonZeroU32;
use bitflags::bitflags;

use crate::engine::Engine;
use crate::log::LogSeverity;

#[cfg(test)]
pub(crate) mod mock_gl;

// ============================================================================
// Handles
// ============================================================================

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Wrap a raw GL name, `None` for the reserved name 0
            pub fn new(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            /// The raw GL name
            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gl_handle!(
    /// GL texture name
    TextureId
);
gl_handle!(
    /// GL framebuffer object name
    FramebufferId
);
gl_handle!(
    /// GL program name
    ProgramId
);
gl_handle!(
    /// GL shader object name
    ShaderId
);

/// Location of an active uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

// ============================================================================
// Enums
// ============================================================================

/// Sampler target of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// GL_TEXTURE_2D
    Texture2D,
    /// GL_TEXTURE_EXTERNAL_OES (EGLImage-backed, e.g. dmabuf imports)
    External,
}

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

/// A texture parameter together with its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexParameter {
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
}

/// Framebuffer binding point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferTarget {
    /// GL_FRAMEBUFFER (read and draw)
    Framebuffer,
    /// GL_DRAW_FRAMEBUFFER
    Draw,
}

/// Result of glCheckFramebufferStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    /// Raw status enum reported by the driver
    Incomplete(u32),
}

/// Server-side capability toggled with glEnable/glDisable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Blend,
    ScissorTest,
}

/// Blend factor for glBlendFunc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Primitive assembly mode for glDrawArrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

bitflags! {
    /// Buffers cleared by glClear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Client-side vertex data handed to glVertexAttribPointer
///
/// The slice type carries the GL component type (GL_FLOAT, GL_UNSIGNED_BYTE).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttribData<'a> {
    Float(&'a [f32]),
    UnsignedByte(&'a [u8]),
}

impl AttribData<'_> {
    /// Number of scalar components in the slice
    pub fn len(&self) -> usize {
        match self {
            AttribData::Float(data) => data.len(),
            AttribData::UnsignedByte(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error reported by glGetError
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    Unknown(u32),
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlError::InvalidEnum => write!(f, "GL_INVALID_ENUM"),
            GlError::InvalidValue => write!(f, "GL_INVALID_VALUE"),
            GlError::InvalidOperation => write!(f, "GL_INVALID_OPERATION"),
            GlError::InvalidFramebufferOperation => write!(f, "GL_INVALID_FRAMEBUFFER_OPERATION"),
            GlError::OutOfMemory => write!(f, "GL_OUT_OF_MEMORY"),
            GlError::Unknown(code) => write!(f, "UNKNOWN GL ERROR 0x{:x}", code),
        }
    }
}

// ============================================================================
// Gl trait
// ============================================================================

/// The GL entry points used by the render layer
///
/// Every method assumes a current context, i.e. it is only called while a
/// `RenderPass` is open (or during `Renderer` setup/teardown, which opens one).
pub trait Gl {
    /// glGetError; `None` means GL_NO_ERROR
    fn get_error(&self) -> Option<GlError>;

    // ===== Textures =====

    fn create_texture(&self) -> Result<TextureId, String>;
    fn delete_texture(&self, texture: TextureId);
    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureId>);
    fn tex_parameter(&self, target: TextureTarget, parameter: TexParameter);
    /// (Re)specify storage of the bound 2D texture as uninitialized RGBA8
    fn tex_image_2d_rgba(&self, width: i32, height: i32);
    /// Select texture unit `GL_TEXTURE0 + unit`
    fn active_texture(&self, unit: u32);

    // ===== Framebuffers =====

    fn create_framebuffer(&self) -> Result<FramebufferId, String>;
    fn delete_framebuffer(&self, framebuffer: FramebufferId);
    fn bind_framebuffer(&self, target: FramebufferTarget, framebuffer: Option<FramebufferId>);
    /// Attach a 2D texture as color attachment 0 of the bound framebuffer
    fn framebuffer_texture_2d(&self, texture: TextureId);
    fn check_framebuffer_status(&self) -> FramebufferStatus;

    // ===== Shaders and programs =====

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, String>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: Option<ProgramId>);

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    fn uniform_1_i32(&self, location: Option<UniformLocation>, value: i32);
    fn uniform_1_f32(&self, location: Option<UniformLocation>, value: f32);
    fn uniform_2_f32(&self, location: Option<UniformLocation>, x: f32, y: f32);
    fn uniform_4_f32(&self, location: Option<UniformLocation>, value: [f32; 4]);
    /// Column-major, not transposed
    fn uniform_matrix_4_f32(&self, location: Option<UniformLocation>, value: &[f32; 16]);

    // ===== Vertex attributes =====

    fn enable_vertex_attrib_array(&self, location: u32);
    fn disable_vertex_attrib_array(&self, location: u32);
    fn vertex_attrib_pointer(&self, location: u32, size: i32, stride: i32, data: AttribData<'_>);
    fn vertex_attrib_divisor(&self, location: u32, divisor: u32);

    // ===== Fixed function state =====

    fn enable(&self, capability: Capability);
    fn disable(&self, capability: Capability);
    fn blend_func(&self, src: BlendFactor, dst: BlendFactor);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: ClearMask);
    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32);

    // ===== Teardown =====

    /// Free objects the backend created on its own behalf (e.g. vertex
    /// buffers); called by `Renderer::shutdown()` inside its last pass
    fn release_backend_resources(&self) {}
}

/// Upper bound on errors drained after a single call; a lost context can
/// report errors forever.
const MAX_DRAINED_ERRORS: usize = 8;

/// Drain and log pending GL errors for the call `call` issued at `file:line`
///
/// Does nothing unless `Engine::gl_error_checks_enabled()`. Errors are
/// reported, never recovered: the process keeps running.
pub fn check_error(gl: &dyn Gl, call: &str, file: &'static str, line: u32) {
    if !Engine::gl_error_checks_enabled() {
        return;
    }

    for _ in 0..MAX_DRAINED_ERRORS {
        match gl.get_error() {
            Some(err) => Engine::log_detailed(
                LogSeverity::Error,
                "halcyon::gl",
                format!("{} failed: {}", call, err),
                file,
                line,
            ),
            None => break,
        }
    }
}

/// Issue a GL call and check for driver errors afterwards
///
/// ```ignore
/// gl_call!(gl, bind_texture(TextureTarget::Texture2D, Some(texture)));
/// let status = gl_call!(gl, check_framebuffer_status());
/// ```
#[macro_export]
macro_rules! gl_call {
    ($gl:expr, $method:ident ( $($arg:expr),* $(,)? )) => {{
        let gl: &dyn $crate::gl::Gl = $gl;
        let result = gl.$method($($arg),*);
        $crate::gl::check_error(gl, stringify!($method), file!(), line!());
        result
    }};
}

#[cfg(test)]
#[path = "gl_tests.rs"]
mod tests;
