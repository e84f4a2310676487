/// Renderer - render pass scoping and the built-in draw routines.
///
/// GL state may only be touched between the start and the end of a render
/// pass. `Renderer::begin*()` starts one and returns a `RenderPass` token that
/// mutably borrows the renderer: passes cannot nest, and the pass is ended
/// when the token is dropped (or `end()` is called).
///
/// Inside a pass the token offers the built-in routines (textured quads and
/// flat rectangles) plus access to the GL seam and the built-in programs for
/// custom drawing.

use std::rc::Rc;
use bitflags::bitflags;
use glam::{Mat4, Vec4};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::geometry::{Rect, GlGeometry};
use crate::gl::{
    Gl, FramebufferId, FramebufferTarget, Capability, BlendFactor, DrawMode, ClearMask, AttribData,
};
use super::context::ContextProvider;
use super::framebuffer::{Framebuffer, FramebufferBase};
use super::program::{Program, compile_program};
use super::shaders::{DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER, COLOR_RECT_FRAGMENT_SHADER};
use super::texture::{Texture, TextureKind};
use crate::{gl_call, engine_error, engine_info, engine_trace};

// ============================================================================
// Configuration
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    /// Follow every GL call with a glGetError() query
    pub check_gl_errors: bool,

    /// Viewport of passes opened without a target (`Renderer::begin()`)
    pub context_only_viewport: (i32, i32),
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            check_gl_errors: cfg!(debug_assertions),
            context_only_viewport: (10, 10),
        }
    }
}

bitflags! {
    /// Options of the textured quad routines
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextureFlags: u32 {
        /// Mirror the quad horizontally
        const INVERT_X = 1 << 0;
        /// Mirror the quad vertically
        const INVERT_Y = 1 << 1;
        /// Sample only the `tex_quad` sub-rectangle of the texture
        const USE_TEX_GEOMETRY = 1 << 2;
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Owner of the GL seam, the context provider and the built-in programs
pub struct Renderer {
    gl: Rc<dyn Gl>,
    provider: Box<dyn ContextProvider>,
    texture_program: Program,
    color_program: Program,
    current_output: Option<String>,
    config: RendererConfig,
    initialized: bool,
}

impl Renderer {
    /// Compile the built-in programs inside a context-only pass
    ///
    /// Fails with `Error::InitializationFailed` when the textured program
    /// has no variant at all or the flat-color program does not build.
    pub fn new(
        gl: Rc<dyn Gl>,
        provider: Box<dyn ContextProvider>,
        config: RendererConfig,
    ) -> Result<Self> {
        Engine::set_gl_error_checks(config.check_gl_errors);

        let mut renderer = Self {
            gl,
            provider,
            texture_program: Program::new(),
            color_program: Program::new(),
            current_output: None,
            config,
            initialized: true,
        };

        let (width, height) = config.context_only_viewport;
        renderer.start_pass(width, height, None);
        let result = renderer.compile_builtin_programs();
        renderer.end_pass();

        if let Err(err) = result {
            renderer.shutdown();
            return Err(err);
        }

        engine_info!("halcyon::Renderer", "Renderer initialized");
        Ok(renderer)
    }

    fn compile_builtin_programs(&mut self) -> Result<()> {
        let gl = self.gl.as_ref();

        let variants = self.texture_program.compile(gl, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER);
        if variants == 0 {
            engine_error!("halcyon::Renderer", "Texture program has no usable variant");
            return Err(Error::InitializationFailed(
                "texture program has no usable variant".to_string(),
            ));
        }

        let color = compile_program(gl, DEFAULT_VERTEX_SHADER, COLOR_RECT_FRAGMENT_SHADER)
            .map_err(|err| Error::InitializationFailed(format!("color program: {}", err)))?;
        self.color_program.set_simple(gl, color, TextureKind::Rgba)
    }

    /// Free the built-in programs and the backend's own objects inside a
    /// context-only pass
    ///
    /// Idempotent; also run on drop.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        let (width, height) = self.config.context_only_viewport;
        self.start_pass(width, height, None);
        self.texture_program.free_resources(self.gl.as_ref());
        self.color_program.free_resources(self.gl.as_ref());
        gl_call!(self.gl.as_ref(), release_backend_resources());
        self.end_pass();

        self.initialized = false;
        engine_info!("halcyon::Renderer", "Renderer shut down");
    }

    // ===== OUTPUT BINDING =====

    /// Mark `output` as being rendered; its surface keeps the context current
    pub fn bind_output(&mut self, output: impl Into<String>) {
        self.current_output = Some(output.into());
    }

    pub fn unbind_output(&mut self) {
        self.current_output = None;
    }

    pub fn current_output(&self) -> Option<&str> {
        self.current_output.as_deref()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    // ===== PASSES =====

    /// Open a context-only pass on the default framebuffer
    pub fn begin(&mut self) -> RenderPass<'_> {
        let (width, height) = self.config.context_only_viewport;
        self.begin_viewport(width, height, None)
    }

    /// Open a pass of `width × height` pixels targeting `framebuffer`
    /// (`None` for the default framebuffer)
    pub fn begin_viewport(
        &mut self,
        width: i32,
        height: i32,
        framebuffer: Option<FramebufferId>,
    ) -> RenderPass<'_> {
        self.start_pass(width, height, framebuffer);
        RenderPass { renderer: self }
    }

    /// Open a pass targeting `framebuffer` at its own size
    pub fn begin_framebuffer(&mut self, framebuffer: &FramebufferBase) -> RenderPass<'_> {
        self.begin_viewport(framebuffer.width(), framebuffer.height(), framebuffer.framebuffer())
    }

    fn start_pass(&mut self, width: i32, height: i32, framebuffer: Option<FramebufferId>) {
        if self.current_output.is_none() && !self.provider.is_current() {
            if let Err(err) = self.provider.make_current() {
                engine_error!("halcyon::Renderer", "Failed to make the GL context current: {}", err);
            }
        }

        engine_trace!("halcyon::Renderer", "Begin pass {}x{} on {:?}", width, height, framebuffer);
        self.provider.begin_frame(width, height);
        gl_call!(self.gl.as_ref(), bind_framebuffer(FramebufferTarget::Framebuffer, framebuffer));
    }

    fn end_pass(&mut self) {
        let gl = self.gl.as_ref();
        gl_call!(gl, bind_framebuffer(FramebufferTarget::Framebuffer, None));
        gl_call!(gl, disable(Capability::ScissorTest));
        self.provider.end_frame();
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// RenderPass
// ============================================================================

/// An open render pass; ends when dropped
pub struct RenderPass<'a> {
    renderer: &'a mut Renderer,
}

impl RenderPass<'_> {
    /// End the pass: reset scissor and framebuffer, close the frame
    pub fn end(self) {}

    /// The GL seam, for custom drawing inside the pass
    pub fn gl(&self) -> Rc<dyn Gl> {
        self.renderer.gl.clone()
    }

    /// Built-in textured program (one variant per texture kind)
    pub fn texture_program(&mut self) -> &mut Program {
        &mut self.renderer.texture_program
    }

    /// Built-in flat-color program (Rgba slot only)
    pub fn color_program(&mut self) -> &mut Program {
        &mut self.renderer.color_program
    }

    /// Clear the bound framebuffer
    pub fn clear(&self, color: Vec4, mask: ClearMask) {
        let gl = self.renderer.gl.as_ref();
        gl_call!(gl, clear_color(color.x, color.y, color.z, color.w));
        gl_call!(gl, clear(mask));
    }

    /// Draw `texture` on the quad `quad`, transformed by `transform`
    ///
    /// `tex_quad` selects the sampled sub-rectangle when
    /// `TextureFlags::USE_TEX_GEOMETRY` is set; otherwise the whole texture
    /// is used. The texture is tinted by `color` (premultiplied).
    pub fn render_transformed_texture(
        &mut self,
        texture: &Texture,
        quad: GlGeometry,
        tex_quad: GlGeometry,
        transform: &Mat4,
        color: Vec4,
        flags: TextureFlags,
    ) -> Result<()> {
        let mut q = quad;
        if flags.contains(TextureFlags::INVERT_Y) {
            std::mem::swap(&mut q.y1, &mut q.y2);
        }
        if flags.contains(TextureFlags::INVERT_X) {
            std::mem::swap(&mut q.x1, &mut q.x2);
        }

        let vertices = [q.x1, q.y2, q.x2, q.y2, q.x2, q.y1, q.x1, q.y1];

        let t = if flags.contains(TextureFlags::USE_TEX_GEOMETRY) {
            tex_quad
        } else {
            GlGeometry::unit()
        };
        let uvs = [t.x1, t.y2, t.x2, t.y2, t.x2, t.y1, t.x1, t.y1];

        let gl = self.renderer.gl.clone();
        let gl = gl.as_ref();
        let program = &mut self.renderer.texture_program;
        program.use_kind(gl, texture.kind)?;

        let result = draw_textured_quad(gl, program, texture, &vertices, &uvs, transform, color);

        program.deactivate(gl);
        result
    }

    /// Draw `texture` over the integer rectangle `rect`
    ///
    /// `USE_TEX_GEOMETRY` is ignored.
    pub fn render_transformed_texture_rect(
        &mut self,
        texture: &Texture,
        rect: Rect,
        transform: &Mat4,
        color: Vec4,
        flags: TextureFlags,
    ) -> Result<()> {
        let flags = flags - TextureFlags::USE_TEX_GEOMETRY;
        self.render_transformed_texture(
            texture,
            GlGeometry::from(rect),
            GlGeometry::default(),
            transform,
            color,
            flags,
        )
    }

    /// Draw `texture` over `rect` with the framebuffer's projection
    ///
    /// `rect` is in the coordinate space of `framebuffer.geometry`: passing
    /// the geometry itself covers the whole framebuffer.
    pub fn render_texture(
        &mut self,
        texture: &Texture,
        framebuffer: &Framebuffer,
        rect: Rect,
        color: Vec4,
        flags: TextureFlags,
    ) -> Result<()> {
        let projection = framebuffer.orthographic_projection();
        self.render_transformed_texture_rect(texture, rect, &projection, color, flags)
    }

    /// Fill `rect` with `color` (premultiplied)
    pub fn render_rectangle(&mut self, rect: Rect, color: Vec4, matrix: &Mat4) -> Result<()> {
        let (x, y) = (rect.x as f32, rect.y as f32);
        let (w, h) = (rect.width as f32, rect.height as f32);
        let vertices = [x, y + h, x + w, y + h, x + w, y, x, y];

        let gl = self.renderer.gl.clone();
        let gl = gl.as_ref();
        let program = &mut self.renderer.color_program;
        program.use_kind(gl, TextureKind::Rgba)?;

        let result = draw_flat_quad(gl, program, &vertices, matrix, color);

        program.deactivate(gl);
        result
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.renderer.end_pass();
    }
}

// ===== DRAW HELPERS =====
// Both expect `program` to be active; the caller deactivates it.

fn draw_textured_quad(
    gl: &dyn Gl,
    program: &mut Program,
    texture: &Texture,
    vertices: &[f32; 8],
    uvs: &[f32; 8],
    transform: &Mat4,
    color: Vec4,
) -> Result<()> {
    program.set_active_texture(gl, texture)?;
    program.attrib_pointer(gl, "position", 2, 0, AttribData::Float(vertices))?;
    program.attrib_pointer(gl, "uvPosition", 2, 0, AttribData::Float(uvs))?;
    program.uniform_matrix4f(gl, "MVP", transform)?;
    program.uniform4f(gl, "color", color)?;
    draw_blended_fan(gl);
    Ok(())
}

fn draw_flat_quad(
    gl: &dyn Gl,
    program: &mut Program,
    vertices: &[f32; 8],
    matrix: &Mat4,
    color: Vec4,
) -> Result<()> {
    program.attrib_pointer(gl, "position", 2, 0, AttribData::Float(vertices))?;
    program.uniform_matrix4f(gl, "MVP", matrix)?;
    program.uniform4f(gl, "color", color)?;
    draw_blended_fan(gl);
    Ok(())
}

/// Premultiplied alpha blending, 4-vertex triangle fan
fn draw_blended_fan(gl: &dyn Gl) {
    gl_call!(gl, enable(Capability::Blend));
    gl_call!(gl, blend_func(BlendFactor::One, BlendFactor::OneMinusSrcAlpha));
    gl_call!(gl, draw_arrays(DrawMode::TriangleFan, 0, 4));
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
