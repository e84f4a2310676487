/// Framebuffers - offscreen render targets and output-bound targets.
///
/// `FramebufferBase` owns a framebuffer object plus its color texture and
/// nothing else. `Framebuffer` adds what is needed to draw an output into it:
/// the output-local geometry, the output transform and scale, and the
/// projection derived from them.
///
/// GPU objects are created lazily by `allocate()`, which must be called
/// inside a render pass. Nothing is destroyed on drop: GL objects can only be
/// deleted with a current context, so dropping an allocated framebuffer
/// leaks its objects and logs a warning. Call `release()` first.

use glam::Mat4;
use crate::gl::{
    Gl, FramebufferId, TextureId, TextureTarget, TexParameter, TextureWrap,
    TextureFilter, FramebufferTarget, FramebufferStatus, Capability,
};
use crate::geometry::{
    Rect, OutputTransform, output_matrix, geometry_to_damage, damage_to_framebuffer,
};
use crate::{gl_call, engine_debug, engine_error, engine_warn};

// ============================================================================
// FramebufferBase
// ============================================================================

/// Allocation state of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferState {
    /// No GPU objects
    Empty,
    /// Framebuffer object with a color texture of `width × height`
    Allocated {
        framebuffer: FramebufferId,
        texture: TextureId,
        width: i32,
        height: i32,
    },
    /// The platform default framebuffer (GL name 0) of an output. Owned by
    /// the output swap-chain: never resized or deleted here.
    Output {
        width: i32,
        height: i32,
    },
}

/// Framebuffer object plus color attachment
#[derive(Debug)]
pub struct FramebufferBase {
    state: FramebufferState,
}

impl Default for FramebufferBase {
    fn default() -> Self {
        Self::new()
    }
}

impl FramebufferBase {
    /// Create an empty framebuffer (no GPU objects yet)
    pub fn new() -> Self {
        Self { state: FramebufferState::Empty }
    }

    /// Wrap the default framebuffer of an output
    pub fn output(width: i32, height: i32) -> Self {
        Self { state: FramebufferState::Output { width, height } }
    }

    // ===== GETTERS =====

    pub fn state(&self) -> FramebufferState {
        self.state
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self.state, FramebufferState::Allocated { .. })
    }

    /// GL framebuffer to bind, `None` for the default framebuffer
    pub fn framebuffer(&self) -> Option<FramebufferId> {
        match self.state {
            FramebufferState::Allocated { framebuffer, .. } => Some(framebuffer),
            _ => None,
        }
    }

    /// Color attachment, `None` unless allocated
    pub fn texture(&self) -> Option<TextureId> {
        match self.state {
            FramebufferState::Allocated { texture, .. } => Some(texture),
            _ => None,
        }
    }

    /// Viewport width in pixels
    pub fn width(&self) -> i32 {
        self.size().0
    }

    /// Viewport height in pixels
    pub fn height(&self) -> i32 {
        self.size().1
    }

    fn size(&self) -> (i32, i32) {
        match self.state {
            FramebufferState::Empty => (0, 0),
            FramebufferState::Allocated { width, height, .. } => (width, height),
            FramebufferState::Output { width, height } => (width, height),
        }
    }

    // ===== ALLOCATION =====

    /// Make sure the framebuffer has `width × height` storage
    ///
    /// GPU objects are created on first use; texture storage is only
    /// re-specified when the size changes. On an output framebuffer only the
    /// recorded size changes.
    ///
    /// Returns `true` when storage was (re)created. Failures (object
    /// creation, incomplete framebuffer) are logged, leave the framebuffer
    /// `Empty` and return `false`.
    pub fn allocate(&mut self, gl: &dyn Gl, width: i32, height: i32) -> bool {
        let created = match self.state {
            FramebufferState::Output { .. } => {
                self.state = FramebufferState::Output { width, height };
                false
            }
            FramebufferState::Empty => self.create_objects(gl, width, height),
            FramebufferState::Allocated { framebuffer, texture, width: old_w, height: old_h } => {
                if old_w == width && old_h == height {
                    false
                } else {
                    gl_call!(gl, bind_texture(TextureTarget::Texture2D, Some(texture)));
                    gl_call!(gl, tex_image_2d_rgba(width, height));
                    gl_call!(gl, bind_framebuffer(FramebufferTarget::Framebuffer, Some(framebuffer)));
                    self.state = FramebufferState::Allocated { framebuffer, texture, width, height };
                    engine_debug!(
                        "halcyon::Framebuffer",
                        "Resized framebuffer {} to {}x{}",
                        framebuffer.raw(),
                        width,
                        height
                    );
                    self.check_complete(gl)
                }
            }
        };

        gl_call!(gl, bind_texture(TextureTarget::Texture2D, None));
        gl_call!(gl, bind_framebuffer(FramebufferTarget::Framebuffer, None));

        created
    }

    fn create_objects(&mut self, gl: &dyn Gl, width: i32, height: i32) -> bool {
        let framebuffer = match gl_call!(gl, create_framebuffer()) {
            Ok(framebuffer) => framebuffer,
            Err(err) => {
                engine_error!("halcyon::Framebuffer", "Failed to create framebuffer: {}", err);
                return false;
            }
        };

        let texture = match gl_call!(gl, create_texture()) {
            Ok(texture) => texture,
            Err(err) => {
                engine_error!("halcyon::Framebuffer", "Failed to create texture: {}", err);
                gl_call!(gl, delete_framebuffer(framebuffer));
                return false;
            }
        };

        let target = TextureTarget::Texture2D;
        gl_call!(gl, bind_texture(target, Some(texture)));
        gl_call!(gl, tex_parameter(target, TexParameter::WrapS(TextureWrap::ClampToEdge)));
        gl_call!(gl, tex_parameter(target, TexParameter::WrapT(TextureWrap::ClampToEdge)));
        gl_call!(gl, tex_parameter(target, TexParameter::MagFilter(TextureFilter::Linear)));
        gl_call!(gl, tex_parameter(target, TexParameter::MinFilter(TextureFilter::Linear)));
        gl_call!(gl, tex_image_2d_rgba(width, height));

        gl_call!(gl, bind_framebuffer(FramebufferTarget::Framebuffer, Some(framebuffer)));
        gl_call!(gl, framebuffer_texture_2d(texture));

        self.state = FramebufferState::Allocated { framebuffer, texture, width, height };
        engine_debug!(
            "halcyon::Framebuffer",
            "Allocated framebuffer {} ({}x{}, texture {})",
            framebuffer.raw(),
            width,
            height,
            texture.raw()
        );

        self.check_complete(gl)
    }

    /// Check the bound framebuffer; drop the objects when incomplete
    fn check_complete(&mut self, gl: &dyn Gl) -> bool {
        match gl_call!(gl, check_framebuffer_status()) {
            FramebufferStatus::Complete => true,
            FramebufferStatus::Incomplete(status) => {
                engine_error!(
                    "halcyon::Framebuffer",
                    "Failed to initialize framebuffer: status 0x{:x}",
                    status
                );
                self.release(gl);
                false
            }
        }
    }

    // ===== BINDING =====

    /// Bind as draw target and set the viewport to the framebuffer size
    pub fn bind(&self, gl: &dyn Gl) {
        if self.state == FramebufferState::Empty {
            engine_error!("halcyon::Framebuffer", "Cannot bind an unallocated framebuffer");
            return;
        }

        let (width, height) = self.size();
        gl_call!(gl, bind_framebuffer(FramebufferTarget::Draw, self.framebuffer()));
        gl_call!(gl, viewport(0, 0, width, height));
    }

    /// Restrict drawing to `rect` (framebuffer space, origin top-left)
    pub fn scissor(&self, gl: &dyn Gl, rect: Rect) {
        // GL scissor origin is bottom-left
        let y = self.height().saturating_sub(rect.bottom());
        gl_call!(gl, enable(Capability::ScissorTest));
        gl_call!(gl, scissor(rect.x, y, rect.width, rect.height));
    }

    // ===== LIFETIME =====

    /// Delete owned GPU objects and go back to `Empty`
    ///
    /// Output framebuffers are only forgotten, never deleted.
    pub fn release(&mut self, gl: &dyn Gl) {
        if let FramebufferState::Allocated { framebuffer, texture, .. } = self.state {
            gl_call!(gl, delete_framebuffer(framebuffer));
            gl_call!(gl, delete_texture(texture));
            engine_debug!("halcyon::Framebuffer", "Released framebuffer {}", framebuffer.raw());
        }

        self.reset();
    }

    /// Forget the GPU objects without deleting them
    pub fn reset(&mut self) {
        self.state = FramebufferState::Empty;
    }

    /// Take over `source`'s objects, releasing ours first
    ///
    /// `source` is left `Empty`.
    pub fn move_from(&mut self, gl: &dyn Gl, source: &mut FramebufferBase) {
        self.release(gl);
        self.state = source.state;
        source.reset();
    }
}

impl Drop for FramebufferBase {
    fn drop(&mut self) {
        if let FramebufferState::Allocated { framebuffer, texture, .. } = self.state {
            engine_warn!(
                "halcyon::Framebuffer",
                "Framebuffer {} (texture {}) dropped without release(), GPU objects leaked",
                framebuffer.raw(),
                texture.raw()
            );
        }
    }
}

// ============================================================================
// Framebuffer
// ============================================================================

/// Render target of an output (or of anything drawn like one)
#[derive(Debug)]
pub struct Framebuffer {
    pub base: FramebufferBase,

    /// Output-local geometry covered by the framebuffer
    pub geometry: Rect,

    /// Rotation/flip of the output
    pub transform: OutputTransform,

    /// Device pixels per geometry unit
    pub scale: f32,

    /// Matrix applied after the orthographic projection, normally
    /// `output_matrix(transform)`
    pub matrix: Mat4,

    /// `matrix` is not derived from `transform`; box conversions to
    /// framebuffer space are not supported then
    pub has_nonstandard_transform: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            base: FramebufferBase::new(),
            geometry: Rect::default(),
            transform: OutputTransform::Normal,
            scale: 1.0,
            matrix: Mat4::IDENTITY,
            has_nonstandard_transform: false,
        }
    }
}

impl Framebuffer {
    /// Framebuffer for an output with the given geometry, transform and scale
    pub fn for_output(
        base: FramebufferBase,
        geometry: Rect,
        transform: OutputTransform,
        scale: f32,
    ) -> Self {
        Self {
            base,
            geometry,
            transform,
            scale,
            matrix: output_matrix(transform),
            has_nonstandard_transform: false,
        }
    }

    /// Replace the output matrix by an arbitrary one
    pub fn set_nonstandard_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
        self.has_nonstandard_transform = true;
    }

    /// Scale a geometry-space box into damage space
    pub fn damage_box_from_geometry_box(&self, rect: Rect) -> Rect {
        geometry_to_damage(rect, self.scale)
    }

    /// Project a damage-space box onto the framebuffer
    ///
    /// Unsupported with a non-standard transform: logs and returns the empty box.
    pub fn framebuffer_box_from_damage_box(&self, rect: Rect) -> Rect {
        if self.has_nonstandard_transform {
            engine_error!(
                "halcyon::Framebuffer",
                "Box conversion with a non-standard transform is not supported"
            );
            return Rect::default();
        }

        damage_to_framebuffer(rect, self.transform, self.base.width(), self.base.height())
    }

    /// Project a geometry-space box onto the framebuffer
    pub fn framebuffer_box_from_geometry_box(&self, rect: Rect) -> Rect {
        self.framebuffer_box_from_damage_box(self.damage_box_from_geometry_box(rect))
    }

    /// Damage-space box covering the whole output
    pub fn damage_region(&self) -> Rect {
        self.damage_box_from_geometry_box(Rect::new(0, 0, self.geometry.width, self.geometry.height))
    }

    /// Projection from output geometry to normalized device coordinates,
    /// with the output matrix applied last
    pub fn orthographic_projection(&self) -> Mat4 {
        let g = self.geometry;
        let ortho = Mat4::orthographic_rh_gl(
            g.x as f32,
            (g.x + g.width) as f32,
            (g.y + g.height) as f32,
            g.y as f32,
            -1.0,
            1.0,
        );

        self.matrix * ortho
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
