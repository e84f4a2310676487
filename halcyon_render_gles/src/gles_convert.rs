/// Conversions from the typed `Gl` seam enums to raw GL enumerants

use halcyon_render::halcyon::gl::{
    TextureTarget, TextureWrap, TextureFilter, TexParameter, FramebufferTarget, FramebufferStatus,
    Capability, BlendFactor, DrawMode, ShaderStage, ClearMask, GlError,
};

/// GL_TEXTURE_EXTERNAL_OES (OES_EGL_image_external)
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

pub fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::External => TEXTURE_EXTERNAL_OES,
    }
}

fn wrap(wrap: TextureWrap) -> i32 {
    let value = match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        TextureWrap::Repeat => glow::REPEAT,
    };
    value as i32
}

fn filter(filter: TextureFilter) -> i32 {
    let value = match filter {
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::Nearest => glow::NEAREST,
    };
    value as i32
}

/// (pname, param) pair for glTexParameteri
pub fn tex_parameter(parameter: TexParameter) -> (u32, i32) {
    match parameter {
        TexParameter::WrapS(w) => (glow::TEXTURE_WRAP_S, wrap(w)),
        TexParameter::WrapT(w) => (glow::TEXTURE_WRAP_T, wrap(w)),
        TexParameter::MinFilter(f) => (glow::TEXTURE_MIN_FILTER, filter(f)),
        TexParameter::MagFilter(f) => (glow::TEXTURE_MAG_FILTER, filter(f)),
    }
}

pub fn framebuffer_target(target: FramebufferTarget) -> u32 {
    match target {
        FramebufferTarget::Framebuffer => glow::FRAMEBUFFER,
        FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
    }
}

pub fn framebuffer_status(status: u32) -> FramebufferStatus {
    if status == glow::FRAMEBUFFER_COMPLETE {
        FramebufferStatus::Complete
    } else {
        FramebufferStatus::Incomplete(status)
    }
}

pub fn capability(capability: Capability) -> u32 {
    match capability {
        Capability::Blend => glow::BLEND,
        Capability::ScissorTest => glow::SCISSOR_TEST,
    }
}

pub fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
    }
}

pub fn draw_mode(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::TriangleStrip => glow::TRIANGLE_STRIP,
        DrawMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

pub fn shader_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub fn clear_mask(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

/// glGetError result, `None` for GL_NO_ERROR
pub fn gl_error(code: u32) -> Option<GlError> {
    match code {
        glow::NO_ERROR => None,
        glow::INVALID_ENUM => Some(GlError::InvalidEnum),
        glow::INVALID_VALUE => Some(GlError::InvalidValue),
        glow::INVALID_OPERATION => Some(GlError::InvalidOperation),
        glow::INVALID_FRAMEBUFFER_OPERATION => Some(GlError::InvalidFramebufferOperation),
        glow::OUT_OF_MEMORY => Some(GlError::OutOfMemory),
        other => Some(GlError::Unknown(other)),
    }
}

#[cfg(test)]
#[path = "gles_convert_tests.rs"]
mod tests;
