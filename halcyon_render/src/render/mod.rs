/// Render module - framebuffers, textures, shader programs and render passes

// Module declarations
pub mod context;
pub mod framebuffer;
pub mod program;
pub mod renderer;
pub mod shader_template;
pub mod shaders;
pub mod texture;

// Re-export the public surface
pub use context::ContextProvider;
pub use framebuffer::{Framebuffer, FramebufferBase, FramebufferState};
pub use program::{Program, compile_program, compile_shader};
pub use renderer::{Renderer, RenderPass, RendererConfig, TextureFlags};
pub use texture::{Texture, TextureKind, ImportedBuffer, ImportedTextureAttributes};
