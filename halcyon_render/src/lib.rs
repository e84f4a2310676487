/*!
# Halcyon Render

GPU rendering layer of the Halcyon compositor.

This crate owns everything between the compositor's scene logic and the
OpenGL ES driver: offscreen framebuffers, client textures, the multi-variant
shader programs that sample them, and the coordinate math that maps window
geometry onto rotated and scaled outputs.

## Architecture

- **Gl**: driver seam; implemented on `glow` by `halcyon_render_gles`
- **Renderer**: owns the built-in programs and opens render passes
- **RenderPass**: scoped token; GL state is only touched while one is alive
- **FramebufferBase / Framebuffer**: render targets and their coordinate spaces
- **Program**: one GL program per texture kind, built from a fragment template
- **Texture**: descriptor of a GL texture (kind, target, orientation)

Geometry helpers (`Rect`, `OutputTransform`, damage/framebuffer conversions)
are pure and usable without a GL context.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod gl;
pub mod geometry;
pub mod render;

// Main halcyon namespace module
pub mod halcyon {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Renderer entry points
    pub use crate::render::{Renderer, RenderPass, RendererConfig};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::render::*;
    }

    // Coordinate spaces and output transforms
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Driver seam, for backends and custom drawing
    pub mod gl {
        pub use crate::gl::*;
    }
}

// Re-export math library at crate root
pub use glam;
