/*!
# Halcyon Render - OpenGL ES Backend

OpenGL ES implementation of the `halcyon_render` driver seam.

This crate wraps a `glow` context created by the compositor's GPU context
provider and implements the `Gl` trait on top of it, mapping the typed seam
enums and handles onto raw GL enumerants and objects.

Client-side vertex arrays are uploaded through scratch buffers owned by the
`GlesContext`; `Renderer::shutdown()` (or dropping the renderer) deletes them
while the context is current.

## Example

```no_run
use std::rc::Rc;
use halcyon_render::halcyon::Renderer;
use halcyon_render::halcyon::render::ContextProvider;
use halcyon_render_gles::GlesContext;

fn build(gl: glow::Context, provider: Box<dyn ContextProvider>) -> halcyon_render::halcyon::Result<Renderer> {
    let backend = Rc::new(GlesContext::new(gl));
    Renderer::new(backend, provider, GlesContext::renderer_config())
}
```
*/

mod gles;
mod gles_convert;

pub use gles::GlesContext;
pub use gles_convert::TEXTURE_EXTERNAL_OES;
