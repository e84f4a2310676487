/// Texture - borrowed view of a GPU texture for the draw routines.
///
/// A `Texture` never owns its GL object. It only records how the texture
/// must be sampled: which program variant (`TextureKind`), which sampler
/// target, and whether rows are stored bottom-up.

use crate::error::{Error, Result};
use crate::gl::{TextureId, TextureTarget};

/// Channel layout / import mechanism of a texture
///
/// Each compiled kind gets its own program variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// 2D texture with alpha
    Rgba,
    /// 2D texture whose alpha channel must be ignored
    Rgbx,
    /// EGLImage-backed texture sampled through `samplerExternalOES`
    External,
    /// Placeholder, no program can be activated for it
    Invalid,
}

impl TextureKind {
    /// Kinds a multi-variant program is compiled for, in slot order
    pub const COMPILED: [TextureKind; 3] = [
        TextureKind::Rgba,
        TextureKind::Rgbx,
        TextureKind::External,
    ];

    /// Index of the program variant for this kind
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            TextureKind::Rgba => Some(0),
            TextureKind::Rgbx => Some(1),
            TextureKind::External => Some(2),
            TextureKind::Invalid => None,
        }
    }
}

/// Attributes of a texture imported by the context provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedTextureAttributes {
    pub target: TextureTarget,
    pub handle: TextureId,
    pub has_alpha: bool,
    /// Rows already stored top-down by the importer
    pub inverted_y: bool,
}

/// A client buffer imported as a GPU texture by the context provider
/// (shm upload, dmabuf, EGLImage)
pub trait ImportedBuffer {
    /// Whether the buffer was imported by the GLES renderer
    fn is_gles(&self) -> bool;

    /// GLES attributes of the import; only meaningful when `is_gles()`
    fn gles_attributes(&self) -> ImportedTextureAttributes;
}

/// Texture view consumed by the draw routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub kind: TextureKind,
    pub target: TextureTarget,
    /// Sample with the Y axis flipped
    pub invert_y: bool,
    /// Borrowed GL name, `None` only for the placeholder
    pub handle: Option<TextureId>,
}

impl Texture {
    /// Plain RGBA 2D texture, sampled as stored
    pub fn from_handle(handle: TextureId) -> Self {
        Self {
            kind: TextureKind::Rgba,
            target: TextureTarget::Texture2D,
            invert_y: false,
            handle: Some(handle),
        }
    }

    /// Describe an imported client buffer
    ///
    /// Importers store rows top-down and flag it with `inverted_y`; this
    /// layer expects the opposite, hence the negation.
    pub fn from_imported(buffer: &dyn ImportedBuffer) -> Result<Self> {
        if !buffer.is_gles() {
            crate::engine_error!("halcyon::Texture", "Imported buffer is not a GLES texture");
            return Err(Error::InvalidResource(
                "imported buffer is not a GLES texture".to_string(),
            ));
        }

        let attribs = buffer.gles_attributes();
        let kind = match attribs.target {
            TextureTarget::Texture2D if attribs.has_alpha => TextureKind::Rgba,
            TextureTarget::Texture2D => TextureKind::Rgbx,
            TextureTarget::External => TextureKind::External,
        };

        Ok(Self {
            kind,
            target: attribs.target,
            invert_y: !attribs.inverted_y,
            handle: Some(attribs.handle),
        })
    }

    /// Texture of kind `Invalid` with no GL object
    pub fn placeholder() -> Self {
        Self {
            kind: TextureKind::Invalid,
            target: TextureTarget::Texture2D,
            invert_y: false,
            handle: None,
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
