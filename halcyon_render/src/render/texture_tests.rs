//! Unit tests for texture.rs

use crate::error::Error;
use crate::gl::{TextureId, TextureTarget};
use crate::render::texture::{
    Texture, TextureKind, ImportedBuffer, ImportedTextureAttributes,
};

struct FakeBuffer {
    gles: bool,
    attribs: ImportedTextureAttributes,
}

impl ImportedBuffer for FakeBuffer {
    fn is_gles(&self) -> bool {
        self.gles
    }

    fn gles_attributes(&self) -> ImportedTextureAttributes {
        self.attribs
    }
}

fn imported(target: TextureTarget, has_alpha: bool, inverted_y: bool) -> FakeBuffer {
    FakeBuffer {
        gles: true,
        attribs: ImportedTextureAttributes {
            target,
            handle: TextureId::new(42).unwrap(),
            has_alpha,
            inverted_y,
        },
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_handle_defaults() {
    let texture = Texture::from_handle(TextureId::new(5).unwrap());
    assert_eq!(texture.kind, TextureKind::Rgba);
    assert_eq!(texture.target, TextureTarget::Texture2D);
    assert!(!texture.invert_y);
    assert_eq!(texture.handle, TextureId::new(5));
}

#[test]
fn test_placeholder_has_no_handle() {
    let texture = Texture::placeholder();
    assert_eq!(texture.kind, TextureKind::Invalid);
    assert!(texture.handle.is_none());
}

#[test]
fn test_imported_2d_with_alpha_is_rgba() {
    let texture = Texture::from_imported(&imported(TextureTarget::Texture2D, true, false)).unwrap();
    assert_eq!(texture.kind, TextureKind::Rgba);
    assert_eq!(texture.target, TextureTarget::Texture2D);
    assert_eq!(texture.handle, TextureId::new(42));
}

#[test]
fn test_imported_2d_without_alpha_is_rgbx() {
    let texture = Texture::from_imported(&imported(TextureTarget::Texture2D, false, false)).unwrap();
    assert_eq!(texture.kind, TextureKind::Rgbx);
}

#[test]
fn test_imported_external_target_is_external() {
    // alpha does not matter for external imports
    for has_alpha in [true, false] {
        let texture =
            Texture::from_imported(&imported(TextureTarget::External, has_alpha, false)).unwrap();
        assert_eq!(texture.kind, TextureKind::External);
        assert_eq!(texture.target, TextureTarget::External);
    }
}

#[test]
fn test_imported_orientation_is_negated() {
    let upright = Texture::from_imported(&imported(TextureTarget::Texture2D, true, true)).unwrap();
    assert!(!upright.invert_y);

    let bottom_up = Texture::from_imported(&imported(TextureTarget::Texture2D, true, false)).unwrap();
    assert!(bottom_up.invert_y);
}

#[test]
fn test_imported_non_gles_buffer_is_rejected() {
    let mut buffer = imported(TextureTarget::Texture2D, true, false);
    buffer.gles = false;

    match Texture::from_imported(&buffer) {
        Err(Error::InvalidResource(_)) => {}
        other => panic!("expected InvalidResource, got {:?}", other),
    }
}

// ============================================================================
// Kinds
// ============================================================================

#[test]
fn test_kind_slots() {
    let slots: Vec<_> = TextureKind::COMPILED.iter().map(|k| k.slot()).collect();
    assert_eq!(slots, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(TextureKind::Invalid.slot(), None);
}
