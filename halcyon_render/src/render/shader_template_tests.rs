//! Unit tests for shader_template.rs

use crate::render::shader_template::{specialize, specialize_fragment, builtins_for, BUILTIN, BUILTIN_EXT};
use crate::render::shaders::{
    DEFAULT_FRAGMENT_SHADER, BUILTIN_RGBA, BUILTIN_RGBX, BUILTIN_EXTERNAL, BUILTIN_EXT_EXTERNAL,
};
use crate::render::texture::TextureKind;

// ============================================================================
// specialize
// ============================================================================

#[test]
fn test_specialize_replaces_first_occurrence_only() {
    let out = specialize("a @x@ b @x@", &[("@x@", "1")]);
    assert_eq!(out, "a 1 b @x@");
}

#[test]
fn test_specialize_applies_table_in_order() {
    // the first replacement introduces the second placeholder
    let out = specialize("@a@", &[("@a@", "[@b@]"), ("@b@", "2")]);
    assert_eq!(out, "[2]");
}

#[test]
fn test_specialize_missing_placeholder_is_identity() {
    let source = "void main() {}";
    assert_eq!(specialize(source, &[(BUILTIN, "x"), (BUILTIN_EXT, "y")]), source);
}

// ============================================================================
// builtins
// ============================================================================

#[test]
fn test_builtins_for_each_kind() {
    assert_eq!(builtins_for(TextureKind::Rgba), Some([(BUILTIN, BUILTIN_RGBA), (BUILTIN_EXT, "")]));
    assert_eq!(builtins_for(TextureKind::Rgbx), Some([(BUILTIN, BUILTIN_RGBX), (BUILTIN_EXT, "")]));
    assert_eq!(
        builtins_for(TextureKind::External),
        Some([(BUILTIN, BUILTIN_EXTERNAL), (BUILTIN_EXT, BUILTIN_EXT_EXTERNAL)])
    );
    assert_eq!(builtins_for(TextureKind::Invalid), None);
}

#[test]
fn test_external_extension_follows_version_line() {
    let source = "#version 100\n@builtin_ext@\n@builtin@";
    let out = specialize_fragment(source, TextureKind::External).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "#version 100");
    assert_eq!(lines[1], BUILTIN_EXT_EXTERNAL);
    assert!(out.ends_with(BUILTIN_EXTERNAL));
    assert!(!out.contains('@'));
}

#[test]
fn test_rgba_variant_drops_extension_line() {
    let out = specialize_fragment(DEFAULT_FRAGMENT_SHADER, TextureKind::Rgba).unwrap();
    assert!(out.starts_with("#version 100\n\n"));
    assert!(out.contains("uniform sampler2D _halcyon_texture;"));
    assert!(!out.contains("samplerExternalOES"));
    assert!(!out.contains(BUILTIN));
    assert!(!out.contains(BUILTIN_EXT));
}

#[test]
fn test_rgbx_variant_forces_opaque_alpha() {
    let out = specialize_fragment(DEFAULT_FRAGMENT_SHADER, TextureKind::Rgbx).unwrap();
    assert!(out.contains(".rgb, 1.0)"));
}

#[test]
fn test_every_compiled_kind_defines_get_pixel_once() {
    for kind in TextureKind::COMPILED {
        let out = specialize_fragment(DEFAULT_FRAGMENT_SHADER, kind).unwrap();
        assert_eq!(out.matches("vec4 get_pixel(").count(), 1, "kind {:?}", kind);
        assert_eq!(out.matches("#extension").count(), (kind == TextureKind::External) as usize);
    }
}
