/// Placeholder substitution for multi-variant fragment shaders.
///
/// Pure string processing, no GL involved.

use super::shaders::{BUILTIN_RGBA, BUILTIN_RGBX, BUILTIN_EXTERNAL, BUILTIN_EXT_EXTERNAL};
use super::texture::TextureKind;

/// Replaced by the kind-specific `get_pixel` definition
pub const BUILTIN: &str = "@builtin@";

/// Replaced by the extensions the kind needs (may be empty)
pub const BUILTIN_EXT: &str = "@builtin_ext@";

/// Replace the first occurrence of each placeholder, in table order
///
/// Placeholders missing from `template` are skipped; later occurrences of
/// a placeholder are left untouched.
pub fn specialize(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |source, (placeholder, with)| {
            source.replacen(placeholder, with, 1)
        })
}

/// Replacement table for `kind`, `None` for `TextureKind::Invalid`
pub fn builtins_for(kind: TextureKind) -> Option<[(&'static str, &'static str); 2]> {
    let (builtin, builtin_ext) = match kind {
        TextureKind::Rgba => (BUILTIN_RGBA, ""),
        TextureKind::Rgbx => (BUILTIN_RGBX, ""),
        TextureKind::External => (BUILTIN_EXTERNAL, BUILTIN_EXT_EXTERNAL),
        TextureKind::Invalid => return None,
    };

    Some([(BUILTIN, builtin), (BUILTIN_EXT, builtin_ext)])
}

/// Fragment source of `kind`'s variant: `@builtin@` then `@builtin_ext@`
pub fn specialize_fragment(source: &str, kind: TextureKind) -> Option<String> {
    builtins_for(kind).map(|table| specialize(source, &table))
}

#[cfg(test)]
#[path = "shader_template_tests.rs"]
mod tests;
