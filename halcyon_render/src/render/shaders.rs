//! Built-in GLSL ES 1.00 sources.
//!
//! Fragment templates call `get_pixel(vec2)` to sample the current texture;
//! `@builtin@` is replaced by the kind-specific definition of `get_pixel` and
//! `@builtin_ext@` by the extensions that definition needs.
//!
//! Identifiers starting with `_halcyon_` and `get_pixel` are reserved in
//! user templates.

/// Vertex shader shared by every built-in program
pub const DEFAULT_VERTEX_SHADER: &str = "#version 100

attribute mediump vec2 position;
attribute highp vec2 uvPosition;
varying highp vec2 uvpos;

uniform mat4 MVP;

void main() {
    gl_Position = MVP * vec4(position.xy, 0.0, 1.0);
    uvpos = uvPosition;
}
";

/// Textured quad template: texture sample modulated by `color`
pub const DEFAULT_FRAGMENT_SHADER: &str = "#version 100
@builtin_ext@
@builtin@

varying highp vec2 uvpos;
uniform mediump vec4 color;

void main() {
    gl_FragColor = get_pixel(uvpos) * color;
}
";

/// Flat color fill, no texture sampling
pub const COLOR_RECT_FRAGMENT_SHADER: &str = "#version 100
varying highp vec2 uvpos;
uniform mediump vec4 color;

void main() {
    gl_FragColor = color;
}
";

pub const BUILTIN_RGBA: &str = "
uniform sampler2D _halcyon_texture;
uniform mediump float _halcyon_y_base;
uniform mediump float _halcyon_y_mult;

mediump vec4 get_pixel(highp vec2 pos) {
    pos.y = _halcyon_y_base + pos.y * _halcyon_y_mult;
    return texture2D(_halcyon_texture, pos);
}
";

pub const BUILTIN_RGBX: &str = "
uniform sampler2D _halcyon_texture;
uniform mediump float _halcyon_y_base;
uniform mediump float _halcyon_y_mult;

mediump vec4 get_pixel(highp vec2 pos) {
    pos.y = _halcyon_y_base + pos.y * _halcyon_y_mult;
    return vec4(texture2D(_halcyon_texture, pos).rgb, 1.0);
}
";

pub const BUILTIN_EXTERNAL: &str = "
uniform samplerExternalOES _halcyon_texture;
uniform mediump float _halcyon_y_base;
uniform mediump float _halcyon_y_mult;

mediump vec4 get_pixel(highp vec2 pos) {
    pos.y = _halcyon_y_base + pos.y * _halcyon_y_mult;
    return texture2D(_halcyon_texture, pos);
}
";

/// Extension required by `samplerExternalOES`
pub const BUILTIN_EXT_EXTERNAL: &str = "#extension GL_OES_EGL_image_external : require";
