//! Geometry module - rectangles and output transform math.
//!
//! Three coordinate spaces are in play and must never be mixed:
//! - *geometry space*: output-local logical coordinates used by window logic
//! - *damage space*: geometry space multiplied by the output scale, pre-rotation
//! - *framebuffer space*: damage space with the output rotation/flip applied
//!
//! Everything here is pure: no GL calls, no state.

mod rect;
mod transform;

pub use rect::{Rect, GlGeometry};
pub use transform::{
    OutputTransform,
    output_matrix,
    geometry_to_damage,
    transform_box,
    damage_to_framebuffer,
    framebuffer_to_damage,
};
