/// Output transforms and coordinate space conversions.
///
/// An output transform is a 90° step rotation optionally combined with a
/// horizontal mirror. The numeric encoding follows the Wayland protocol:
/// 0..=3 are the plain rotations, 4..=7 the same rotations with bit 4 set.

use std::f32::consts::{FRAC_PI_2, PI};
use glam::{Mat4, Vec3};
use super::rect::Rect;

const FLIPPED_BIT: u32 = 4;

// ============================================================================
// OutputTransform
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum OutputTransform {
    #[default]
    Normal = 0,
    Rotate90 = 1,
    Rotate180 = 2,
    Rotate270 = 3,
    Flipped = 4,
    Flipped90 = 5,
    Flipped180 = 6,
    Flipped270 = 7,
}

impl OutputTransform {
    pub const ALL: [OutputTransform; 8] = [
        OutputTransform::Normal,
        OutputTransform::Rotate90,
        OutputTransform::Rotate180,
        OutputTransform::Rotate270,
        OutputTransform::Flipped,
        OutputTransform::Flipped90,
        OutputTransform::Flipped180,
        OutputTransform::Flipped270,
    ];

    /// Decode the protocol value, `None` outside 0..=7
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn raw(self) -> u32 {
        self as u32
    }

    pub fn is_flipped(self) -> bool {
        self.raw() & FLIPPED_BIT != 0
    }

    /// The rotation part alone (mirror bit cleared)
    pub fn rotation(self) -> OutputTransform {
        match self {
            OutputTransform::Flipped => OutputTransform::Normal,
            OutputTransform::Flipped90 => OutputTransform::Rotate90,
            OutputTransform::Flipped180 => OutputTransform::Rotate180,
            OutputTransform::Flipped270 => OutputTransform::Rotate270,
            plain => plain,
        }
    }

    /// True for ±90° rotations, where width and height trade places
    pub fn swaps_axes(self) -> bool {
        self.raw() & 1 != 0
    }

    /// The transform undoing `self`
    ///
    /// Mirrored transforms are their own inverse; of the plain rotations only
    /// 90 and 270 differ from their inverse.
    pub fn invert(self) -> OutputTransform {
        match self {
            OutputTransform::Rotate90 => OutputTransform::Rotate270,
            OutputTransform::Rotate270 => OutputTransform::Rotate90,
            other => other,
        }
    }
}

// ============================================================================
// Matrices
// ============================================================================

/// 4×4 matrix applying `transform` in normalized device space
///
/// Computed as `rotation * mirror`. The mirror is `scale(-1, 1, 0)`, which
/// also flattens Z; rotations are −90° (90), 180° and +90° (270) about Z.
pub fn output_matrix(transform: OutputTransform) -> Mat4 {
    let mirror = if transform.is_flipped() {
        Mat4::from_scale(Vec3::new(-1.0, 1.0, 0.0))
    } else {
        Mat4::IDENTITY
    };

    let rotation = match transform.rotation() {
        OutputTransform::Rotate90 => Mat4::from_rotation_z(-FRAC_PI_2),
        OutputTransform::Rotate180 => Mat4::from_rotation_z(PI),
        OutputTransform::Rotate270 => Mat4::from_rotation_z(FRAC_PI_2),
        _ => Mat4::IDENTITY,
    };

    rotation * mirror
}

// ============================================================================
// Box conversions
// ============================================================================

/// Scale a geometry-space box into damage space
///
/// Rounds outward: the origin is floored and the far edge ceiled, so the
/// result always covers the exact scaled area.
pub fn geometry_to_damage(rect: Rect, scale: f32) -> Rect {
    let scale = scale as f64;
    let x1 = (rect.x as f64 * scale).floor();
    let y1 = (rect.y as f64 * scale).floor();
    let x2 = ((rect.x as i64 + rect.width as i64) as f64 * scale).ceil();
    let y2 = ((rect.y as i64 + rect.height as i64) as f64 * scale).ceil();

    Rect::new(x1 as i32, y1 as i32, (x2 - x1) as i32, (y2 - y1) as i32)
}

/// Apply `transform` to `rect` inside a `width × height` space
///
/// `width`/`height` describe the space before the transform; the returned
/// box lives in the transformed space, whose axes are swapped for ±90°.
pub fn transform_box(rect: Rect, transform: OutputTransform, width: i32, height: i32) -> Rect {
    let (w, h) = if transform.swaps_axes() {
        (rect.height, rect.width)
    } else {
        (rect.width, rect.height)
    };

    let right = width.saturating_sub(rect.right());
    let bottom = height.saturating_sub(rect.bottom());

    let (x, y) = match transform {
        OutputTransform::Normal => (rect.x, rect.y),
        OutputTransform::Rotate90 => (bottom, rect.x),
        OutputTransform::Rotate180 => (right, bottom),
        OutputTransform::Rotate270 => (rect.y, right),
        OutputTransform::Flipped => (right, rect.y),
        OutputTransform::Flipped90 => (rect.y, rect.x),
        OutputTransform::Flipped180 => (rect.x, bottom),
        OutputTransform::Flipped270 => (bottom, right),
    };

    Rect::new(x, y, w, h)
}

/// Project a damage-space box into framebuffer space
///
/// `viewport_width`/`viewport_height` are the framebuffer pixel dimensions.
pub fn damage_to_framebuffer(
    rect: Rect,
    transform: OutputTransform,
    viewport_width: i32,
    viewport_height: i32,
) -> Rect {
    let (width, height) = if transform.swaps_axes() {
        (viewport_height, viewport_width)
    } else {
        (viewport_width, viewport_height)
    };

    transform_box(rect, transform.invert(), width, height)
}

/// Project a framebuffer-space box back into damage space
///
/// Inverse of [`damage_to_framebuffer`] for the same transform and viewport.
pub fn framebuffer_to_damage(
    rect: Rect,
    transform: OutputTransform,
    viewport_width: i32,
    viewport_height: i32,
) -> Rect {
    transform_box(rect, transform, viewport_width, viewport_height)
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
