/// Integer rectangles and float quad corners.

/// Axis-aligned integer rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// True when the rectangle covers no pixel
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// `x + width`, saturating at the i32 range
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// `y + height`, saturating at the i32 range
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Quad corners in floating point, `(x1, y1)` top-left and `(x2, y2)`
/// bottom-right before any flip is applied
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlGeometry {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl GlGeometry {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The unit square, i.e. the whole texture in texture coordinates
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl From<Rect> for GlGeometry {
    fn from(rect: Rect) -> Self {
        GlGeometry {
            x1: rect.x as f32,
            y1: rect.y as f32,
            x2: rect.right() as f32,
            y2: rect.bottom() as f32,
        }
    }
}

#[cfg(test)]
#[path = "rect_tests.rs"]
mod tests;
