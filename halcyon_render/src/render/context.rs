/// Seam to the compositor's GPU context provider (EGL display/context owner).

use crate::error::Result;

/// Yields a current GL context and brackets frames
///
/// Implemented by the backend/output layer that owns the EGL context. The
/// renderer only asks for the context to be made current when no output is
/// bound (outputs make their own surface current before rendering).
pub trait ContextProvider {
    /// Whether the GL context is current on this thread
    fn is_current(&self) -> bool;

    /// Make the GL context current without a draw surface
    fn make_current(&mut self) -> Result<()>;

    /// Start a frame of `width × height` pixels (sets up the viewport)
    fn begin_frame(&mut self, width: i32, height: i32);

    /// Finish the frame started by `begin_frame`
    fn end_frame(&mut self);
}
