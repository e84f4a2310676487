//! Error types for the Halcyon render layer
//!
//! This module defines the error types used throughout the render layer,
//! including GPU resource creation, shader compilation and usage-contract
//! violations.

use std::fmt;

/// Result type for Halcyon render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Halcyon render errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (GL driver, context provider, etc.)
    BackendError(String),

    /// Invalid resource (texture, framebuffer, imported buffer, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, built-in programs)
    InitializationFailed(String),

    /// A shader failed to compile or a program failed to link
    ShaderCompilationFailed(String),

    /// The caller broke a usage contract (e.g. activating a texture kind
    /// that has no compiled program)
    UsageError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ShaderCompilationFailed(msg) => write!(f, "Shader compilation failed: {}", msg),
            Error::UsageError(msg) => write!(f, "Usage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use halcyon_render::engine_err;
/// let err = engine_err!("halcyon::gles", "glCreateTexture failed: {}", "out of handles");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::halcyon::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with an `Error::BackendError`
///
/// # Example
///
/// ```no_run
/// # use halcyon_render::engine_bail;
/// fn create() -> halcyon_render::halcyon::Result<()> {
///     engine_bail!("halcyon::gles", "no current context");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
