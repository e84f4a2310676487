/// Halcyon Engine - process-wide hooks of the render layer
///
/// The render layer keeps almost no global state: GPU state is scoped to a
/// `RenderPass`. The two exceptions live here: the logger every module writes
/// to, and the switch deciding whether GL calls are followed by an error query.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Post-call glGetError() checks, on by default in debug builds
static GL_ERROR_CHECKS: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

// ===== PUBLIC API =====

/// Process-wide hooks (logging and GL error checking)
///
/// # Example
///
/// ```no_run
/// use halcyon_render::halcyon::{Engine, log::{Logger, LogEntry}};
///
/// struct JournalLogger;
/// impl Logger for JournalLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the journal...
///     }
/// }
///
/// Engine::set_logger(JournalLogger);
/// Engine::set_gl_error_checks(true);
/// ```
pub struct Engine;

impl Engine {
    // ===== GL ERROR CHECKS =====

    /// Enable or disable the glGetError() query issued after each GL call
    pub fn set_gl_error_checks(enabled: bool) {
        GL_ERROR_CHECKS.store(enabled, Ordering::Relaxed);
    }

    /// Whether GL calls are currently followed by an error query
    pub fn gl_error_checks_enabled() -> bool {
        GL_ERROR_CHECKS.load(Ordering::Relaxed)
    }

    // ===== LOGGING API =====

    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! and by the GL error check to report the call site.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
