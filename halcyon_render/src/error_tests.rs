//! Unit tests for error.rs
//!
//! Tests all Error variants and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};
use crate::halcyon::Engine;
use crate::halcyon::log::{Logger, LogEntry, LogSeverity};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("glCreateFramebuffer failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("glCreateFramebuffer failed"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("imported buffer is not GLES".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("imported buffer is not GLES"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("no texture program".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("no texture program"));
}

#[test]
fn test_shader_compilation_failed_display() {
    let err = Error::ShaderCompilationFailed("0:3: syntax error".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Shader compilation failed"));
    assert!(display.contains("0:3: syntax error"));
}

#[test]
fn test_usage_error_display() {
    let err = Error::UsageError("no program for Rgba".to_string());
    assert_eq!(format!("{}", err), "Usage error: no program for Rgba");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::UsageError("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::BackendError("test".to_string()));
    assert!(debug.contains("BackendError"));

    let debug = format!("{:?}", Error::UsageError("test".to_string()));
    assert!(debug.contains("UsageError"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::ShaderCompilationFailed("log".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

#[test]
fn test_result_question_mark_propagation() {
    fn inner() -> Result<u32> {
        Err(Error::InvalidResource("inner".to_string()))
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(matches!(outer(), Err(Error::InvalidResource(_))));
}

// ============================================================================
// MACROS
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<(LogSeverity, String, Option<u32>)>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap()
            .push((entry.severity, entry.message.clone(), entry.line));
    }
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_backend_error() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });

    let err = crate::engine_err!("halcyon::test", "failed with code {}", 7);
    assert!(matches!(&err, Error::BackendError(msg) if msg == "failed with code 7"));

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0, LogSeverity::Error);
    assert_eq!(captured[0].1, "failed with code 7");
    assert!(captured[0].2.is_some());
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });

    fn bails(flag: bool) -> Result<u32> {
        if flag {
            crate::engine_bail!("halcyon::test", "bailing out");
        }
        Ok(1)
    }

    assert!(bails(false).is_ok());
    assert!(matches!(bails(true), Err(Error::BackendError(_))));

    let count = entries.lock().unwrap().len();
    Engine::reset_logger();
    assert_eq!(count, 1);
}
