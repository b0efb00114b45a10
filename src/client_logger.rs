//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini)
//! client, plus [`StderrLogger`], a ready-made implementation for debugging.

use std::io::{self, Write};

use crate::{GenerateContentRequest, GenerateContentResponse};

/// A trait for logging Gemini client operations.
///
/// # Example
///
/// ```rust,ignore
/// use gemini_chat::{ClientLogger, GenerateContentRequest, GenerateContentResponse};
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, request: &GenerateContentRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, response: &GenerateContentResponse);
}

/// Writes one JSON line per request and response to stderr.
#[derive(Debug, Default)]
pub struct StderrLogger;

impl StderrLogger {
    fn emit<T: serde::Serialize>(label: &str, value: &T) {
        let line = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => format!("<unserializable: {err}>"),
        };
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{label}] {line}");
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, request: &GenerateContentRequest) {
        Self::emit("request", request);
    }

    fn log_response(&self, response: &GenerateContentResponse) {
        Self::emit("response", response);
    }
}
