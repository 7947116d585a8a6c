//! Error types for farsight with a fail-open philosophy.
//!
//! Nothing in a training session is allowed to be fatal. Storage and feedback
//! failures are logged and replaced with safe defaults so the worst outcome is
//! silent feedback, never an aborted session.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for farsight operations.
#[derive(Error, Debug)]
pub enum FarsightError {
    /// I/O errors from the key-value files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML (de)serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A feedback channel (speech, vibration, tone, screen hold) failed.
    #[error("{channel} unavailable: {message}")]
    Feedback {
        channel: &'static str,
        message: String,
    },

    /// A settings value outside the supported set.
    #[error("invalid setting: {message}")]
    Settings { message: String },

    /// Internal state misuse (e.g. a poisoned store lock).
    #[error("invalid state: {message}")]
    InvalidState { message: String },
}

/// A specialized Result type for farsight operations.
pub type Result<T> = std::result::Result<T, FarsightError>;

impl FarsightError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a feedback-channel error.
    pub fn feedback(channel: &'static str, message: impl Into<String>) -> Self {
        Self::Feedback {
            channel,
            message: message.into(),
        }
    }

    /// Create a settings validation error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

impl From<io::Error> for FarsightError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for FarsightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Fail-open handling for results.
///
/// Logs the error as a warning and substitutes a default or fallback value.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the farsight CLI.
pub mod exit_codes {
    /// Command succeeded.
    pub const OK: i32 = 0;

    /// Command failed (bad arguments, unwritable store).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = FarsightError::storage(
            "/tmp/vision_quest_stats.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("vision_quest_stats.json"));
    }

    #[test]
    fn test_feedback_error_display() {
        let err = FarsightError::feedback("screen hold", "wake lock denied");
        assert_eq!(err.to_string(), "screen hold unavailable: wake lock denied");
    }

    #[test]
    fn test_settings_error_display() {
        let err = FarsightError::settings("duration 7 is not one of 3, 5, 10");
        assert_eq!(
            err.to_string(),
            "invalid setting: duration 7 is not one of 3, 5, 10"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: FarsightError = json_err.into();
        assert!(matches!(err, FarsightError::Serde { .. }));
    }

    #[test]
    fn test_from_io_error() {
        let err: FarsightError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FarsightError::Storage { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(FarsightError::serde("bad"));
        assert!(result.fail_open_default("loading stats").is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<u32> = Err(FarsightError::config("bad"));
        assert_eq!(result.fail_open_with("loading config", 5), 5);
    }

    #[test]
    fn test_fail_open_passes_success_through() {
        let result: Result<u32> = Ok(10);
        assert_eq!(result.fail_open_default("anything"), 10);
    }
}
