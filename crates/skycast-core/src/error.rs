//! Centralized error types for the Skycast application.
//!
//! Domain crates carry their own error enums; this module provides the
//! top-level type application edges convert into, with user-friendly
//! messages suitable for display.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message. Note that lookup and
/// location failures on the screen itself never reach this type - the
/// coordinator absorbs them into display states; AppError covers the startup
/// and configuration edges.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a configuration error from an arbitrary message.
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    /// Returns a user-friendly message suitable for display in the UI.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Invalid configuration. Check your settings.",
            AppError::Weather(_) => "Weather service error. Please try again.",
            AppError::Location(_) => "Location could not be determined. Please try again.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}
