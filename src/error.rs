//! Error types for the navigation crate.
//!
//! The controllers themselves never fail: sensor noise is retried, deadzones
//! are recovered from and time-boxes end a call early. Errors only surface
//! while setting the navigator up (bad calibration values, logger already
//! installed, log file not writable).

use log::SetLoggerError;

/// Errors produced while configuring the navigation stack.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A calibration or pacing value is out of range.
    #[error("invalid navigation config: {0}")]
    InvalidConfig(String),

    /// A global logger has already been installed.
    #[error("logger error: {0}")]
    Logger(#[from] SetLoggerError),

    /// The diagnostic log file could not be opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NavError>;
