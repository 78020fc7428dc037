//! Firmware-level error type.
//!
//! Storage and peripheral bring-up funnel into [`Error`] so `main` can
//! attach context through `anyhow` without matching on every subsystem.
//! Config load and save failures stay as
//! [`ConfigError`](crate::app::ports::ConfigError): the loop logs them and
//! keeps running.
//! Rejections of remote form fields are not errors at this level; they are
//! reported as [`AppEvent::ConfigRejected`](crate::app::events::AppEvent).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or service initialisation failed.
    Init(&'static str),
    /// An ESP-IDF call returned a non-OK status code.
    Io(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Io(code) => write!(f, "esp-idf error {code}"),
        }
    }
}

impl std::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
