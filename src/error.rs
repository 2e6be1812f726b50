use thiserror::Error;

use crate::transport::TransportError;

/// Unified error type for the client.
///
/// Every failure a caller can observe falls into one of four categories,
/// so a calling surface (an editor command, a script, a service) can decide
/// how to present each kind without string matching:
///
/// - [`Error::Configuration`] — the client itself is misconfigured (missing
///   credential, out-of-range sampling parameter). Detected before any I/O.
/// - [`Error::Validation`] — the caller's input is unusable (empty prompt).
///   Detected before any I/O.
/// - [`Error::Transport`] — the endpoint could not be reached or the round
///   trip was cut short (connect failure, DNS, deadline expiry).
/// - [`Error::Service`] — the endpoint answered, but with a failure status
///   or a structurally invalid success body.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("service error{}: {message}", format_status(.status))]
    Service {
        /// Upstream HTTP status, when one was received.
        status: Option<u16>,
        message: String,
    },
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Service {
            status,
            message: message.into(),
        }
    }

    /// Upstream HTTP status, if this is a [`Error::Service`] with one attached.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => *status,
            _ => None,
        }
    }
}
