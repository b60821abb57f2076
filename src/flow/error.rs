// SPDX-License-Identifier: MIT

//! Typed error handling for medilink-rs
//!
//! Remote failures are carried as values so the wizard can always fold them
//! into a user-facing notice instead of propagating them past its boundary.

use thiserror::Error;

/// A failed call against the health-records backend.
///
/// `message` is the server-supplied `msg` body field when one was present;
/// callers fall back to their own wording when it is absent.
#[derive(Debug, Error)]
pub enum ApiFailure {
    /// The backend answered with a non-success status.
    #[error("backend rejected the request ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a usable response (DNS, TLS, timeout, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    MalformedBody(String),

    /// Client misconfiguration (missing env vars, bad base URL).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiFailure {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The server-supplied message, if any, for notice rendering.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Failures of the client-side session store (the localStorage analog).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token stored")]
    NoToken,

    #[error("token store unavailable: {0}")]
    Io(#[from] std::io::Error),
}
