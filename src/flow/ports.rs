// SPDX-License-Identifier: MIT

//! Collaborator seams for the verification wizard
//!
//! The wizard itself never touches HTTP, disk or navigation. It drives these
//! trait objects; the application layer supplies real implementations and the
//! tests supply mocks.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use super::error::{ApiFailure, SessionError};

/// Reply from the verify-OTP endpoint. Success is decided by the caller from
/// the message wording, not by this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyReply {
    pub msg: String,
}

/// Reply from a terminal action (create-account or reset-password).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinishReply {
    /// Session token - present for account creation only.
    pub token: Option<String>,
    pub msg: Option<String>,
}

/// The accumulated field values handed to the terminal action, keyed by step
/// name. The OTP code is already excluded by the wizard.
#[derive(Debug, Clone, Default)]
pub struct TerminalPayload {
    pub values: HashMap<String, String>,
}

impl TerminalPayload {
    /// Value for a step, or the empty string when the step was never reached.
    /// Matches the original client, which submitted unset form fields as-is.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

/// The backend contract a flow runs against: OTP dispatch, OTP verification
/// and the flow's terminal action.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn send_otp(&self, email: &str) -> Result<(), ApiFailure>;

    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyReply, ApiFailure>;

    /// Perform the terminal action with the collected values.
    async fn finish(&self, payload: &TerminalPayload) -> Result<FinishReply, ApiFailure>;
}

/// Persistent session-token storage (the localStorage analog).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn store(&self, token: &str) -> Result<(), SessionError>;

    async fn load(&self) -> Result<String, SessionError>;
}

/// Navigation collaborator invoked on terminal success with a named target
/// view. Real routing is outside this crate.
pub trait Navigator: Send + Sync {
    fn go(&self, route: &str);
}
