// SPDX-License-Identifier: MIT

//! Authentication endpoints
//!
//! Login plus the two [`VerificationApi`] adapters. Signup and password
//! reset share the verify-OTP endpoint but dispatch their OTP over different
//! routes and finish with different terminal actions.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use crate::flow::error::ApiFailure;
use crate::flow::ports::{FinishReply, TerminalPayload, VerificationApi, VerifyReply};

use super::ApiClient;

/// `POST /api/auth/login` — returns the session token.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<String, ApiFailure> {
    let body = json!({ "email": email, "password": password });
    let reply = client
        .request(Method::POST, "/api/auth/login", Some(body))
        .await?;

    reply
        .get("token")
        .and_then(|t| t.as_str())
        .map(String::from)
        .ok_or_else(|| ApiFailure::MalformedBody("login reply carried no token".to_string()))
}

/// Backend adapter for the signup flow.
pub struct SignupApi {
    client: ApiClient,
}

impl SignupApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerificationApi for SignupApi {
    async fn send_otp(&self, email: &str) -> Result<(), ApiFailure> {
        self.client
            .request(Method::POST, "/api/auth/send-otp", Some(json!({ "email": email })))
            .await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyReply, ApiFailure> {
        verify_otp(&self.client, email, code).await
    }

    async fn finish(&self, payload: &TerminalPayload) -> Result<FinishReply, ApiFailure> {
        let body = json!({
            "name": payload.get("name"),
            "email": payload.get("email"),
            "phone": payload.get("phone"),
            "password": payload.get("password"),
            "confirmPassword": payload.get("confirmPassword"),
        });
        let reply = self
            .client
            .request(Method::POST, "/api/auth/signup", Some(body))
            .await?;
        serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))
    }
}

/// Backend adapter for the password-reset flow.
pub struct PasswordResetApi {
    client: ApiClient,
}

impl PasswordResetApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VerificationApi for PasswordResetApi {
    async fn send_otp(&self, email: &str) -> Result<(), ApiFailure> {
        self.client
            .request(
                Method::POST,
                "/api/auth/forget-password/send-otp",
                Some(json!({ "email": email })),
            )
            .await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<VerifyReply, ApiFailure> {
        verify_otp(&self.client, email, code).await
    }

    async fn finish(&self, payload: &TerminalPayload) -> Result<FinishReply, ApiFailure> {
        let body = json!({
            "email": payload.get("email"),
            "password": payload.get("password"),
            "confirmPassword": payload.get("confirmPassword"),
        });
        let reply = self
            .client
            .request(Method::POST, "/api/auth/reset-password", Some(body))
            .await?;
        serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))
    }
}

async fn verify_otp(client: &ApiClient, email: &str, code: &str) -> Result<VerifyReply, ApiFailure> {
    let body = json!({ "email": email, "otp": code });
    let reply = client
        .request(Method::POST, "/api/auth/verify-otp", Some(body))
        .await?;
    serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))
}
