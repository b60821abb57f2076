// SPDX-License-Identifier: MIT

//! HTTP client for the health-records backend
//!
//! One shared reqwest client, base URL from the environment, bearer token
//! attached when a session exists. Failure bodies are `{ "msg": ... }`; the
//! message is extracted so the UI layers can echo the server's wording.

use reqwest::{Client, Method};
use serde_json::Value;
use std::env;

use crate::flow::error::ApiFailure;

pub mod auth;
pub mod records;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build from `MEDILINK_API_URL`.
    pub fn from_env() -> Result<Self, ApiFailure> {
        let base_url = env::var("MEDILINK_API_URL")
            .map_err(|_| ApiFailure::config("MEDILINK_API_URL must be set"))?;
        log::info!("API client: base_url={}", base_url);
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attach a session token; subsequent requests carry it as a bearer.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiFailure> {
        let url = join_url(&self.base_url, path);

        let mut req = self
            .client
            .request(method, &url)
            .header("Accept", "application/json");

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let msg = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("msg").and_then(|m| m.as_str()).map(String::from));
            log::warn!("{} {} -> {}", url, status, msg.as_deref().unwrap_or("-"));
            return Err(ApiFailure::rejected(status.as_u16(), msg));
        }

        Ok(resp.json().await?)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
