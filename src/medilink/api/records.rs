// SPDX-License-Identifier: MIT

//! Authenticated record endpoints: dashboard summary, report detail and
//! manual vitals entry. Replies wrap their data in `{ ok, ... }`; `ok: false`
//! is a soft failure the caller surfaces as a warning, not an error.

use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::flow::error::ApiFailure;

use super::ApiClient;

/// An uploaded medical report's metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "fileUrl", default)]
    pub file_url: Option<String>,
}

/// One manually entered vitals row.
#[derive(Debug, Clone, Deserialize)]
pub struct VitalsRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub sugar: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
}

/// Payload for `POST /api/vitals`.
#[derive(Debug, Clone, Serialize)]
pub struct NewVitals {
    pub date: NaiveDate,
    pub bp: String,
    pub sugar: String,
    pub weight: String,
    pub notes: String,
}

/// `GET /api/dashboard` reply.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardReply {
    pub ok: bool,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub vitals: Vec<VitalsRecord>,
}

#[derive(Debug, Deserialize)]
struct ReportReply {
    ok: bool,
    report: Option<Report>,
}

#[derive(Debug, Deserialize)]
struct OkReply {
    ok: bool,
}

/// Typed access to the record endpoints. Requires a client with a token.
pub struct RecordsApi {
    client: ApiClient,
}

impl RecordsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<DashboardReply, ApiFailure> {
        let reply = self
            .client
            .request(Method::GET, "/api/dashboard", None)
            .await?;
        serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))
    }

    /// `None` when the backend answers `ok: false` (report not found).
    pub async fn report(&self, id: &str) -> Result<Option<Report>, ApiFailure> {
        let reply = self
            .client
            .request(Method::GET, &format!("/api/reports/{}", id), None)
            .await?;
        let parsed: ReportReply =
            serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))?;
        if parsed.ok {
            Ok(parsed.report)
        } else {
            Ok(None)
        }
    }

    /// Returns whether the backend accepted the entry.
    pub async fn add_vitals(&self, vitals: &NewVitals) -> Result<bool, ApiFailure> {
        let body = json!(vitals);
        let reply = self
            .client
            .request(Method::POST, "/api/vitals", Some(body))
            .await?;
        let parsed: OkReply =
            serde_json::from_value(reply).map_err(|e| ApiFailure::MalformedBody(e.to_string()))?;
        Ok(parsed.ok)
    }
}
