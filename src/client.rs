//! Day-data provider client.
//!
//! # Protocol
//!
//! - `GET {base}/api/day/{YYYY-MM-DD}` returns
//!   `{ "items"?: [{ "time"?: str, "text": str }], "notes"?: [{ "text": str }] }`
//! - `POST {base}/api/note` with `{ "date": "YYYY-MM-DD", "text": str }`
//!
//! Any non-success status is a `Network` failure; a body that does not
//! decode is a `Decode` failure. Callers do not retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::date::DayKey;

/// One timed (or untimed) entry of a day's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(default)]
    pub time: Option<String>,
    pub text: String,
}

impl ScheduleItem {
    /// `"09:00 — Standup"`, or just the text when there is no time
    pub fn display(&self) -> String {
        match self.time.as_deref().map(str::trim) {
            Some(time) if !time.is_empty() => format!("{} — {}", time, self.text),
            _ => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
}

/// Payload for one day. Missing and `null` lists both decode as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayData {
    #[serde(default)]
    pub items: Option<Vec<ScheduleItem>>,
    #[serde(default)]
    pub notes: Option<Vec<Note>>,
}

impl DayData {
    pub fn items(&self) -> &[ScheduleItem] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Serialize)]
struct NoteRequest<'a> {
    date: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Request could not be sent, or the provider answered with a failure status
    #[error("network failure: {0}")]
    Network(String),
    /// Response body was not the expected JSON
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Remote source of day data and sink for new notes
#[async_trait]
pub trait DayProvider: Send + Sync {
    async fn fetch_day(&self, key: &DayKey) -> Result<DayData, ClientError>;

    async fn submit_note(&self, key: &DayKey, text: &str) -> Result<(), ClientError>;
}

/// HTTP implementation of [`DayProvider`]
#[derive(Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Using day-data provider at {}", base_url);

        Ok(Self { http, base_url })
    }

    fn day_url(&self, key: &DayKey) -> String {
        format!("{}/api/day/{}", self.base_url, key)
    }

    fn note_url(&self) -> String {
        format!("{}/api/note", self.base_url)
    }
}

#[async_trait]
impl DayProvider for HttpProvider {
    async fn fetch_day(&self, key: &DayKey) -> Result<DayData, ClientError> {
        let resp = self
            .http
            .get(self.day_url(key))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Network(format!("provider returned {}", status)));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn submit_note(&self, key: &DayKey, text: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.note_url())
            .json(&NoteRequest {
                date: key.as_str(),
                text,
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Network(format!("provider returned {}", status)));
        }
        Ok(())
    }
}
