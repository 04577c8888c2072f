use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::prediction::PredictionResult;
use crate::request::PredictRequest;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a prediction exchange produced no result. The `Display` text is what
/// the user sees.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("could not reach the prediction service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("the prediction service did not respond in time")]
    Timeout,

    #[error("prediction service returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("unexpected response from the prediction service: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PredictError::Timeout
        } else {
            PredictError::Transport(err)
        }
    }
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One `POST /predict` exchange. Never retries.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictError> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!(%url, ?request, "sending prediction request");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictError::Status {
                status,
                detail: describe_error_body(status, &body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<PredictionResult>(&body)
            .map_err(|e| PredictError::Malformed(e.to_string()))
    }

    /// `GET /health`; true when the service reports `"ok"`.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let health: HealthResponse = response.json().await?;
        Ok(health.status == "ok")
    }
}

/// Turn an error body into one line of text. FastAPI replies with
/// `{"detail": "..."}` or `{"detail": [{"loc": [...], "msg": "..."}]}`; anything
/// else is passed through as-is.
fn describe_error_body(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no details")
            .to_string();
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    match json.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|last| last.as_str());
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                trimmed.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => trimmed.to_string(),
    }
}
