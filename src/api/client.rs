use reqwest::StatusCode;
use serde_json::Value;

use super::command::Command;
use crate::error::ApiError;

/// HTTP client for the KiwiVM control-panel API.
///
/// Builds `GET {base}/{endpoint}?veid=..&api_key=..` requests and leaves the
/// response payload untouched. Does not retry.
#[derive(Clone)]
pub struct KiwiClient {
    http: reqwest::Client,
    base_url: String,
}

impl KiwiClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        KiwiClient { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue the request and return the raw status and body text.
    ///
    /// The upstream API reports some errors as plain text, so the body is
    /// not assumed to be JSON at this level.
    pub async fn send_raw(
        &self,
        veid: &str,
        api_key: &str,
        command: &Command,
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let url = format!("{}/{}", self.base_url, command.endpoint());
        let mut query: Vec<(&str, String)> =
            vec![("veid", veid.to_string()), ("api_key", api_key.to_string())];
        query.extend(command.params());

        tracing::debug!(endpoint = command.endpoint(), veid, "calling KiwiVM API");

        let resp = self.http.get(&url).query(&query).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }

    /// Issue the request and return the parsed JSON payload, mapping
    /// non-success statuses onto [`ApiError::Upstream`].
    pub async fn call(
        &self,
        veid: &str,
        api_key: &str,
        command: &Command,
    ) -> Result<Value, ApiError> {
        let (status, text) = self.send_raw(veid, api_key, command).await?;
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|_| ApiError::Parse)
    }
}

/// Resolve an upstream error body into a user-facing message.
///
/// The API returns structured `{"error": "..."}` bodies for some failures
/// and bare text for others; structured bodies without a string `error`
/// field get a generic message.
pub fn upstream_error(status: u16, body: &str) -> ApiError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("error").and_then(|e| e.as_str()) {
            Some(msg) => msg.to_string(),
            None => {
                tracing::warn!(status, %json, "structured upstream error without error field");
                "KiwiVM API returned an error.".to_string()
            }
        },
        Err(_) => format!("KiwiVM API request failed: {}", body),
    };
    ApiError::Upstream { status, message }
}
