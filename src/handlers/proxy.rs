use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{upstream_error, Command};
use crate::error::ApiError;
use crate::models::AppState;

#[derive(Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub veid: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    "getServiceInfo".to_string()
}

/// `POST /api/kiwivm` — the only trust boundary.
///
/// Keeps the VEID and API key out of client-visible cross-origin requests
/// by relaying the browser's action to the upstream API server-side. No
/// business logic beyond validation and error normalization.
pub async fn kiwivm_proxy(
    State(state): State<AppState>,
    Json(req): Json<ProxyRequest>,
) -> Response {
    match proxy_call(&state, &req).await {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => {
            tracing::warn!(action = %req.action, %e, "proxy request failed");
            e.into_response()
        }
    }
}

async fn proxy_call(state: &AppState, req: &ProxyRequest) -> Result<Value, ApiError> {
    if req.veid.trim().is_empty() || req.api_key.trim().is_empty() {
        return Err(ApiError::MissingCredentials);
    }
    let command = Command::parse(&req.action).ok_or(ApiError::InvalidAction)?;

    let (status, text) = state
        .monitor
        .client()
        .send_raw(&req.veid, &req.api_key, &command)
        .await?;

    if !status.is_success() {
        return Err(upstream_error(status.as_u16(), &text));
    }
    // relay the upstream payload untouched
    serde_json::from_str(&text).map_err(|_| ApiError::Parse)
}
