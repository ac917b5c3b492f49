use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced by upstream API calls and the proxy endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("VEID and API key are required")]
    MissingCredentials,

    /// Action name outside the known capability set.
    #[error("Invalid action specified")]
    InvalidAction,

    /// Non-success response from the upstream API, already resolved into a
    /// user-facing message.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response from KiwiVM API")]
    Parse,
}

impl ApiError {
    /// Status relayed to the caller. Upstream failures keep the upstream
    /// status so the browser sees what the API actually returned.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials | ApiError::InvalidAction => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Transport(_) | ApiError::Parse => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_keeps_status() {
        let err = ApiError::Upstream {
            status: 403,
            message: "Invalid API key".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn test_upstream_error_with_bogus_status_falls_back() {
        let err = ApiError::Upstream {
            status: 1,
            message: "broken".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(ApiError::MissingCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidAction.status_code(), StatusCode::BAD_REQUEST);
    }
}
