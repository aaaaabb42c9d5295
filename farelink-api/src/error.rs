use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use farelink_core::CoreError;

#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.0 {
            CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            CoreError::ProviderAuth => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed with the flight data provider".to_string(),
            ),
            CoreError::Provider { status, body } => {
                tracing::error!("Provider error (status {}): {}", status, body);
                (
                    // Pass the provider's own status through where possible.
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    format!("Flight data provider error: {}", body),
                )
            }
            CoreError::Transport(msg) => {
                tracing::error!("Provider unreachable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Flight data provider unreachable".to_string(),
                )
            }
            CoreError::Unsupported(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            CoreError::Store(msg) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
