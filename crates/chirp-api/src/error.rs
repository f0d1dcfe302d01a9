use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Failure modes of the simulator API, each mapped onto the wire shape
/// the test harness expects: `{"status": <code>, "error_msg": <reason>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("You are not authorized to use this resource!")]
    Unauthorized,

    /// Unknown username in the path or body. 404 with an empty body.
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized => (StatusCode::FORBIDDEN, self.to_string()),
            Self::NotFound => return StatusCode::NOT_FOUND.into_response(),
            Self::Storage(e) => {
                error!("storage error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "status": status.as_u16(),
            "error_msg": msg,
        });

        (status, Json(body)).into_response()
    }
}
