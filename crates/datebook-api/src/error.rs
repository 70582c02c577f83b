use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API failure taxonomy. Every variant renders as a JSON body of the
/// form `{"error": "<message>"}` at its mapped status code, so handlers
/// can bail with `?` anywhere and the client always gets a readable
/// message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. Carries the message shown to the user.
    #[error("{0}")]
    Validation(String),

    /// Login failed. Deliberately the same message whether the username
    /// or the password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration hit the username uniqueness constraint.
    #[error("Username already exists")]
    UsernameTaken,

    /// No bearer token on a protected route.
    #[error("Access token required")]
    MissingToken,

    /// Bearer token present but unverifiable or expired.
    #[error("Invalid token")]
    InvalidToken,

    /// Delete target absent, or owned by someone else.
    #[error("Event not found")]
    NotFound,

    /// Per-address request budget exhausted.
    #[error("Too many requests")]
    RateLimited,

    /// Anything unexpected. The cause is logged where the error is
    /// constructed; the client only sees the generic message.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Log the underlying failure server-side and return the opaque 500.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        error!("internal error: {err}");
        Self::Internal
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidCredentials | Self::UsernameTaken => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_message() {
        let (status, json) = body_json(ApiError::validation("Date, event and start time are required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Date, event and start time are required");
    }

    #[tokio::test]
    async fn auth_errors_split_401_and_403() {
        let (status, json) = body_json(ApiError::MissingToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Access token required");

        let (status, json) = body_json(ApiError::InvalidToken).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Invalid token");
    }

    #[tokio::test]
    async fn remaining_variants_map_to_expected_statuses() {
        let (status, _) = body_json(ApiError::UsernameTaken).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Event not found");

        let (status, json) = body_json(ApiError::RateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"], "Too many requests");

        let (status, json) = body_json(ApiError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
    }
}
