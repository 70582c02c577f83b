use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use datebook_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::rate_limit::RateLimitResult;

/// Extract and validate the bearer JWT from the Authorization header.
///
/// Missing header → 401; bad signature or expired token → 403. On
/// success the verified claims are inserted into request extensions for
/// the handlers downstream.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(ApiError::MissingToken)?;

    let claims = verify_token(token, &state.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken)
}

/// Counts the request against the caller's fixed window before it
/// reaches any handler. Over budget the client gets a 429 with a
/// Retry-After hint and the handler never runs.
pub async fn throttle(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    match state.limiter.check(addr.ip()).await {
        RateLimitResult::Allowed => next.run(req).await,
        RateLimitResult::Limited { retry_after_secs } => {
            let mut resp = ApiError::RateLimited.into_response();
            resp.headers_mut()
                .insert(header::RETRY_AFTER, retry_after_secs.into());
            resp
        }
    }
}
