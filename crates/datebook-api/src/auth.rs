use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State};
use jsonwebtoken::{EncodingKey, Header, encode};

use datebook_db::Database;
use datebook_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::rate_limit::RateLimiter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub limiter: RateLimiter,
}

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 6;

/// Tokens are valid for 7 days from issuance.
const TOKEN_TTL_DAYS: i64 = 7;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::validation("Username and password required")),
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation("Password must be at least 6 characters"));
    }

    if state
        .db
        .get_user_by_username(&username)
        .map_err(ApiError::internal)?
        .is_some()
    {
        return Err(ApiError::UsernameTaken);
    }

    let password_hash = hash_password(&password).map_err(ApiError::internal)?;

    let user_id = match state.db.create_user(&username, &password_hash) {
        Ok(id) => id,
        // Two registrations can race past the pre-check; the UNIQUE
        // constraint decides the winner.
        Err(e) if datebook_db::is_unique_violation(&e) => return Err(ApiError::UsernameTaken),
        Err(e) => return Err(ApiError::internal(e)),
    };

    let token = create_token(&state.jwt_secret, user_id, &username).map_err(ApiError::internal)?;

    Ok(Json(AuthResponse { token, username }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) => (u, p),
        _ => return Err(ApiError::InvalidCredentials),
    };

    let user = state
        .db
        .get_user_by_username(&username)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&password, &user.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(&state.jwt_secret, user.id, &user.username)
        .map_err(ApiError::internal)?;

    Ok(Json(AuthResponse {
        token,
        username: user.username,
    }))
}

/// One-way, salted Argon2id hash. Work parameters come from
/// `Argon2::default()` and can be tuned there.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

pub fn create_token(secret: &str, user_id: i64, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
