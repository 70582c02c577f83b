use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims shared between token issuance (the auth handlers) and the
/// bearer-token middleware. Canonical definition lives here in
/// datebook-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

/// Fields are optional so an absent field reaches the handler as `None`
/// and turns into a 400 with a readable message, not a serde rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

// -- Events --

/// The client sends times in camelCase; stored and echoed back in
/// snake_case.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub date: Option<String>,
    pub event: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    #[serde(rename = "endTime")]
    pub end_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: i64,
    pub date: String,
    pub event: String,
    pub start_time: String,
    pub end_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub event: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub created_at: String,
}
