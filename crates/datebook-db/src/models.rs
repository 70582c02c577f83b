/// Database row types — these map directly to SQLite rows.
/// Distinct from the datebook-types API models to keep the DB layer
/// independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct EventRow {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub event: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub created_at: String,
}
