use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::NaiveTime;

use datebook_types::api::{Claims, CreateEventRequest, CreatedEvent, EventResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// Event labels are capped so they fit a day cell in the month grid.
const MAX_LABEL_CHARS: usize = 16;

/// GET /api/events — every event owned by the caller, ordered by date
/// ascending and then insertion order within a date.
pub async fn list_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let user_id = claims.sub;

    // Run the blocking DB query off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.events_for_user(user_id))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    let events = rows
        .into_iter()
        .map(|row| EventResponse {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            event: row.event,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(events))
}

/// POST /api/events — create an event on a date for the caller.
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<CreatedEvent>, ApiError> {
    let (date, label, start_time) = match (req.date, req.event, req.start_time) {
        (Some(d), Some(l), Some(s)) if !d.is_empty() && !l.is_empty() && !s.is_empty() => (d, l, s),
        _ => return Err(ApiError::validation("Date, event and start time are required")),
    };

    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(ApiError::validation("Event must be 16 characters or less"));
    }

    let start = parse_time(&start_time).ok_or_else(|| ApiError::validation("Invalid time format"))?;

    // An empty endTime from the form means "no end time".
    let end_time = req.end_time.filter(|s| !s.is_empty());
    if let Some(ref raw) = end_time {
        let end = parse_time(raw).ok_or_else(|| ApiError::validation("Invalid time format"))?;
        if end <= start {
            return Err(ApiError::validation("End time must be later than start time"));
        }
    }

    let user_id = claims.sub;
    let db = state.clone();
    let (d, l, s, e) = (date.clone(), label.clone(), start_time.clone(), end_time.clone());
    let id = tokio::task::spawn_blocking(move || {
        db.db.create_event(user_id, &d, &l, &s, e.as_deref())
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(ApiError::internal)?;

    Ok(Json(CreatedEvent {
        id,
        date,
        event: label,
        start_time,
        end_time,
    }))
}

/// DELETE /api/events/{id} — remove an event, but only for its owner.
/// A missing row and a row owned by someone else are indistinguishable
/// to the caller: both are 404.
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(event_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = claims.sub;

    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_event(user_id, event_id))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Accepts 24-hour wall-clock times; the parsed value is only used for
/// ordering checks, the original string is what gets stored.
fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::parse_time;

    #[test]
    fn accepts_valid_times() {
        assert!(parse_time("00:00").is_some());
        assert!(parse_time("09:30").is_some());
        assert!(parse_time("23:59").is_some());
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("12:60").is_none());
        assert!(parse_time("noon").is_none());
        assert!(parse_time("12:00:30").is_none());
        assert!(parse_time("").is_none());
    }

    #[test]
    fn parsed_times_order_chronologically() {
        assert!(parse_time("09:30").unwrap() < parse_time("10:00").unwrap());
        assert!(parse_time("12:00").unwrap() == parse_time("12:00").unwrap());
    }
}
