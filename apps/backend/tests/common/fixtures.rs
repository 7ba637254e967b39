//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

/// Generate a unique email to avoid collisions between test runs.
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Generate a unique card set ID.
pub fn unique_flashcard_id(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a register request body.
pub fn register_request(email: &str, display_name: Option<&str>) -> serde_json::Value {
    match display_name {
        Some(name) => json!({ "email": email, "display_name": name }),
        None => json!({ "email": email }),
    }
}

/// Create a review event.
pub fn event(card_id: &str, box_number: i32) -> serde_json::Value {
    json!({ "card_id": card_id, "box": box_number })
}

/// Create a review event carrying a time-to-flip.
pub fn timed_event(card_id: &str, box_number: i32, seconds: f64) -> serde_json::Value {
    json!({ "card_id": card_id, "box": box_number, "time_to_flip_seconds": seconds })
}

/// Create a session submission body that ended just now.
pub fn session_request(events: Vec<serde_json::Value>) -> serde_json::Value {
    let completed = Utc::now();
    session_request_at(completed - Duration::minutes(5), completed, events)
}

/// Create a session submission body with explicit markers.
pub fn session_request_at(
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    events: Vec<serde_json::Value>,
) -> serde_json::Value {
    json!({
        "flashcard_title": "Practice set",
        "started_at": started_at,
        "completed_at": completed_at,
        "events": events,
    })
}
