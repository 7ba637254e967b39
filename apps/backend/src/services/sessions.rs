//! Session submission orchestration

use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{DbCardProgress, DbQuizSession, DiscardedEvent, SubmitSessionRequest};
use quizbox_core::{aggregate_session, validate_events};

/// Everything a submit response is built from.
pub struct SubmittedSession {
    pub session: DbQuizSession,
    pub snapshot: Vec<DbCardProgress>,
    pub discarded: Vec<DiscardedEvent>,
}

/// Validate, aggregate, and persist one submitted session.
///
/// Malformed events are dropped (and reported back) rather than failing the
/// whole submission; a session with no valid events at all is rejected.
pub async fn submit_session(
    db: &Database,
    user_id: Uuid,
    flashcard_id: &str,
    request: SubmitSessionRequest,
) -> Result<SubmittedSession> {
    if request.completed_at < request.started_at {
        return Err(ApiError::BadRequest(
            "completed_at precedes started_at".to_string(),
        ));
    }

    let (events, discarded) = validate_events(&request.events);
    for dropped in &discarded {
        tracing::warn!(
            "Discarding review event for card {}: {}",
            dropped.card_id,
            dropped.reason
        );
    }

    let outcome = aggregate_session(&events, request.started_at, request.completed_at)?;

    let session = db
        .record_session(
            user_id,
            flashcard_id,
            request.flashcard_title.as_deref(),
            &outcome,
        )
        .await?;
    let snapshot = db.get_progress_snapshot(user_id, flashcard_id).await?;

    Ok(SubmittedSession {
        session,
        snapshot,
        discarded,
    })
}
