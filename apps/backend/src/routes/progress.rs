//! Card progress endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;
use crate::models::{
    last_updated, progress_map, DiscardedEventInfo, ProgressResponse, ResetProgressResponse,
    SubmitSessionRequest, SubmitSessionResponse,
};
use crate::routes::auth::AuthenticatedUser;
use crate::services::sessions;
use crate::AppState;

/// Sessions returned inline with a progress snapshot.
const SESSION_HISTORY_LIMIT: i64 = 20;

/// GET /api/users/me/progress
/// Returns progress for every card set the user has touched
pub async fn get_all(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<HashMap<String, ProgressResponse>>> {
    let flashcard_ids = state.db.get_progress_flashcard_ids(auth.user_id).await?;

    let mut sets = HashMap::new();
    for flashcard_id in flashcard_ids {
        let progress = load_progress(&state.db, auth.user_id, &flashcard_id).await?;
        sets.insert(flashcard_id, progress);
    }

    Ok(Json(sets))
}

/// GET /api/users/me/progress/{flashcard_id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(flashcard_id): Path<String>,
) -> Result<Json<ProgressResponse>> {
    let progress = load_progress(&state.db, auth.user_id, &flashcard_id).await?;
    Ok(Json(progress))
}

/// DELETE /api/users/me/progress/{flashcard_id}
/// Clears per-card progress; session history is kept for reporting
pub async fn reset(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(flashcard_id): Path<String>,
) -> Result<Json<ResetProgressResponse>> {
    let deleted_cards = state.db.delete_progress(auth.user_id, &flashcard_id).await?;

    tracing::info!(
        "Reset progress for set {}: {} cards cleared",
        flashcard_id,
        deleted_cards
    );

    Ok(Json(ResetProgressResponse {
        flashcard_id,
        deleted_cards,
    }))
}

/// POST /api/users/me/progress/{flashcard_id}/sessions
/// Records one completed quiz session and applies its card outcomes
pub async fn submit_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(flashcard_id): Path<String>,
    Json(payload): Json<SubmitSessionRequest>,
) -> Result<Json<SubmitSessionResponse>> {
    let submitted =
        sessions::submit_session(&state.db, auth.user_id, &flashcard_id, payload).await?;

    Ok(Json(SubmitSessionResponse {
        session: submitted.session.to_report_session(),
        cards: progress_map(&submitted.snapshot),
        discarded_events: submitted
            .discarded
            .iter()
            .map(DiscardedEventInfo::from_event)
            .collect(),
    }))
}

/// Assemble one set's progress: the card map plus recent session history.
async fn load_progress(
    db: &Database,
    user_id: Uuid,
    flashcard_id: &str,
) -> Result<ProgressResponse> {
    let rows = db.get_progress_snapshot(user_id, flashcard_id).await?;
    let history = db
        .get_recent_sessions(user_id, flashcard_id, SESSION_HISTORY_LIMIT)
        .await?;

    Ok(ProgressResponse {
        user_id,
        flashcard_id: flashcard_id.to_string(),
        last_updated: last_updated(&rows),
        cards: progress_map(&rows),
        session_history: history.iter().map(|s| s.to_history_entry()).collect(),
    })
}
