//! Learning report endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::{LearningReportQuery, LearningReportResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::services::reports;
use crate::AppState;

/// GET /api/users/me/learning-report
pub async fn learning_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<LearningReportQuery>,
) -> Result<Json<LearningReportResponse>> {
    let report = reports::build_report(
        &state.db,
        auth.user_id,
        query.days.unwrap_or(reports::DEFAULT_REPORT_DAYS),
        query.flashcard_id.as_deref(),
    )
    .await?;

    Ok(Json(report))
}
