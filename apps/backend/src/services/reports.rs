//! Learning report assembly

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::LearningReportResponse;
use quizbox_core::{
    compute_achievements, compute_daily_activity, compute_streaks, summarize_sessions,
};

/// Window applied when the request does not name one.
pub const DEFAULT_REPORT_DAYS: u32 = 30;

const MAX_REPORT_DAYS: u32 = 365;

/// Build the learning report for one user.
///
/// Reports are derived on every request from the session log and the current
/// progress snapshot; nothing report-shaped is stored.
pub async fn build_report(
    db: &Database,
    user_id: Uuid,
    days: u32,
    flashcard_id: Option<&str>,
) -> Result<LearningReportResponse> {
    let days = days.clamp(1, MAX_REPORT_DAYS);
    let now = Utc::now();
    let since = now - Duration::days(i64::from(days));

    let profile = db
        .get_user_profile(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    let db_sessions = db
        .get_sessions_in_window(user_id, since, now, flashcard_id)
        .await?;
    let distribution = db.get_box_distribution(user_id, flashcard_id).await?;

    let sessions: Vec<_> = db_sessions.iter().map(|s| s.to_core_session()).collect();
    let summary = summarize_sessions(&sessions, &distribution);
    let daily_activity = compute_daily_activity(&sessions, days, now.date_naive());
    let streak = compute_streaks(&daily_activity);
    let achievements = compute_achievements(streak.longest_streak);

    Ok(LearningReportResponse {
        user_email: profile.email,
        user_name: profile.display_name,
        report_period_days: days,
        generated_at: now,
        summary,
        streak,
        achievements,
        daily_activity,
        sessions: db_sessions.iter().map(|s| s.to_report_session()).collect(),
    })
}
