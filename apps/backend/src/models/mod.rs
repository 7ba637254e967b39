//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

// Re-export shared types from quizbox-core
pub use quizbox_core::report::{Achievements, DailyActivity, ReportSummary, StreakSummary};
pub use quizbox_core::session::DiscardedEvent;
pub use quizbox_core::types::{
    BoxDistribution, BoxNumber, CardProgress, QuizSession, RawReviewEvent,
};

// === Database Entity Types ===

/// User profile with API token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub api_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Composite key addressing one card's progress row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub user_id: Uuid,
    pub flashcard_id: String,
    pub card_id: String,
}

/// Card progress row in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardProgress {
    pub id: i64,
    pub user_id: Uuid,
    pub flashcard_id: String,
    pub card_id: String,
    #[sqlx(rename = "box")]
    #[serde(rename = "box")]
    pub box_number: i32,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DbCardProgress {
    /// Convert to the core progress type
    pub fn to_core_progress(&self) -> CardProgress {
        CardProgress {
            // box is constrained to 1-3 in the schema
            box_number: BoxNumber::try_from(self.box_number).unwrap_or(BoxNumber::NotLearned),
            last_reviewed: self.last_reviewed,
            review_count: self.review_count.max(0) as u32,
        }
    }

    /// Timestamp of the most recent write to this row
    pub fn touched_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Quiz session row in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuizSession {
    pub id: i64,
    pub user_id: Uuid,
    pub flashcard_id: String,
    pub flashcard_title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cards_reviewed: i32,
    pub box1_count: i32,
    pub box2_count: i32,
    pub box3_count: i32,
    pub duration_seconds: Option<i64>,
    pub average_time_to_flip_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl DbQuizSession {
    /// External session identifier
    pub fn session_id(&self) -> String {
        format!("sess_{}", self.id)
    }

    /// Convert to the core session type for report computations
    pub fn to_core_session(&self) -> QuizSession {
        QuizSession {
            id: self.id,
            flashcard_id: self.flashcard_id.clone(),
            flashcard_title: self.flashcard_title.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            cards_reviewed: self.cards_reviewed.max(0) as u32,
            distribution: BoxDistribution {
                box1: self.box1_count.max(0) as u32,
                box2: self.box2_count.max(0) as u32,
                box3: self.box3_count.max(0) as u32,
            },
            duration_seconds: self.duration_seconds,
            average_time_to_flip_seconds: self.average_time_to_flip_seconds,
        }
    }

    /// Convert to the nested entry used in progress responses
    pub fn to_history_entry(&self) -> SessionHistoryEntry {
        SessionHistoryEntry {
            session_id: self.session_id(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            cards_reviewed: self.cards_reviewed,
            box_distribution: BoxDistribution {
                box1: self.box1_count.max(0) as u32,
                box2: self.box2_count.max(0) as u32,
                box3: self.box3_count.max(0) as u32,
            },
            duration_seconds: self.duration_seconds,
        }
    }

    /// Convert to the flat entry used in learning reports
    pub fn to_report_session(&self) -> ReportSession {
        ReportSession {
            session_id: self.session_id(),
            flashcard_id: self.flashcard_id.clone(),
            flashcard_title: self.flashcard_title.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            cards_reviewed: self.cards_reviewed,
            box1_count: self.box1_count,
            box2_count: self.box2_count,
            box3_count: self.box3_count,
            duration_seconds: self.duration_seconds,
            average_time_to_flip_seconds: self.average_time_to_flip_seconds,
        }
    }
}

/// Build the card_id -> progress map from snapshot rows
pub fn progress_map(rows: &[DbCardProgress]) -> HashMap<String, CardProgress> {
    rows.iter()
        .map(|row| (row.card_id.clone(), row.to_core_progress()))
        .collect()
}

/// Latest write across snapshot rows
pub fn last_updated(rows: &[DbCardProgress]) -> Option<DateTime<Utc>> {
    rows.iter().map(|row| row.touched_at()).max()
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Progress types
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionHistoryEntry {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cards_reviewed: i32,
    pub box_distribution: BoxDistribution,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub user_id: Uuid,
    pub flashcard_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub cards: HashMap<String, CardProgress>,
    pub session_history: Vec<SessionHistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetProgressResponse {
    pub flashcard_id: String,
    pub deleted_cards: u64,
}

// Session types
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitSessionRequest {
    pub flashcard_title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub events: Vec<RawReviewEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscardedEventInfo {
    pub card_id: String,
    pub reason: String,
}

impl DiscardedEventInfo {
    pub fn from_event(event: &DiscardedEvent) -> Self {
        Self {
            card_id: event.card_id.clone(),
            reason: event.reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitSessionResponse {
    pub session: ReportSession,
    pub cards: HashMap<String, CardProgress>,
    pub discarded_events: Vec<DiscardedEventInfo>,
}

// Report types
#[derive(Debug, Serialize, Deserialize)]
pub struct LearningReportQuery {
    pub days: Option<u32>,
    pub flashcard_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSession {
    pub session_id: String,
    pub flashcard_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashcard_title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cards_reviewed: i32,
    pub box1_count: i32,
    pub box2_count: i32,
    pub box3_count: i32,
    pub duration_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_to_flip_seconds: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearningReportResponse {
    pub user_email: String,
    pub user_name: Option<String>,
    pub report_period_days: u32,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub streak: StreakSummary,
    pub achievements: Achievements,
    pub daily_activity: Vec<DailyActivity>,
    pub sessions: Vec<ReportSession>,
}
