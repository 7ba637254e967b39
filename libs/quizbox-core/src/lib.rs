//! Core quiz progress library shared by the backend service.
//!
//! Provides:
//! - The three-box progress model (box 1 learned, 2 uncertain, 3 not learned)
//! - Session aggregation (event screening, last-event-wins dedup, summaries)
//! - Learning report computations (daily activity, streaks, achievements)

pub mod error;
pub mod report;
pub mod session;
pub mod types;

pub use error::{ProgressError, Result};
pub use report::{
    compute_achievements, compute_daily_activity, compute_streaks, summarize_sessions,
    Achievements, DailyActivity, ReportSummary, StreakSummary, STREAK_MILESTONES,
};
pub use session::{
    aggregate_session, validate_events, CardOutcome, DiscardReason, DiscardedEvent,
    SessionOutcome, SessionSummary,
};
pub use types::{
    BoxDistribution, BoxNumber, CardProgress, QuizSession, RawReviewEvent, ReviewEvent,
};
