//! Learning report computations.
//!
//! Everything here is derived from stored sessions plus a progress snapshot.
//! Nothing is persisted; reports are rebuilt on every request.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{BoxDistribution, QuizSession};

/// Streak lengths (in days) that earn an achievement.
pub const STREAK_MILESTONES: [u32; 8] = [3, 7, 14, 30, 60, 90, 180, 365];

/// Activity totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub sessions: u32,
    pub cards_reviewed: u32,
}

/// Current and longest consecutive-day study streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Earned streak milestones plus progress toward the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    pub earned: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    pub progress_percent: u8,
}

/// Roll-up of every session in the report window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_sessions: u32,
    pub total_cards_reviewed: u32,
    pub total_learned: u32,
    pub total_uncertain: u32,
    pub total_not_learned: u32,
    pub total_duration_seconds: i64,
    pub average_session_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_to_flip_seconds: Option<f64>,
}

/// Bucket sessions into one entry per day, oldest first.
///
/// The window is the `days` calendar days ending at `today` (UTC). Days
/// without activity are zero-filled so charts stay contiguous, and sessions
/// outside the window are ignored.
pub fn compute_daily_activity(
    sessions: &[QuizSession],
    days: u32,
    today: NaiveDate,
) -> Vec<DailyActivity> {
    let days = days.max(1);
    let start = today - Duration::days(i64::from(days) - 1);

    let mut buckets: Vec<DailyActivity> = (0..days)
        .map(|offset| DailyActivity {
            date: start + Duration::days(i64::from(offset)),
            sessions: 0,
            cards_reviewed: 0,
        })
        .collect();

    for session in sessions {
        let day = session.completed_at.date_naive();
        if day < start || day > today {
            continue;
        }
        let at = (day - start).num_days() as usize;
        buckets[at].sessions += 1;
        buckets[at].cards_reviewed += session.cards_reviewed;
    }

    buckets
}

/// Compute streaks from daily buckets ordered oldest to newest.
///
/// The last bucket is today. A quiet day today leaves the current streak
/// intact (the user may still study); any earlier quiet day ends it.
pub fn compute_streaks(daily: &[DailyActivity]) -> StreakSummary {
    let mut current_streak = 0;
    for (at, day) in daily.iter().enumerate().rev() {
        if day.sessions > 0 {
            current_streak += 1;
        } else if at == daily.len() - 1 {
            continue;
        } else {
            break;
        }
    }

    let mut longest_streak = 0;
    let mut run = 0;
    for day in daily {
        if day.sessions > 0 {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 0;
        }
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}

/// Map a longest streak onto earned milestones and progress to the next.
///
/// Progress is linear between the previous milestone (or zero) and the next
/// one, rounded to a whole percent.
pub fn compute_achievements(longest_streak: u32) -> Achievements {
    let earned: Vec<u32> = STREAK_MILESTONES
        .iter()
        .copied()
        .filter(|milestone| *milestone <= longest_streak)
        .collect();
    let next = STREAK_MILESTONES
        .iter()
        .copied()
        .find(|milestone| *milestone > longest_streak);

    let progress_percent = match next {
        Some(next_milestone) => {
            let base = earned.last().copied().unwrap_or(0);
            let span = next_milestone - base;
            let into = longest_streak.saturating_sub(base);
            let percent = (f64::from(into) / f64::from(span) * 100.0).round() as u8;
            percent.min(100)
        }
        None => 100,
    };

    Achievements {
        earned,
        next,
        progress_percent,
    }
}

/// Roll sessions and the current box snapshot into one summary.
///
/// Averages cover only sessions that recorded the relevant value; with no
/// sessions at all the summary comes back zeroed.
pub fn summarize_sessions(sessions: &[QuizSession], snapshot: &BoxDistribution) -> ReportSummary {
    let total_cards_reviewed = sessions.iter().map(|s| s.cards_reviewed).sum();

    let durations: Vec<i64> = sessions.iter().filter_map(|s| s.duration_seconds).collect();
    let total_duration_seconds: i64 = durations.iter().sum();
    let average_session_duration = if durations.is_empty() {
        0.0
    } else {
        total_duration_seconds as f64 / durations.len() as f64
    };

    let flip_averages: Vec<f64> = sessions
        .iter()
        .filter_map(|s| s.average_time_to_flip_seconds)
        .collect();
    let average_time_to_flip_seconds = if flip_averages.is_empty() {
        None
    } else {
        Some(flip_averages.iter().sum::<f64>() / flip_averages.len() as f64)
    };

    ReportSummary {
        total_sessions: sessions.len() as u32,
        total_cards_reviewed,
        total_learned: snapshot.box1,
        total_uncertain: snapshot.box2,
        total_not_learned: snapshot.box3,
        total_duration_seconds,
        average_session_duration,
        average_time_to_flip_seconds,
    }
}
