//! Core types for the quiz progress model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProgressError;

/// Which of the three boxes a card sits in after a review.
///
/// Serialized as a bare integer (1-3) to match the stored format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum BoxNumber {
    /// Answered correctly without hesitation.
    Learned = 1,
    /// Answered, but shakily.
    Uncertain = 2,
    /// Missed, or not yet seen.
    NotLearned = 3,
}

impl BoxNumber {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<BoxNumber> for i32 {
    fn from(box_number: BoxNumber) -> i32 {
        box_number as i32
    }
}

impl TryFrom<i32> for BoxNumber {
    type Error = ProgressError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Learned),
            2 => Ok(Self::Uncertain),
            3 => Ok(Self::NotLearned),
            _ => Err(ProgressError::InvalidBox { value }),
        }
    }
}

/// Per-card learning state within one card set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardProgress {
    #[serde(rename = "box")]
    pub box_number: BoxNumber,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: u32,
}

/// One review event as submitted by a client, before validation.
///
/// The box is kept as a raw integer so a single malformed event can be
/// screened out instead of failing the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReviewEvent {
    pub card_id: String,
    #[serde(rename = "box")]
    pub box_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_flip_seconds: Option<f64>,
}

/// A review event that passed validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub card_id: String,
    pub box_number: BoxNumber,
    pub time_to_flip_seconds: Option<f64>,
}

/// How many distinct cards ended a session in each box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxDistribution {
    pub box1: u32,
    pub box2: u32,
    pub box3: u32,
}

impl BoxDistribution {
    /// Tally one card into its box.
    pub fn add(&mut self, box_number: BoxNumber) {
        match box_number {
            BoxNumber::Learned => self.box1 += 1,
            BoxNumber::Uncertain => self.box2 += 1,
            BoxNumber::NotLearned => self.box3 += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.box1 + self.box2 + self.box3
    }
}

/// A completed quiz session, as read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: i64,
    pub flashcard_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashcard_title: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cards_reviewed: u32,
    pub distribution: BoxDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_to_flip_seconds: Option<f64>,
}
