//! Session aggregation.
//!
//! A client submits the raw review events of one quiz pass. Aggregation
//! screens out malformed events, collapses repeat reviews of the same card
//! down to the last event (the card's final box for the pass), and derives
//! the session summary that gets persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ProgressError, Result};
use crate::types::{BoxDistribution, BoxNumber, RawReviewEvent, ReviewEvent};

/// Why an event was screened out.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DiscardReason {
    #[error("box number {0} outside 1-3")]
    BoxOutOfRange(i32),

    #[error("negative time to flip ({0} seconds)")]
    NegativeFlipTime(f64),
}

/// An event dropped during screening, kept for reporting back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardedEvent {
    pub card_id: String,
    pub reason: DiscardReason,
}

/// The final box for one distinct card, in first-touch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub card_id: String,
    pub box_number: BoxNumber,
}

/// Derived facts about one aggregated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cards_reviewed: u32,
    pub distribution: BoxDistribution,
    pub duration_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_time_to_flip_seconds: Option<f64>,
}

/// Result of aggregating a session: the summary plus per-card outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub summary: SessionSummary,
    pub outcomes: Vec<CardOutcome>,
}

/// Split raw events into valid ones and screened-out ones.
///
/// A bad box number or negative flip time drops that single event; the
/// rest of the payload is unaffected.
pub fn validate_events(raw: &[RawReviewEvent]) -> (Vec<ReviewEvent>, Vec<DiscardedEvent>) {
    let mut valid = Vec::with_capacity(raw.len());
    let mut discarded = Vec::new();

    for event in raw {
        let box_number = match BoxNumber::try_from(event.box_number) {
            Ok(box_number) => box_number,
            Err(_) => {
                discarded.push(DiscardedEvent {
                    card_id: event.card_id.clone(),
                    reason: DiscardReason::BoxOutOfRange(event.box_number),
                });
                continue;
            }
        };

        if let Some(seconds) = event.time_to_flip_seconds {
            if seconds < 0.0 {
                discarded.push(DiscardedEvent {
                    card_id: event.card_id.clone(),
                    reason: DiscardReason::NegativeFlipTime(seconds),
                });
                continue;
            }
        }

        valid.push(ReviewEvent {
            card_id: event.card_id.clone(),
            box_number,
            time_to_flip_seconds: event.time_to_flip_seconds,
        });
    }

    (valid, discarded)
}

/// Aggregate validated events into a session outcome.
///
/// When the same card appears more than once, the last event wins; earlier
/// ones still count toward the flip-time average, since each reflects a real
/// look at the card. Outcomes keep the order cards were first seen in.
pub fn aggregate_session(
    events: &[ReviewEvent],
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
) -> Result<SessionOutcome> {
    if events.is_empty() {
        return Err(ProgressError::EmptySession);
    }

    let mut outcomes: Vec<CardOutcome> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for event in events {
        match index.get(event.card_id.as_str()) {
            Some(&at) => outcomes[at].box_number = event.box_number,
            None => {
                index.insert(event.card_id.as_str(), outcomes.len());
                outcomes.push(CardOutcome {
                    card_id: event.card_id.clone(),
                    box_number: event.box_number,
                });
            }
        }
    }

    let mut distribution = BoxDistribution::default();
    for outcome in &outcomes {
        distribution.add(outcome.box_number);
    }

    let cards_reviewed = outcomes.len() as u32;
    if distribution.total() != cards_reviewed {
        return Err(ProgressError::InconsistentAggregate {
            cards_reviewed,
            tallied: distribution.total(),
        });
    }

    let flip_times: Vec<f64> = events
        .iter()
        .filter_map(|event| event.time_to_flip_seconds)
        .collect();
    let average_time_to_flip_seconds = if flip_times.is_empty() {
        None
    } else {
        Some(flip_times.iter().sum::<f64>() / flip_times.len() as f64)
    };

    Ok(SessionOutcome {
        summary: SessionSummary {
            started_at,
            completed_at,
            cards_reviewed,
            distribution,
            duration_seconds: (completed_at - started_at).num_seconds().max(0),
            average_time_to_flip_seconds,
        },
        outcomes,
    })
}
