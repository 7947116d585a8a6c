//! Training phases and completed-session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds spent looking into the distance per cycle.
pub const FAR_PHASE_SECONDS: u32 = 30;

/// Seconds spent focusing on a near point per cycle.
pub const NEAR_PHASE_SECONDS: u32 = 5;

/// One of the two alternating focus states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingPhase {
    /// Look into the distance.
    Far,
    /// Look at a close point (a fingertip).
    Near,
}

impl TrainingPhase {
    /// Length of this phase in seconds.
    pub fn duration_seconds(self) -> u32 {
        match self {
            TrainingPhase::Far => FAR_PHASE_SECONDS,
            TrainingPhase::Near => NEAR_PHASE_SECONDS,
        }
    }

    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            TrainingPhase::Far => TrainingPhase::Near,
            TrainingPhase::Near => TrainingPhase::Far,
        }
    }

    /// Short on-screen label.
    pub fn label(self) -> &'static str {
        match self {
            TrainingPhase::Far => "眺望远方",
            TrainingPhase::Near => "盯住指尖",
        }
    }
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingPhase::Far => write!(f, "FAR"),
            TrainingPhase::Near => write!(f, "NEAR"),
        }
    }
}

/// A completed training run as stored in the history.
///
/// Created once when a session finishes and never changed after it is
/// appended to [`UserStats::sessions`](crate::core::UserStats).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    /// Generation-time identifier (epoch milliseconds as a string).
    pub id: String,
    /// When the session completed.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Configured total length of the session.
    pub duration_minutes: u32,
    /// Number of NEAR→FAR round-trips finished.
    pub cycles_completed: u32,
    /// Title drawn when the session was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_title: Option<String>,
}

impl TrainingSession {
    /// Create an untitled session record completed at `timestamp`.
    ///
    /// The timestamp is truncated to whole milliseconds, the precision it is
    /// stored with.
    pub fn new(timestamp: DateTime<Utc>, duration_minutes: u32, cycles_completed: u32) -> Self {
        let timestamp =
            DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp);
        Self {
            id: timestamp.timestamp_millis().to_string(),
            timestamp,
            duration_minutes,
            cycles_completed,
            earned_title: None,
        }
    }

    /// Attach the earned title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.earned_title = Some(title.into());
        self
    }
}
