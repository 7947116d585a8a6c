//! Persisted progression state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::session::TrainingSession;

/// Everything remembered between sessions.
///
/// `current_streak` is only ever recomputed by the progression engine from
/// `last_training_date`; nothing else sets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    /// Completed sessions in completion order. Append-only.
    #[serde(deserialize_with = "lenient::entries")]
    pub sessions: Vec<TrainingSession>,
    /// Unlocked badge ids in unlock order. Never shrinks.
    #[serde(deserialize_with = "lenient::entries")]
    pub badges: Vec<String>,
    /// Consecutive-day counter.
    #[serde(deserialize_with = "lenient::or_default")]
    pub current_streak: u32,
    /// Local calendar day of the most recent session.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "training_date"
    )]
    pub last_training_date: Option<NaiveDate>,
}

impl UserStats {
    /// Whether a badge has been unlocked.
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }

    /// Number of completed sessions.
    pub fn total_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// True before the first session is recorded.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.badges.is_empty() && self.last_training_date.is_none()
    }
}

/// Per-field recovery for the stats blob.
///
/// A field of the wrong type falls back to its default, and unreadable list
/// entries are skipped, so one bad value never discards the rest of the
/// history.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let raw = Value::deserialize(deserializer)?;
        match serde_json::from_value(raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable stats field, using default");
                Ok(T::default())
            }
        }
    }

    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            tracing::warn!("stats list is not an array, using empty list");
            return Ok(Vec::new());
        };

        let total = items.len();
        let kept: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if kept.len() < total {
            tracing::warn!(skipped = total - kept.len(), "skipped unreadable stats entries");
        }
        Ok(kept)
    }
}

/// Calendar-day (de)serialization for `lastTrainingDate`.
///
/// Written as `YYYY-MM-DD`. Reads also accept the `Fri Oct 16 2026` form;
/// anything else is dropped with a warning rather than failing the whole blob.
mod training_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    const LEGACY: &str = "%a %b %d %Y";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(day) => serializer.serialize_str(&day.format(ISO).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => Ok(parse(&text)),
            serde_json::Value::Null => Ok(None),
            other => {
                tracing::warn!(value = %other, "ignoring unreadable lastTrainingDate");
                Ok(None)
            }
        }
    }

    fn parse(text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        let parsed = NaiveDate::parse_from_str(text, ISO)
            .or_else(|_| NaiveDate::parse_from_str(text, LEGACY))
            .ok();
        if parsed.is_none() {
            tracing::warn!(value = text, "ignoring unreadable lastTrainingDate");
        }
        parsed
    }
}
