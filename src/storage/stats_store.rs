//! Persisted [`UserStats`] snapshot.

use crate::core::UserStats;
use crate::error::{FailOpen, Result};
use crate::storage::KvStore;

/// Storage key of the stats blob.
pub const STATS_KEY: &str = "vision_quest_stats";

/// Handle to the stats snapshot.
///
/// Reads never fail: a missing or corrupt blob yields the zero value.
/// Writes replace the whole snapshot.
#[derive(Debug, Clone)]
pub struct StatsStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> StatsStore<K> {
    /// Wrap a key-value store.
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Load the persisted stats, or the zero value.
    pub fn load(&self) -> UserStats {
        let raw = self.kv.get(STATS_KEY).fail_open_default("reading stats");
        match raw {
            Some(text) => {
                let parsed: Result<UserStats> = serde_json::from_str(&text).map_err(Into::into);
                parsed.fail_open_default("parsing stats")
            }
            None => UserStats::default(),
        }
    }

    /// Overwrite the persisted snapshot.
    pub fn save(&self, stats: &UserStats) -> Result<()> {
        let json = serde_json::to_string(stats)?;
        self.kv.put(STATS_KEY, &json)?;
        tracing::debug!(
            sessions = stats.sessions.len(),
            badges = stats.badges.len(),
            "stats saved"
        );
        Ok(())
    }

    /// Erase all stats, returning to first-run state.
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(STATS_KEY)?;
        tracing::info!("stats cleared");
        Ok(())
    }
}
