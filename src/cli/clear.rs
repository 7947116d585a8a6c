//! Clear command for farsight.
//!
//! Erases all training stats, returning to first-run state. Settings are
//! kept.

use serde::Serialize;

use crate::storage::{KvStore, StatsStore};

/// Options for the clear command.
#[derive(Debug, Clone, Default)]
pub struct ClearOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Confirm the erase.
    pub yes: bool,
}

/// Output format for the clear command.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutput {
    pub success: bool,
    /// Sessions that were erased.
    pub sessions_removed: usize,
    /// Badges that were erased.
    pub badges_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClearOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sessions_removed: 0,
            badges_removed: 0,
            error: Some(error.into()),
        }
    }
}

/// The clear command implementation.
pub struct ClearCommand<K: KvStore> {
    stats: StatsStore<K>,
}

impl<K: KvStore> ClearCommand<K> {
    pub fn new(kv: K) -> Self {
        Self {
            stats: StatsStore::new(kv),
        }
    }

    /// Run the clear command. Refuses without `--yes`.
    pub fn run(&self, options: &ClearOptions) -> ClearOutput {
        if !options.yes {
            return ClearOutput::failure("refusing to erase stats without --yes");
        }

        let before = self.stats.load();
        if let Err(e) = self.stats.clear() {
            return ClearOutput::failure(e.to_string());
        }

        ClearOutput {
            success: true,
            sessions_removed: before.sessions.len(),
            badges_removed: before.badges.len(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ClearOutput, options: &ClearOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Clear failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        format!(
            "Erased {} session(s) and {} badge(s).\n",
            output.sessions_removed, output.badges_removed
        )
    }
}
