//! Stats command for farsight.
//!
//! Displays the home dashboard: today's sessions, streak, badges and
//! lifetime totals.

use serde::Serialize;

use crate::core::{Clock, TrainingSettings};
use crate::history::{dashboard, Dashboard};
use crate::storage::{KvStore, SettingsStore, StatsStore};

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub success: bool,
    pub dashboard: Dashboard,
    /// Configured session length.
    pub session_minutes: u32,
}

/// The stats command implementation.
pub struct StatsCommand<K: KvStore, C: Clock> {
    stats: StatsStore<K>,
    settings: SettingsStore<K>,
    clock: C,
}

impl<K: KvStore + Clone, C: Clock> StatsCommand<K, C> {
    pub fn new(kv: K, clock: C) -> Self {
        Self {
            stats: StatsStore::new(kv.clone()),
            settings: SettingsStore::new(kv),
            clock,
        }
    }

    /// Run the stats command. Never fails; unreadable data shows as empty.
    pub fn run(&self, _options: &StatsOptions) -> StatsOutput {
        let stats = self.stats.load();
        let settings: TrainingSettings = self.settings.load();
        StatsOutput {
            success: true,
            dashboard: dashboard(&stats, &self.clock),
            session_minutes: settings.total_duration_minutes,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            Self::format_human_readable(output)
        }
    }

    fn format_human_readable(output: &StatsOutput) -> String {
        let d = &output.dashboard;
        let mut lines = vec![
            "farsight".to_string(),
            "========".to_string(),
            format!("Today:        {} session(s)", d.sessions_today),
            format!("Streak:       {} day(s)", d.current_streak),
            format!("Badges:       {}/{}", d.badges.unlocked, d.badges.total),
            format!("Total:        {} session(s), {} min", d.summary.total_sessions, d.summary.total_minutes),
            format!("Session:      {} min", output.session_minutes),
        ];
        match d.last_training_date {
            Some(date) => lines.push(format!("Last trained: {}", date)),
            None => lines.push("No sessions yet. Run `farsight train` to start.".to_string()),
        }
        lines.join("\n") + "\n"
    }
}
