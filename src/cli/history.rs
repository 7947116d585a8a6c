//! History command for farsight.
//!
//! Shows lifetime totals, the 30-day activity heatmap, the cycle trend of
//! the latest sessions and a list of recent sessions.

use chrono::Local;
use serde::Serialize;

use crate::core::{Clock, TrainingSession};
use crate::history::{
    heatmap, recent, summary, trend, HeatmapDay, HistorySummary, TrendPoint,
    DEFAULT_RECENT_LIMIT,
};
use crate::storage::{KvStore, StatsStore};

/// Options for the history command.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum recent sessions to list.
    pub limit: Option<usize>,
}

/// Output format for the history command.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    pub success: bool,
    pub summary: HistorySummary,
    pub heatmap: Vec<HeatmapDay>,
    pub trend: Vec<TrendPoint>,
    pub recent: Vec<TrainingSession>,
}

/// The history command implementation.
pub struct HistoryCommand<K: KvStore, C: Clock> {
    stats: StatsStore<K>,
    clock: C,
}

impl<K: KvStore, C: Clock> HistoryCommand<K, C> {
    pub fn new(kv: K, clock: C) -> Self {
        Self {
            stats: StatsStore::new(kv),
            clock,
        }
    }

    /// Run the history command.
    pub fn run(&self, options: &HistoryOptions) -> HistoryOutput {
        let stats = self.stats.load();
        let limit = options.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

        HistoryOutput {
            success: true,
            summary: summary(&stats, &self.clock),
            heatmap: heatmap(&stats, &self.clock),
            trend: trend(&stats, &self.clock),
            recent: recent(&stats, limit).into_iter().cloned().collect(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HistoryOutput, options: &HistoryOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            Self::format_human_readable(output)
        }
    }

    fn format_human_readable(output: &HistoryOutput) -> String {
        let s = &output.summary;
        let mut lines = vec![format!(
            "{} session(s), {} min, {} day(s) in a row",
            s.total_sessions, s.total_minutes, s.calendar_streak
        )];

        lines.push(String::new());
        lines.push("Last 30 days (oldest first):".to_string());
        lines.push(format!("  {}", render_heatmap(&output.heatmap)));

        if !output.trend.is_empty() {
            lines.push(String::new());
            lines.push("Cycles per session:".to_string());
            for point in &output.trend {
                lines.push(format!(
                    "  {:>5}  {:<20} {}",
                    point.label,
                    "#".repeat(point.cycles.min(20) as usize),
                    point.cycles
                ));
            }
        }

        lines.push(String::new());
        if output.recent.is_empty() {
            lines.push("No sessions yet.".to_string());
        } else {
            lines.push("Recent sessions:".to_string());
            for session in &output.recent {
                let at = session.timestamp.with_timezone(&Local);
                lines.push(format!(
                    "  {}  {:>2} min  {:>2} cycle(s)  {}",
                    at.format("%m-%d %H:%M"),
                    session.duration_minutes,
                    session.cycles_completed,
                    session.earned_title.as_deref().unwrap_or("-")
                ));
            }
        }

        lines.join("\n") + "\n"
    }
}

/// One character per day, shaded by session count.
fn render_heatmap(days: &[HeatmapDay]) -> String {
    days.iter()
        .map(|d| match d.level() {
            0 => '·',
            1 => '░',
            2 => '▒',
            _ => '█',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, UserStats};
    use crate::storage::MemoryKvStore;
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;

    fn clock() -> FixedClock {
        FixedClock::at_noon(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn seeded_kv(count: usize) -> Arc<MemoryKvStore> {
        let kv = Arc::new(MemoryKvStore::new());
        let now = clock().now();
        let sessions = (0..count)
            .map(|i| {
                TrainingSession::new(now - Duration::days(i as i64), 5, i as u32)
                    .with_title("明眸卫士")
            })
            .collect();
        let stats = UserStats {
            sessions,
            ..Default::default()
        };
        StatsStore::new(Arc::clone(&kv)).save(&stats).unwrap();
        kv
    }

    #[test]
    fn test_history_empty() {
        let kv = Arc::new(MemoryKvStore::new());
        let cmd = HistoryCommand::new(kv, clock());
        let output = cmd.run(&HistoryOptions::default());

        assert_eq!(output.heatmap.len(), 30);
        assert!(output.trend.is_empty());
        assert!(output.recent.is_empty());

        let text = cmd.format_output(&output, &HistoryOptions::default());
        assert!(text.contains("No sessions yet."));
        assert!(text.contains(&"·".repeat(30)));
    }

    #[test]
    fn test_history_limit() {
        let cmd = HistoryCommand::new(seeded_kv(25), clock());
        let output = cmd.run(&HistoryOptions {
            limit: Some(3),
            ..Default::default()
        });

        assert_eq!(output.recent.len(), 3);
        assert_eq!(output.trend.len(), 10);
        assert_eq!(output.summary.total_sessions, 25);

        let default_output = cmd.run(&HistoryOptions::default());
        assert_eq!(default_output.recent.len(), 20);
    }

    #[test]
    fn test_history_text_lists_titles() {
        let cmd = HistoryCommand::new(seeded_kv(2), clock());
        let output = cmd.run(&HistoryOptions::default());
        let text = cmd.format_output(&output, &HistoryOptions::default());

        assert!(text.contains("Recent sessions:"));
        assert!(text.contains("明眸卫士"));
        assert!(text.contains("Cycles per session:"));
    }

    #[test]
    fn test_render_heatmap_levels() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let days: Vec<HeatmapDay> = [0, 1, 2, 7]
            .iter()
            .map(|&count| HeatmapDay { date, count })
            .collect();
        assert_eq!(render_heatmap(&days), "·░▒█");
    }
}
