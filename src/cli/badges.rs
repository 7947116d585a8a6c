//! Badges command for farsight.
//!
//! Lists the badge catalog with the user's unlocked badges marked.

use serde::Serialize;

use crate::core::{IconType, BADGES};
use crate::history::{badge_progress, BadgeProgress};
use crate::storage::{KvStore, StatsStore};

/// Options for the badges command.
#[derive(Debug, Clone, Default)]
pub struct BadgesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One catalog entry with its unlock state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_type: IconType,
    pub unlocked: bool,
}

/// Output format for the badges command.
#[derive(Debug, Clone, Serialize)]
pub struct BadgesOutput {
    pub success: bool,
    pub badges: Vec<BadgeInfo>,
    pub progress: BadgeProgress,
}

/// The badges command implementation.
pub struct BadgesCommand<K: KvStore> {
    stats: StatsStore<K>,
}

impl<K: KvStore> BadgesCommand<K> {
    pub fn new(kv: K) -> Self {
        Self {
            stats: StatsStore::new(kv),
        }
    }

    /// Run the badges command.
    pub fn run(&self, _options: &BadgesOptions) -> BadgesOutput {
        let stats = self.stats.load();
        let badges = BADGES
            .iter()
            .map(|b| BadgeInfo {
                id: b.id,
                name: b.name,
                description: b.description,
                icon_type: b.icon_type,
                unlocked: stats.has_badge(b.id),
            })
            .collect();

        BadgesOutput {
            success: true,
            badges,
            progress: badge_progress(&stats),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &BadgesOutput, options: &BadgesOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        let mut lines = vec![format!(
            "Badges {}/{}",
            output.progress.unlocked, output.progress.total
        )];
        for badge in &output.badges {
            let mark = if badge.unlocked { "[x]" } else { "[ ]" };
            lines.push(format!("  {} {}  {}", mark, badge.name, badge.description));
        }
        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserStats;
    use crate::storage::MemoryKvStore;
    use std::sync::Arc;

    #[test]
    fn test_all_locked_on_first_run() {
        let cmd = BadgesCommand::new(Arc::new(MemoryKvStore::new()));
        let output = cmd.run(&BadgesOptions::default());

        assert_eq!(output.badges.len(), 6);
        assert!(output.badges.iter().all(|b| !b.unlocked));
        assert_eq!(output.progress.unlocked, 0);
    }

    #[test]
    fn test_unlocked_marked() {
        let kv = Arc::new(MemoryKvStore::new());
        let stats = UserStats {
            badges: vec!["b1".to_string(), "b5".to_string()],
            ..Default::default()
        };
        StatsStore::new(Arc::clone(&kv)).save(&stats).unwrap();

        let cmd = BadgesCommand::new(kv);
        let output = cmd.run(&BadgesOptions::default());
        let unlocked: Vec<&str> = output
            .badges
            .iter()
            .filter(|b| b.unlocked)
            .map(|b| b.id)
            .collect();
        assert_eq!(unlocked, vec!["b1", "b5"]);

        let text = cmd.format_output(&output, &BadgesOptions::default());
        assert!(text.starts_with("Badges 2/6"));
        assert!(text.contains("[x] 初出茅庐"));
        assert!(text.contains("[ ] 坚持不懈"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let cmd = BadgesCommand::new(Arc::new(MemoryKvStore::new()));
        let output = cmd.run(&BadgesOptions::default());
        let options = BadgesOptions {
            json: true,
            ..Default::default()
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();
        assert_eq!(parsed["badges"][3]["iconType"], "moon");
    }
}
