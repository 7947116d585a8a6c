//! Settings command for farsight.
//!
//! Shows or changes the persisted training settings.

use serde::Serialize;

use crate::core::{BackgroundTheme, TrainingSettings};
use crate::storage::{KvStore, SettingsStore};

/// Options for the settings command.
#[derive(Debug, Clone, Default)]
pub struct SettingsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Requested changes. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub minutes: Option<u32>,
    pub sound: Option<bool>,
    pub encouragement: Option<bool>,
    pub voice: Option<String>,
    pub rate: Option<f64>,
    pub theme: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.minutes.is_none()
            && self.sound.is_none()
            && self.encouragement.is_none()
            && self.voice.is_none()
            && self.rate.is_none()
            && self.theme.is_none()
    }

    /// Apply to `settings`, returning the names of changed fields.
    fn apply(&self, settings: &mut TrainingSettings) -> Result<Vec<String>, String> {
        let mut changed = Vec::new();

        if let Some(minutes) = self.minutes {
            settings.total_duration_minutes = minutes;
            changed.push("totalDurationMinutes".to_string());
        }
        if let Some(sound) = self.sound {
            settings.sound_enabled = sound;
            changed.push("soundEnabled".to_string());
        }
        if let Some(encouragement) = self.encouragement {
            settings.encouragement_enabled = encouragement;
            changed.push("encouragementEnabled".to_string());
        }
        if let Some(voice) = &self.voice {
            settings.voice_name = voice.clone();
            changed.push("voiceName".to_string());
        }
        if let Some(rate) = self.rate {
            settings.speaking_rate = rate;
            changed.push("speakingRate".to_string());
        }
        if let Some(theme) = &self.theme {
            settings.background_theme = theme
                .parse::<BackgroundTheme>()
                .map_err(|e| e.to_string())?;
            changed.push("backgroundTheme".to_string());
        }

        Ok(changed)
    }
}

/// Output format for the settings command.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsOutput {
    pub success: bool,
    pub settings: TrainingSettings,
    /// Fields written by this invocation.
    pub changed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The settings command implementation.
pub struct SettingsCommand<K: KvStore> {
    store: SettingsStore<K>,
}

impl<K: KvStore> SettingsCommand<K> {
    pub fn new(kv: K) -> Self {
        Self {
            store: SettingsStore::new(kv),
        }
    }

    /// Current settings.
    pub fn show(&self) -> SettingsOutput {
        SettingsOutput {
            success: true,
            settings: self.store.load(),
            changed: Vec::new(),
            error: None,
        }
    }

    /// Apply `update` and persist. Nothing is written if any value is invalid.
    pub fn set(&self, update: &SettingsUpdate) -> SettingsOutput {
        let mut settings = self.store.load();

        let fail = |settings: TrainingSettings, error: String| SettingsOutput {
            success: false,
            settings,
            changed: Vec::new(),
            error: Some(error),
        };

        if update.is_empty() {
            return fail(settings, "nothing to change".to_string());
        }

        let changed = match update.apply(&mut settings) {
            Ok(changed) => changed,
            Err(e) => return fail(self.store.load(), e),
        };

        if let Err(e) = self.store.save(&settings) {
            return fail(self.store.load(), e.to_string());
        }
        tracing::info!(fields = ?changed, "settings updated");

        SettingsOutput {
            success: true,
            settings,
            changed,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SettingsOutput, options: &SettingsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Settings not saved: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let s = &output.settings;
        let voice = if s.voice_name.is_empty() {
            "(default)"
        } else {
            s.voice_name.as_str()
        };
        let mut lines = vec![
            format!("Session length: {} min", s.total_duration_minutes),
            format!("Countdown beep: {}", on_off(s.sound_enabled)),
            format!("Encouragement:  {}", on_off(s.encouragement_enabled)),
            format!("Voice:          {}", voice),
            format!("Speaking rate:  {:.1}", s.speaking_rate),
            format!("Theme:          {}", s.background_theme.as_str()),
        ];
        if !output.changed.is_empty() {
            lines.push(format!("Updated: {}", output.changed.join(", ")));
        }
        lines.join("\n") + "\n"
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use std::sync::Arc;

    fn command() -> SettingsCommand<Arc<MemoryKvStore>> {
        SettingsCommand::new(Arc::new(MemoryKvStore::new()))
    }

    #[test]
    fn test_show_defaults() {
        let cmd = command();
        let output = cmd.show();
        assert!(output.success);
        assert_eq!(output.settings, TrainingSettings::default());

        let text = cmd.format_output(&output, &SettingsOptions::default());
        assert!(text.contains("Session length: 5 min"));
        assert!(text.contains("Voice:          (default)"));
        assert!(text.contains("Theme:          none"));
    }

    #[test]
    fn test_set_persists() {
        let cmd = command();
        let update = SettingsUpdate {
            minutes: Some(10),
            sound: Some(false),
            theme: Some("forest".to_string()),
            ..Default::default()
        };
        let output = cmd.set(&update);

        assert!(output.success);
        assert_eq!(
            output.changed,
            vec!["totalDurationMinutes", "soundEnabled", "backgroundTheme"]
        );

        let reloaded = cmd.show().settings;
        assert_eq!(reloaded.total_duration_minutes, 10);
        assert!(!reloaded.sound_enabled);
        assert_eq!(reloaded.background_theme, BackgroundTheme::ForestMeditation);
    }

    #[test]
    fn test_invalid_duration_not_saved() {
        let cmd = command();
        let output = cmd.set(&SettingsUpdate {
            minutes: Some(7),
            voice: Some("Ting-Ting".to_string()),
            ..Default::default()
        });

        assert!(!output.success);
        assert!(output.error.unwrap().contains("duration 7"));
        assert_eq!(cmd.show().settings, TrainingSettings::default());
    }

    #[test]
    fn test_invalid_theme_not_saved() {
        let cmd = command();
        let output = cmd.set(&SettingsUpdate {
            theme: Some("ocean".to_string()),
            ..Default::default()
        });
        assert!(!output.success);
        assert!(output.error.unwrap().contains("ocean"));
    }

    #[test]
    fn test_invalid_rate_not_saved() {
        let cmd = command();
        let output = cmd.set(&SettingsUpdate {
            rate: Some(0.0),
            ..Default::default()
        });
        assert!(!output.success);
        assert_eq!(cmd.show().settings.speaking_rate, 1.0);
    }

    #[test]
    fn test_empty_update_rejected() {
        let cmd = command();
        let output = cmd.set(&SettingsUpdate::default());
        assert!(!output.success);
        assert_eq!(output.error.as_deref(), Some("nothing to change"));
    }
}
