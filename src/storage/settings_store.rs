//! Persisted [`TrainingSettings`] blob.

use crate::core::TrainingSettings;
use crate::error::{FailOpen, Result};
use crate::storage::KvStore;

/// Storage key of the settings blob.
pub const SETTINGS_KEY: &str = "vision_quest_settings";

/// Handle to the settings blob.
#[derive(Debug, Clone)]
pub struct SettingsStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> SettingsStore<K> {
    /// Wrap a key-value store.
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Load settings, merging stored fields over the defaults.
    pub fn load(&self) -> TrainingSettings {
        let raw = self.kv.get(SETTINGS_KEY).fail_open_default("reading settings");
        match raw {
            Some(text) => {
                let parsed: Result<TrainingSettings> =
                    serde_json::from_str(&text).map_err(Into::into);
                parsed.fail_open_default("parsing settings")
            }
            None => TrainingSettings::default(),
        }
    }

    /// Validate and persist settings.
    pub fn save(&self, settings: &TrainingSettings) -> Result<()> {
        settings.validate()?;
        let json = serde_json::to_string(settings)?;
        self.kv.put(SETTINGS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BackgroundTheme;
    use crate::storage::MemoryKvStore;
    use std::sync::Arc;

    fn setup() -> (SettingsStore<Arc<MemoryKvStore>>, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (SettingsStore::new(Arc::clone(&kv)), kv)
    }

    #[test]
    fn test_load_defaults_when_missing() {
        let (store, _kv) = setup();
        assert_eq!(store.load(), TrainingSettings::default());
    }

    #[test]
    fn test_load_defaults_when_corrupt() {
        let (store, kv) = setup();
        kv.put(SETTINGS_KEY, "]]").unwrap();
        assert_eq!(store.load(), TrainingSettings::default());
    }

    #[test]
    fn test_partial_blob_merged() {
        let (store, kv) = setup();
        kv.put(SETTINGS_KEY, r#"{"voiceName":"Ting-Ting","backgroundTheme":"forest_meditation"}"#)
            .unwrap();

        let settings = store.load();
        assert_eq!(settings.voice_name, "Ting-Ting");
        assert_eq!(settings.background_theme, BackgroundTheme::ForestMeditation);
        assert_eq!(settings.total_duration_minutes, 5);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_save_round_trip() {
        let (store, _kv) = setup();
        let settings = TrainingSettings {
            total_duration_minutes: 10,
            encouragement_enabled: false,
            ..Default::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_save_rejects_unsupported_duration() {
        let (store, kv) = setup();
        let settings = TrainingSettings {
            total_duration_minutes: 4,
            ..Default::default()
        };
        assert!(store.save(&settings).is_err());
        assert!(!kv.contains(SETTINGS_KEY).unwrap());
    }
}
