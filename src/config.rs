//! Configuration loading for farsight.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.farsight/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. Training settings chosen by the user
//! (duration, voice, theme) are not configuration; they live in the settings
//! blob next to the stats.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FailOpen, FarsightError, Result};

/// Main configuration struct for farsight.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the stats and settings blobs are kept.
    pub storage: StorageConfig,
    /// Terminal feedback tuning.
    pub feedback: FeedbackConfig,
}

/// Storage location configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; `<home>/data` when unset.
    pub data_dir: Option<PathBuf>,
}

/// Feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Countdown tone frequency.
    pub beep_frequency_hz: u32,
    /// Countdown tone length.
    pub beep_duration_ms: u32,
    /// Whether countdown cues fire at all.
    pub countdown_cues: bool,
    /// Vibration pattern on entering NEAR (on/off milliseconds).
    pub near_vibration: Vec<u32>,
    /// Vibration pattern on entering FAR.
    pub far_vibration: Vec<u32>,
}

/// Audible tone range accepted for the countdown beep.
pub const BEEP_FREQUENCY_RANGE: std::ops::RangeInclusive<u32> = 20..=20_000;

/// Accepted countdown beep lengths.
pub const BEEP_DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=1_000;

impl FeedbackConfig {
    /// Check if a beep frequency is audible.
    pub fn is_valid_frequency(value: u32) -> bool {
        BEEP_FREQUENCY_RANGE.contains(&value)
    }

    /// Check if a beep duration is within range.
    pub fn is_valid_duration(value: u32) -> bool {
        BEEP_DURATION_RANGE.contains(&value)
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            beep_frequency_hz: 1000,
            beep_duration_ms: 40,
            countdown_cues: true,
            near_vibration: vec![200, 100, 200],
            far_vibration: vec![300],
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.farsight/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = farsight_home()?.join("config.toml");
        if !path.exists() {
            return None;
        }
        Self::load_from_file(&path)
            .map(Some)
            .fail_open_with(&format!("ignoring {}", path.display()), None)
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| FarsightError::storage(path, e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| FarsightError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the feedback layer cannot use.
    pub fn validate(&self) -> Result<()> {
        let fb = &self.feedback;
        if !FeedbackConfig::is_valid_frequency(fb.beep_frequency_hz) {
            return Err(FarsightError::config(format!(
                "feedback.beep_frequency_hz {} is outside {:?}",
                fb.beep_frequency_hz, BEEP_FREQUENCY_RANGE
            )));
        }
        if !FeedbackConfig::is_valid_duration(fb.beep_duration_ms) {
            return Err(FarsightError::config(format!(
                "feedback.beep_duration_ms {} is outside {:?}",
                fb.beep_duration_ms, BEEP_DURATION_RANGE
            )));
        }
        if fb.near_vibration.is_empty() || fb.far_vibration.is_empty() {
            return Err(FarsightError::config(
                "vibration patterns must have at least one step",
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// Invalid values are reported and the current value is kept.
    fn apply_env_overrides(&mut self) {
        // FARSIGHT_DATA_DIR
        if let Ok(val) = env::var("FARSIGHT_DATA_DIR") {
            if val.is_empty() {
                tracing::warn!("FARSIGHT_DATA_DIR is empty, ignoring");
            } else {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }

        // FARSIGHT_BEEP_FREQUENCY
        if let Ok(val) = env::var("FARSIGHT_BEEP_FREQUENCY") {
            match val.parse::<u32>() {
                Ok(n) if FeedbackConfig::is_valid_frequency(n) => {
                    self.feedback.beep_frequency_hz = n;
                }
                Ok(n) => tracing::warn!(
                    "Invalid FARSIGHT_BEEP_FREQUENCY value '{}'. Must be in {:?}. Using '{}'.",
                    n,
                    BEEP_FREQUENCY_RANGE,
                    self.feedback.beep_frequency_hz
                ),
                Err(_) => tracing::warn!(
                    "Invalid FARSIGHT_BEEP_FREQUENCY value '{}'. Expected a positive integer. Using '{}'.",
                    val,
                    self.feedback.beep_frequency_hz
                ),
            }
        }

        // FARSIGHT_BEEP_DURATION_MS
        if let Ok(val) = env::var("FARSIGHT_BEEP_DURATION_MS") {
            match val.parse::<u32>() {
                Ok(n) if FeedbackConfig::is_valid_duration(n) => {
                    self.feedback.beep_duration_ms = n;
                }
                Ok(n) => tracing::warn!(
                    "Invalid FARSIGHT_BEEP_DURATION_MS value '{}'. Must be in {:?}. Using '{}'.",
                    n,
                    BEEP_DURATION_RANGE,
                    self.feedback.beep_duration_ms
                ),
                Err(_) => tracing::warn!(
                    "Invalid FARSIGHT_BEEP_DURATION_MS value '{}'. Expected a positive integer. Using '{}'.",
                    val,
                    self.feedback.beep_duration_ms
                ),
            }
        }

        // FARSIGHT_COUNTDOWN_CUES
        if let Ok(val) = env::var("FARSIGHT_COUNTDOWN_CUES") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.feedback.countdown_cues = true,
                "false" | "0" | "no" | "off" => self.feedback.countdown_cues = false,
                _ => tracing::warn!(
                    "Invalid FARSIGHT_COUNTDOWN_CUES value '{}'. Expected true or false. Using '{}'.",
                    val,
                    self.feedback.countdown_cues
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Non-default fields from `other` win. As with any default-comparison
    /// merge, a layer cannot set a value back to its default once a lower
    /// layer changed it.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        let default_fb = FeedbackConfig::default();
        if other.feedback.beep_frequency_hz != default_fb.beep_frequency_hz {
            self.feedback.beep_frequency_hz = other.feedback.beep_frequency_hz;
        }
        if other.feedback.beep_duration_ms != default_fb.beep_duration_ms {
            self.feedback.beep_duration_ms = other.feedback.beep_duration_ms;
        }
        if other.feedback.countdown_cues != default_fb.countdown_cues {
            self.feedback.countdown_cues = other.feedback.countdown_cues;
        }
        if other.feedback.near_vibration != default_fb.near_vibration {
            self.feedback.near_vibration = other.feedback.near_vibration;
        }
        if other.feedback.far_vibration != default_fb.far_vibration {
            self.feedback.far_vibration = other.feedback.far_vibration;
        }

        self
    }

    /// The data directory this config points at.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Some(dir.clone()),
            None => farsight_home().map(|home| home.join("data")),
        }
    }
}

/// Get the farsight home directory.
///
/// Checks `FARSIGHT_HOME` first, then falls back to `~/.farsight`. An empty
/// `FARSIGHT_HOME` is ignored.
pub fn farsight_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("FARSIGHT_HOME") {
        if home.is_empty() {
            tracing::warn!("FARSIGHT_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("FARSIGHT_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".farsight"));
    }

    // Containers without HOME
    let fallback_path = fallback_farsight_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

#[cfg(unix)]
fn fallback_farsight_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/farsight-{}", uid))
}

#[cfg(not(unix))]
fn fallback_farsight_home() -> PathBuf {
    std::env::temp_dir().join("farsight")
}

/// Directory holding the stats and settings blobs.
pub fn data_dir() -> Option<PathBuf> {
    Config::load().resolved_data_dir()
}

/// Path of the crash log written by the panic hook.
pub fn crash_log_path() -> Option<PathBuf> {
    farsight_home().map(|home| home.join("crash.log"))
}
