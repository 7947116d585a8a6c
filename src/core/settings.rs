//! User-facing training settings.
//!
//! Stored as a JSON blob. Every field has a default, and a partial blob is
//! merged field by field over those defaults when it is read.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FarsightError, Result};

/// Session lengths offered to the user, in minutes.
pub const DURATION_CHOICES: [u32; 3] = [3, 5, 10];

/// Accepted speaking-rate range for speech feedback.
pub const SPEAKING_RATE_RANGE: std::ops::RangeInclusive<f64> = 0.1..=10.0;

/// Optional ambience played during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundTheme {
    #[default]
    None,
    ForestMeditation,
}

impl BackgroundTheme {
    /// Looping music track for the theme.
    pub fn ambient_track(self) -> Option<&'static str> {
        match self {
            BackgroundTheme::None => None,
            BackgroundTheme::ForestMeditation => {
                Some("https://cdn.pixabay.com/audio/2024/02/22/audio_145b204e12.mp3")
            }
        }
    }

    /// Stored name of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundTheme::None => "none",
            BackgroundTheme::ForestMeditation => "forest_meditation",
        }
    }
}

impl FromStr for BackgroundTheme {
    type Err = FarsightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(BackgroundTheme::None),
            "forest_meditation" | "forest" => Ok(BackgroundTheme::ForestMeditation),
            other => Err(FarsightError::settings(format!(
                "unknown background theme '{}' (expected none or forest_meditation)",
                other
            ))),
        }
    }
}

/// Settings consumed by the timer host and the feedback dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingSettings {
    /// Preferred speech voice; empty picks the platform default.
    pub voice_name: String,
    /// Speech rate multiplier.
    pub speaking_rate: f64,
    /// Countdown beeps in the last three seconds of a phase.
    pub sound_enabled: bool,
    /// Spoken congratulation when a session completes.
    ///
    /// When off, the completion prompt is skipped. Phase prompts, beeps and
    /// vibration are not affected.
    pub encouragement_enabled: bool,
    /// Overall session length.
    pub total_duration_minutes: u32,
    /// Ambient theme.
    pub background_theme: BackgroundTheme,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            voice_name: String::new(),
            speaking_rate: 1.0,
            sound_enabled: true,
            encouragement_enabled: true,
            total_duration_minutes: 5,
            background_theme: BackgroundTheme::None,
        }
    }
}

impl TrainingSettings {
    /// Session length in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.total_duration_minutes.saturating_mul(60)
    }

    /// Check that a duration is one of [`DURATION_CHOICES`].
    pub fn is_valid_duration(minutes: u32) -> bool {
        DURATION_CHOICES.contains(&minutes)
    }

    /// Check that a speaking rate is finite and inside [`SPEAKING_RATE_RANGE`].
    pub fn is_valid_speaking_rate(rate: f64) -> bool {
        rate.is_finite() && SPEAKING_RATE_RANGE.contains(&rate)
    }

    /// Validate values before they are saved.
    ///
    /// The timer itself trusts whatever it is given; this is the only check.
    pub fn validate(&self) -> Result<()> {
        if !Self::is_valid_duration(self.total_duration_minutes) {
            return Err(FarsightError::settings(format!(
                "duration {} is not one of {:?} minutes",
                self.total_duration_minutes, DURATION_CHOICES
            )));
        }
        if !Self::is_valid_speaking_rate(self.speaking_rate) {
            return Err(FarsightError::settings(format!(
                "speaking rate {} is outside {:?}",
                self.speaking_rate, SPEAKING_RATE_RANGE
            )));
        }
        Ok(())
    }
}
