//! Feedback capability trait.
//!
//! A [`Feedback`] implementation is the platform side of a session: speech,
//! vibration, tones, keeping the screen awake and ambient audio. Every call
//! is best-effort. The dispatcher inspects the returned errors but never
//! lets them stop a session.

use serde::{Deserialize, Serialize};

use crate::core::TrainingSettings;
use crate::error::Result;

/// Pitch used for spoken prompts; slightly raised for a softer voice.
pub const SPEECH_PITCH: f64 = 1.1;

/// Voice parameters for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechOptions {
    /// Preferred voice; `None` picks the platform default.
    pub voice_name: Option<String>,
    /// Rate multiplier.
    pub rate: f64,
    /// Pitch multiplier.
    pub pitch: f64,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            voice_name: None,
            rate: 1.0,
            pitch: SPEECH_PITCH,
        }
    }
}

impl SpeechOptions {
    /// Speech options taken from the user's settings.
    pub fn from_settings(settings: &TrainingSettings) -> Self {
        let voice_name = match settings.voice_name.trim() {
            "" => None,
            name => Some(name.to_string()),
        };
        Self {
            voice_name,
            rate: settings.speaking_rate,
            pitch: SPEECH_PITCH,
        }
    }
}

/// Platform feedback primitives.
pub trait Feedback {
    /// Speak `text` aloud, replacing any utterance in progress.
    fn speak(&mut self, text: &str, options: &SpeechOptions) -> Result<()>;

    /// Vibrate with alternating on/off durations in milliseconds.
    fn vibrate(&mut self, pattern: &[u32]) -> Result<()>;

    /// Play a short sine tone.
    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<()>;

    /// Keep the screen awake until released.
    fn request_screen_hold(&mut self) -> Result<()>;

    /// Let the screen sleep again.
    fn release_screen_hold(&mut self) -> Result<()>;

    /// Start a looping ambient track.
    fn play_ambient(&mut self, track: &str) -> Result<()>;

    /// Stop the ambient track.
    fn stop_ambient(&mut self) -> Result<()>;
}

impl<F: Feedback + ?Sized> Feedback for &mut F {
    fn speak(&mut self, text: &str, options: &SpeechOptions) -> Result<()> {
        (**self).speak(text, options)
    }

    fn vibrate(&mut self, pattern: &[u32]) -> Result<()> {
        (**self).vibrate(pattern)
    }

    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<()> {
        (**self).beep(frequency_hz, duration_ms)
    }

    fn request_screen_hold(&mut self) -> Result<()> {
        (**self).request_screen_hold()
    }

    fn release_screen_hold(&mut self) -> Result<()> {
        (**self).release_screen_hold()
    }

    fn play_ambient(&mut self, track: &str) -> Result<()> {
        (**self).play_ambient(track)
    }

    fn stop_ambient(&mut self) -> Result<()> {
        (**self).stop_ambient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_options_from_defaults() {
        let options = SpeechOptions::from_settings(&TrainingSettings::default());
        assert_eq!(options.voice_name, None);
        assert_eq!(options.rate, 1.0);
        assert_eq!(options.pitch, SPEECH_PITCH);
    }

    #[test]
    fn test_speech_options_carry_voice_and_rate() {
        let settings = TrainingSettings {
            voice_name: "Ting-Ting".to_string(),
            speaking_rate: 0.8,
            ..Default::default()
        };
        let options = SpeechOptions::from_settings(&settings);
        assert_eq!(options.voice_name.as_deref(), Some("Ting-Ting"));
        assert_eq!(options.rate, 0.8);
    }
}
