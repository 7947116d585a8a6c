//! In-memory [`Feedback`] that records every call, for tests.

use std::collections::HashSet;

use crate::error::{FarsightError, Result};
use crate::feedback::{Feedback, SpeechOptions};

/// One recorded feedback call.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackCall {
    Speak(String),
    Vibrate(Vec<u32>),
    Beep { frequency_hz: u32, duration_ms: u32 },
    HoldScreen,
    ReleaseScreen,
    PlayAmbient(String),
    StopAmbient,
}

/// Records calls; selected channels can be made to fail.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    pub calls: Vec<FeedbackCall>,
    pub last_speech_options: Option<SpeechOptions>,
    failing: HashSet<&'static str>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call on `channel` return an error. Channel names match
    /// the ones the dispatcher reports: "speech", "vibration", "tone",
    /// "screen hold", "ambient audio".
    pub fn failing(mut self, channel: &'static str) -> Self {
        self.failing.insert(channel);
        self
    }

    /// Spoken texts in order.
    pub fn spoken(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                FeedbackCall::Speak(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &FeedbackCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn check(&self, channel: &'static str) -> Result<()> {
        if self.failing.contains(channel) {
            return Err(FarsightError::feedback(channel, "disabled in test"));
        }
        Ok(())
    }
}

impl Feedback for RecordingFeedback {
    fn speak(&mut self, text: &str, options: &SpeechOptions) -> Result<()> {
        self.check("speech")?;
        self.calls.push(FeedbackCall::Speak(text.to_string()));
        self.last_speech_options = Some(options.clone());
        Ok(())
    }

    fn vibrate(&mut self, pattern: &[u32]) -> Result<()> {
        self.check("vibration")?;
        self.calls.push(FeedbackCall::Vibrate(pattern.to_vec()));
        Ok(())
    }

    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<()> {
        self.check("tone")?;
        self.calls.push(FeedbackCall::Beep {
            frequency_hz,
            duration_ms,
        });
        Ok(())
    }

    fn request_screen_hold(&mut self) -> Result<()> {
        self.check("screen hold")?;
        self.calls.push(FeedbackCall::HoldScreen);
        Ok(())
    }

    fn release_screen_hold(&mut self) -> Result<()> {
        self.calls.push(FeedbackCall::ReleaseScreen);
        Ok(())
    }

    fn play_ambient(&mut self, track: &str) -> Result<()> {
        self.check("ambient audio")?;
        self.calls.push(FeedbackCall::PlayAmbient(track.to_string()));
        Ok(())
    }

    fn stop_ambient(&mut self) -> Result<()> {
        self.calls.push(FeedbackCall::StopAmbient);
        Ok(())
    }
}
