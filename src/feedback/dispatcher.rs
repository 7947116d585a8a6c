//! Maps session events onto the feedback channels.

use serde::Serialize;

use crate::config::FeedbackConfig;
use crate::core::{TimerEvent, TrainingPhase, TrainingSettings};
use crate::error::Result;
use crate::feedback::{Feedback, SpeechOptions};

/// Spoken when a session starts.
pub const START_PROMPT: &str = "训练开始。请看向远方，放松心情。";

/// Spoken on entering NEAR.
pub const NEAR_PROMPT: &str = "看向指尖。保持专注。";

/// Spoken on entering FAR.
pub const FAR_PROMPT: &str = "看向远方。让视力舒缓。";

/// Congratulation spoken when a session completes.
pub fn completion_prompt(title: &str) -> String {
    format!("训练达成！恭喜您获得“{}”称号。", title)
}

/// Non-fatal problems seen during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatus {
    /// The screen could not be kept awake.
    pub screen_hold_unavailable: bool,
    /// The ambient track could not be started.
    pub ambient_audio_unavailable: bool,
}

impl FeedbackStatus {
    /// True when nothing went wrong.
    pub fn is_clean(&self) -> bool {
        !self.screen_hold_unavailable && !self.ambient_audio_unavailable
    }
}

/// Drives a [`Feedback`] implementation from session events.
///
/// Channel failures are logged and, for the screen hold and ambient audio,
/// recorded in [`FeedbackStatus`]. They never reach the caller.
pub struct FeedbackDispatcher<F: Feedback> {
    feedback: F,
    speech: SpeechOptions,
    encouragement: bool,
    ambient_track: Option<&'static str>,
    beep_frequency_hz: u32,
    beep_duration_ms: u32,
    near_vibration: Vec<u32>,
    far_vibration: Vec<u32>,
    muted: bool,
    screen_held: bool,
    ambient_playing: bool,
    status: FeedbackStatus,
}

impl<F: Feedback> FeedbackDispatcher<F> {
    pub fn new(feedback: F, settings: &TrainingSettings, config: &FeedbackConfig) -> Self {
        Self {
            feedback,
            speech: SpeechOptions::from_settings(settings),
            encouragement: settings.encouragement_enabled,
            ambient_track: settings.background_theme.ambient_track(),
            beep_frequency_hz: config.beep_frequency_hz,
            beep_duration_ms: config.beep_duration_ms,
            near_vibration: config.near_vibration.clone(),
            far_vibration: config.far_vibration.clone(),
            muted: false,
            screen_held: false,
            ambient_playing: false,
            status: FeedbackStatus::default(),
        }
    }

    /// Start muted or unmuted. Only meaningful before [`session_started`](Self::session_started).
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Acquire the screen hold, start ambience and announce the start.
    pub fn session_started(&mut self) {
        match self.feedback.request_screen_hold() {
            Ok(()) => self.screen_held = true,
            Err(e) => {
                tracing::warn!("screen hold: {}", e);
                self.status.screen_hold_unavailable = true;
            }
        }
        self.start_ambient();
        self.say(START_PROMPT);
    }

    /// React to one timer event.
    pub fn handle(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::PhaseChanged(TrainingPhase::Near) => {
                self.say(NEAR_PROMPT);
                let result = self.feedback.vibrate(&self.near_vibration);
                log_failure(result, "vibration");
            }
            TimerEvent::PhaseChanged(TrainingPhase::Far) => {
                self.say(FAR_PROMPT);
                let result = self.feedback.vibrate(&self.far_vibration);
                log_failure(result, "vibration");
            }
            TimerEvent::CountdownTick { .. } => {
                let result = self
                    .feedback
                    .beep(self.beep_frequency_hz, self.beep_duration_ms);
                log_failure(result, "tone");
            }
            TimerEvent::SessionComplete { summary, .. } => {
                if self.encouragement {
                    self.say(&completion_prompt(&summary.daily_title));
                }
                self.teardown();
            }
        }
    }

    /// Release everything after an early exit.
    pub fn session_abandoned(&mut self) {
        self.teardown();
    }

    /// Flip mute. Muting stops the ambient track, unmuting restarts it.
    /// Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.stop_ambient();
        } else {
            self.start_ambient();
        }
        tracing::debug!(muted = self.muted, "mute toggled");
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Advisory status collected so far.
    pub fn status(&self) -> FeedbackStatus {
        self.status
    }

    /// The wrapped feedback implementation.
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn into_feedback(self) -> F {
        self.feedback
    }

    fn say(&mut self, text: &str) {
        if self.muted {
            return;
        }
        let result = self.feedback.speak(text, &self.speech);
        log_failure(result, "speech");
    }

    fn start_ambient(&mut self) {
        let Some(track) = self.ambient_track else {
            return;
        };
        if self.muted || self.ambient_playing {
            return;
        }
        match self.feedback.play_ambient(track) {
            Ok(()) => {
                self.ambient_playing = true;
                self.status.ambient_audio_unavailable = false;
            }
            Err(e) => {
                tracing::warn!("ambient audio: {}", e);
                self.status.ambient_audio_unavailable = true;
            }
        }
    }

    fn stop_ambient(&mut self) {
        if self.ambient_playing {
            log_failure(self.feedback.stop_ambient(), "ambient audio");
            self.ambient_playing = false;
        }
    }

    fn teardown(&mut self) {
        self.stop_ambient();
        if self.screen_held {
            log_failure(self.feedback.release_screen_hold(), "screen hold");
            self.screen_held = false;
        }
    }
}

fn log_failure(result: Result<()>, channel: &str) {
    if let Err(e) = result {
        tracing::debug!("{} feedback failed: {}", channel, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BackgroundTheme, CompletionSummary};
    use crate::feedback::recording::{FeedbackCall, RecordingFeedback};

    fn forest() -> TrainingSettings {
        TrainingSettings {
            background_theme: BackgroundTheme::ForestMeditation,
            ..Default::default()
        }
    }

    fn dispatcher(
        feedback: RecordingFeedback,
        settings: &TrainingSettings,
    ) -> FeedbackDispatcher<RecordingFeedback> {
        FeedbackDispatcher::new(feedback, settings, &FeedbackConfig::default())
    }

    fn complete(title: &str) -> TimerEvent {
        TimerEvent::SessionComplete {
            cycles_completed: 8,
            summary: CompletionSummary {
                unlocked_badge_name: None,
                daily_title: title.to_string(),
            },
        }
    }

    #[test]
    fn test_start_holds_screen_and_speaks() {
        let mut d = dispatcher(RecordingFeedback::new(), &TrainingSettings::default());
        d.session_started();

        let fb = d.feedback();
        assert_eq!(fb.calls[0], FeedbackCall::HoldScreen);
        assert_eq!(fb.spoken(), vec![START_PROMPT]);
        assert!(!fb
            .calls
            .iter()
            .any(|c| matches!(c, FeedbackCall::PlayAmbient(_))));
        assert!(d.status().is_clean());
    }

    #[test]
    fn test_start_plays_theme_track() {
        let mut d = dispatcher(RecordingFeedback::new(), &forest());
        d.session_started();

        let track = BackgroundTheme::ForestMeditation.ambient_track().unwrap();
        assert!(d
            .feedback()
            .calls
            .contains(&FeedbackCall::PlayAmbient(track.to_string())));
    }

    #[test]
    fn test_phase_changes_speak_and_vibrate() {
        let mut d = dispatcher(RecordingFeedback::new(), &TrainingSettings::default());
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Near));
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Far));

        assert_eq!(
            d.feedback().calls,
            vec![
                FeedbackCall::Speak(NEAR_PROMPT.to_string()),
                FeedbackCall::Vibrate(vec![200, 100, 200]),
                FeedbackCall::Speak(FAR_PROMPT.to_string()),
                FeedbackCall::Vibrate(vec![300]),
            ]
        );
    }

    #[test]
    fn test_countdown_uses_configured_tone() {
        let config = FeedbackConfig {
            beep_frequency_hz: 880,
            beep_duration_ms: 60,
            ..Default::default()
        };
        let mut d =
            FeedbackDispatcher::new(RecordingFeedback::new(), &TrainingSettings::default(), &config);
        d.handle(&TimerEvent::CountdownTick { remaining: 2 });

        assert_eq!(
            d.feedback().calls,
            vec![FeedbackCall::Beep {
                frequency_hz: 880,
                duration_ms: 60
            }]
        );
    }

    #[test]
    fn test_completion_congratulates_and_releases() {
        let mut d = dispatcher(RecordingFeedback::new(), &forest());
        d.session_started();
        d.handle(&complete("明眸卫士"));

        let fb = d.feedback();
        assert_eq!(
            fb.spoken().last().copied(),
            Some("训练达成！恭喜您获得“明眸卫士”称号。")
        );
        assert_eq!(fb.count(&FeedbackCall::ReleaseScreen), 1);
        assert_eq!(fb.count(&FeedbackCall::StopAmbient), 1);
    }

    #[test]
    fn test_completion_silent_without_encouragement() {
        let settings = TrainingSettings {
            encouragement_enabled: false,
            ..Default::default()
        };
        let mut d = dispatcher(RecordingFeedback::new(), &settings);
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Near));
        d.handle(&complete("明眸卫士"));

        let fb = d.feedback();
        assert_eq!(fb.spoken(), vec![NEAR_PROMPT]);
        assert_eq!(fb.count(&FeedbackCall::ReleaseScreen), 1);
    }

    #[test]
    fn test_abandon_releases_once() {
        let mut d = dispatcher(RecordingFeedback::new(), &forest());
        d.session_started();
        d.session_abandoned();
        d.session_abandoned();

        let fb = d.feedback();
        assert_eq!(fb.count(&FeedbackCall::ReleaseScreen), 1);
        assert_eq!(fb.count(&FeedbackCall::StopAmbient), 1);
    }

    #[test]
    fn test_screen_hold_failure_is_advisory() {
        let mut d = dispatcher(
            RecordingFeedback::new().failing("screen hold"),
            &TrainingSettings::default(),
        );
        d.session_started();
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Near));
        d.session_abandoned();

        assert!(d.status().screen_hold_unavailable);
        assert!(!d.status().ambient_audio_unavailable);
        // Nothing to release
        assert_eq!(d.feedback().count(&FeedbackCall::ReleaseScreen), 0);
        assert_eq!(d.feedback().spoken(), vec![START_PROMPT, NEAR_PROMPT]);
    }

    #[test]
    fn test_ambient_failure_is_advisory() {
        let mut d = dispatcher(RecordingFeedback::new().failing("ambient audio"), &forest());
        d.session_started();

        assert!(d.status().ambient_audio_unavailable);
        assert_eq!(d.feedback().spoken(), vec![START_PROMPT]);
    }

    #[test]
    fn test_speech_failure_does_not_stop_vibration() {
        let mut d = dispatcher(
            RecordingFeedback::new().failing("speech"),
            &TrainingSettings::default(),
        );
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Far));
        assert_eq!(d.feedback().calls, vec![FeedbackCall::Vibrate(vec![300])]);
        assert!(d.status().is_clean());
    }

    #[test]
    fn test_muted_skips_speech_and_ambient() {
        let mut d = dispatcher(RecordingFeedback::new(), &forest()).with_muted(true);
        d.session_started();
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Near));

        let fb = d.feedback();
        assert!(fb.spoken().is_empty());
        assert_eq!(fb.calls[0], FeedbackCall::HoldScreen);
        assert!(fb.calls.contains(&FeedbackCall::Vibrate(vec![200, 100, 200])));
        assert!(!fb
            .calls
            .iter()
            .any(|c| matches!(c, FeedbackCall::PlayAmbient(_))));
    }

    #[test]
    fn test_toggle_mute_mid_session() {
        let mut d = dispatcher(RecordingFeedback::new(), &forest());
        d.session_started();

        assert!(d.toggle_mute());
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Near));
        assert_eq!(d.feedback().count(&FeedbackCall::StopAmbient), 1);

        assert!(!d.toggle_mute());
        d.handle(&TimerEvent::PhaseChanged(TrainingPhase::Far));

        let fb = d.feedback();
        assert_eq!(fb.spoken(), vec![START_PROMPT, FAR_PROMPT]);
        let plays = fb
            .calls
            .iter()
            .filter(|c| matches!(c, FeedbackCall::PlayAmbient(_)))
            .count();
        assert_eq!(plays, 2);
    }

    #[test]
    fn test_speech_uses_settings_voice() {
        let settings = TrainingSettings {
            voice_name: "Mei-Jia".to_string(),
            speaking_rate: 1.5,
            ..Default::default()
        };
        let mut d = dispatcher(RecordingFeedback::new(), &settings);
        d.session_started();

        let options = d.feedback().last_speech_options.clone().unwrap();
        assert_eq!(options.voice_name.as_deref(), Some("Mei-Jia"));
        assert_eq!(options.rate, 1.5);
    }
}
