//! Train command for farsight.
//!
//! Runs one FAR/NEAR session in the terminal and records it when it
//! completes.

use serde::Serialize;

use crate::config::FeedbackConfig;
use crate::core::{
    SessionRecorder, SessionTimer, TimerOptions, TrainingPhase, TrainingSettings,
    DURATION_CHOICES,
};
use crate::feedback::{Feedback, FeedbackDispatcher, FeedbackStatus};
use crate::host::{SessionHost, SessionOutcome, Trigger};

/// Options for the train command.
#[derive(Debug, Clone, Default)]
pub struct TrainOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session length override; must be one of the offered durations.
    pub minutes: Option<u32>,
    /// Start with speech and ambience muted.
    pub mute: bool,
    /// Tick without waiting.
    pub fast: bool,
}

/// Output format for the train command.
#[derive(Debug, Clone, Serialize)]
pub struct TrainOutput {
    /// Whether the command ran.
    pub success: bool,
    /// Whether the session ran to the end.
    pub completed: bool,
    /// Session length.
    pub minutes: u32,
    /// Cycles finished (only for a completed session).
    pub cycles_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_badge: Option<String>,
    /// Feedback channels that were unavailable.
    pub advisories: FeedbackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrainOutput {
    fn from_outcome(minutes: u32, outcome: SessionOutcome, advisories: FeedbackStatus) -> Self {
        let mut output = Self {
            success: true,
            completed: false,
            minutes,
            cycles_completed: 0,
            daily_title: None,
            unlocked_badge: None,
            advisories,
            error: None,
        };
        if let SessionOutcome::Completed {
            cycles_completed,
            summary,
        } = outcome
        {
            output.completed = true;
            output.cycles_completed = cycles_completed;
            output.daily_title = Some(summary.daily_title);
            output.unlocked_badge = summary.unlocked_badge_name;
        }
        output
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            completed: false,
            minutes: 0,
            cycles_completed: 0,
            daily_title: None,
            unlocked_badge: None,
            advisories: FeedbackStatus::default(),
            error: Some(error.into()),
        }
    }
}

/// Snapshot of a running session for the progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub phase: TrainingPhase,
    pub phase_time_left: u32,
    pub total_time_left: u32,
    pub cycles_completed: u32,
    pub percent: f64,
}

impl Progress {
    fn of<R: SessionRecorder>(timer: &SessionTimer<R>) -> Self {
        Self {
            phase: timer.phase(),
            phase_time_left: timer.phase_time_left(),
            total_time_left: timer.total_time_left(),
            cycles_completed: timer.cycles_completed(),
            percent: timer.progress_percent(),
        }
    }

    /// One-line rendering, e.g. `眺望远方 12s | 04:35 left | cycle 3 | 8%`.
    pub fn render(&self) -> String {
        format!(
            "{} {:>2}s | {:02}:{:02} left | cycle {} | {:.0}%",
            self.phase.label(),
            self.phase_time_left,
            self.total_time_left / 60,
            self.total_time_left % 60,
            self.cycles_completed,
            self.percent
        )
    }
}

/// The train command implementation.
pub struct TrainCommand {
    settings: TrainingSettings,
    feedback: FeedbackConfig,
}

impl TrainCommand {
    /// Create a train command from stored settings and feedback config.
    pub fn new(settings: TrainingSettings, feedback: FeedbackConfig) -> Self {
        Self { settings, feedback }
    }

    /// Session length after applying the override.
    fn minutes(&self, options: &TrainOptions) -> Result<u32, String> {
        match options.minutes {
            Some(m) if TrainingSettings::is_valid_duration(m) => Ok(m),
            Some(m) => Err(format!(
                "--minutes {} is not one of {:?}",
                m, DURATION_CHOICES
            )),
            None => Ok(self.settings.total_duration_minutes),
        }
    }

    /// Run one session.
    ///
    /// `recorder` receives the completed session, `trigger` paces the ticks
    /// and `feedback` renders prompts. `progress` sees every tick.
    pub fn run<R, T, F>(
        &self,
        options: &TrainOptions,
        recorder: R,
        trigger: T,
        feedback: F,
        mut progress: impl FnMut(&Progress),
    ) -> TrainOutput
    where
        R: SessionRecorder,
        T: Trigger,
        F: Feedback,
    {
        let minutes = match self.minutes(options) {
            Ok(m) => m,
            Err(e) => return TrainOutput::failure(e),
        };

        let timer_options = TimerOptions {
            countdown_cues: self.settings.sound_enabled && self.feedback.countdown_cues,
        };
        let timer = SessionTimer::with_options(minutes, recorder, timer_options);
        let mut dispatcher =
            FeedbackDispatcher::new(feedback, &self.settings, &self.feedback).with_muted(options.mute);

        let outcome =
            SessionHost::new(trigger).run(timer, &mut dispatcher, |t| progress(&Progress::of(t)));

        TrainOutput::from_outcome(minutes, outcome, dispatcher.status())
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &TrainOutput, options: &TrainOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &TrainOutput) -> String {
        if !output.success {
            return format!(
                "Training failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();

        if output.completed {
            lines.push(format!(
                "Session complete: {} min, {} cycle(s)",
                output.minutes, output.cycles_completed
            ));
            if let Some(title) = &output.daily_title {
                lines.push(format!("Title earned: {}", title));
            }
            if let Some(badge) = &output.unlocked_badge {
                lines.push(format!("New badge: {}", badge));
            }
        } else {
            lines.push("Session stopped early. Nothing was recorded.".to_string());
        }

        if output.advisories.screen_hold_unavailable {
            lines.push("Note: the screen could not be kept awake.".to_string());
        }
        if output.advisories.ambient_audio_unavailable {
            lines.push("Note: ambient audio is unavailable.".to_string());
        }

        lines.join("\n") + "\n"
    }
}
