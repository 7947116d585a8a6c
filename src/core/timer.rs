//! The FAR/NEAR session state machine.
//!
//! [`SessionTimer::tick`] advances the session by one second and returns the
//! events that second produced. The timer never schedules itself; a host
//! calls `tick` once per trigger.

use crate::core::progression::{CompletionSummary, SessionRecorder};
use crate::core::session::TrainingPhase;

/// Remaining phase seconds at which a countdown cue fires.
const COUNTDOWN_SECONDS: std::ops::RangeInclusive<u32> = 1..=3;

/// Something that happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The phase flipped; carries the phase now active.
    PhaseChanged(TrainingPhase),
    /// The current phase has 1 to 3 seconds left.
    CountdownTick {
        /// Seconds left in the phase.
        remaining: u32,
    },
    /// The session ran to the end and was recorded.
    SessionComplete {
        /// Cycles finished over the whole session.
        cycles_completed: u32,
        /// What the recorded session earned.
        summary: CompletionSummary,
    },
}

/// Lifecycle of a timer. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running,
    Finished,
    Abandoned,
}

/// Behavior switches for a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOptions {
    /// Emit [`TimerEvent::CountdownTick`] near the end of each phase.
    pub countdown_cues: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            countdown_cues: true,
        }
    }
}

/// One training session in progress.
pub struct SessionTimer<R: SessionRecorder> {
    recorder: R,
    options: TimerOptions,
    duration_minutes: u32,
    total_seconds: u32,
    phase: TrainingPhase,
    phase_time_left: u32,
    total_time_left: u32,
    cycles_completed: u32,
    status: TimerStatus,
}

impl<R: SessionRecorder> SessionTimer<R> {
    /// Start a session of `duration_minutes` in the FAR phase.
    pub fn new(duration_minutes: u32, recorder: R) -> Self {
        Self::with_options(duration_minutes, recorder, TimerOptions::default())
    }

    /// Start a session with explicit options.
    pub fn with_options(duration_minutes: u32, recorder: R, options: TimerOptions) -> Self {
        let total_seconds = duration_minutes.saturating_mul(60);
        tracing::debug!(duration_minutes, total_seconds, "session timer started");
        Self {
            recorder,
            options,
            duration_minutes,
            total_seconds,
            phase: TrainingPhase::Far,
            phase_time_left: TrainingPhase::Far.duration_seconds(),
            total_time_left: total_seconds,
            cycles_completed: 0,
            status: TimerStatus::Running,
        }
    }

    /// Advance one second.
    ///
    /// Does nothing once the timer has finished or been abandoned. When the
    /// session time runs out, completion wins over any phase change due on
    /// the same second.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if self.status != TimerStatus::Running {
            return Vec::new();
        }

        self.total_time_left = self.total_time_left.saturating_sub(1);
        if self.total_time_left == 0 {
            return vec![self.finish()];
        }

        let mut events = Vec::new();
        self.phase_time_left = self.phase_time_left.saturating_sub(1);

        if self.phase_time_left == 0 {
            if self.phase == TrainingPhase::Near {
                self.cycles_completed += 1;
            }
            self.phase = self.phase.next();
            self.phase_time_left = self.phase.duration_seconds();
            tracing::debug!(phase = %self.phase, cycles = self.cycles_completed, "phase changed");
            events.push(TimerEvent::PhaseChanged(self.phase));
        }

        if self.options.countdown_cues && COUNTDOWN_SECONDS.contains(&self.phase_time_left) {
            events.push(TimerEvent::CountdownTick {
                remaining: self.phase_time_left,
            });
        }

        events
    }

    fn finish(&mut self) -> TimerEvent {
        self.status = TimerStatus::Finished;
        let summary = self
            .recorder
            .record_session(self.duration_minutes, self.cycles_completed);
        tracing::info!(
            cycles = self.cycles_completed,
            minutes = self.duration_minutes,
            "session complete"
        );
        TimerEvent::SessionComplete {
            cycles_completed: self.cycles_completed,
            summary,
        }
    }

    /// Exit early. Nothing is recorded and later ticks are ignored.
    pub fn abandon(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Abandoned;
            tracing::info!(
                elapsed = self.total_seconds - self.total_time_left,
                "session abandoned"
            );
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TimerStatus {
        self.status
    }

    /// True once the session ran to completion.
    pub fn is_finished(&self) -> bool {
        self.status == TimerStatus::Finished
    }

    /// Active phase.
    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    /// Seconds left in the active phase.
    pub fn phase_time_left(&self) -> u32 {
        self.phase_time_left
    }

    /// Seconds left in the whole session.
    pub fn total_time_left(&self) -> u32 {
        self.total_time_left
    }

    /// Cycles finished so far.
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// Configured session length.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Elapsed share of the session, 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.total_seconds == 0 {
            return 100.0;
        }
        let elapsed = self.total_seconds - self.total_time_left;
        f64::from(elapsed) / f64::from(self.total_seconds) * 100.0
    }

    /// Release the recorder.
    pub fn into_recorder(self) -> R {
        self.recorder
    }
}
