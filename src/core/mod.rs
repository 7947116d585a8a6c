//! Core types and logic for farsight.
//!
//! This module contains the training-session state machine, the progression
//! rules (streaks, titles, badges) and the persisted data model they share.

pub mod badges;
pub mod clock;
pub mod progression;
pub mod session;
pub mod settings;
pub mod stats;
pub mod timer;

pub use badges::{badge_name, find_badge, Badge, IconType, BADGES, TITLES};
pub use clock::{day_gap, Clock, FixedClock, SystemClock, MILLIS_PER_DAY};
pub use progression::{
    apply_completion, CompletionSummary, ProgressionEngine, RandomTitles, SessionRecorder,
    TitleSource,
};
pub use session::{TrainingPhase, TrainingSession, FAR_PHASE_SECONDS, NEAR_PHASE_SECONDS};
pub use settings::{BackgroundTheme, TrainingSettings, DURATION_CHOICES, SPEAKING_RATE_RANGE};
pub use stats::UserStats;
pub use timer::{SessionTimer, TimerEvent, TimerOptions, TimerStatus};
