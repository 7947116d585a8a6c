//! farsight - far/near focus trainer
//!
//! Guides the user through alternating phases of looking at a distant
//! object and at a fingertip, with spoken prompts and countdown beeps.
//! Completed sessions feed a streak counter, a daily title and a small
//! badge collection, all persisted locally.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod feedback;
pub mod history;
pub mod host;
pub mod storage;

pub use config::Config;
pub use core::{
    apply_completion, Badge, Clock, CompletionSummary, ProgressionEngine, SessionRecorder,
    SessionTimer, SystemClock, TimerEvent, TrainingPhase, TrainingSession, TrainingSettings,
    UserStats, BADGES,
};
pub use error::{FarsightError, Result};
pub use feedback::{Feedback, FeedbackDispatcher, TerminalFeedback};
pub use host::{IntervalTrigger, SessionHost, SessionOutcome, Signal, Trigger};
pub use storage::{FileKvStore, KvStore, MemoryKvStore, SettingsStore, StatsStore};

// CLI commands
pub use cli::{
    BadgesCommand, ClearCommand, HistoryCommand, SettingsCommand, StatsCommand, TrainCommand,
};
