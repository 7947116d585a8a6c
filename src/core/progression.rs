//! Progression: streaks, titles and badge unlocks.
//!
//! [`apply_completion`] is the pure rule set. [`ProgressionEngine`] wraps it
//! with a stats store, a title source and a clock, and persists the result.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::badges::{
    badge_name, FIRST_SESSION, FIVE_SESSIONS, HUNDRED_SESSIONS, TEN_CYCLES, THIRTY_DAY_STREAK,
    TITLES, TWENTY_SESSIONS,
};
use crate::core::clock::{day_gap, Clock, SystemClock};
use crate::core::session::TrainingSession;
use crate::core::stats::UserStats;
use crate::error::FailOpen;
use crate::storage::{KvStore, StatsStore};

/// Streak length that unlocks the thirty-day badge.
pub const STREAK_BADGE_DAYS: u32 = 30;

/// Cycles within one session that unlock the focus badge.
pub const CYCLE_BADGE_COUNT: u32 = 10;

/// What a completed session earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    /// Name of the badge unlocked by this session.
    ///
    /// When several badges unlock at once only the last one checked is
    /// reported here; all of them are still added to the stats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_badge_name: Option<String>,
    /// Title drawn for this session.
    pub daily_title: String,
}

/// Source of title draws.
pub trait TitleSource: Send {
    /// Pick an index in `0..len`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform title draws from a random generator.
#[derive(Debug, Clone)]
pub struct RandomTitles<R: Rng> {
    rng: R,
}

impl RandomTitles<StdRng> {
    /// Draw from a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw from a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> TitleSource for RandomTitles<R> {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Records a finished session. Implemented by [`ProgressionEngine`].
///
/// The session timer only needs this seam, so it can be tested without a
/// store.
pub trait SessionRecorder {
    /// Record a session of `duration_minutes` that finished `cycles_completed`
    /// cycles and return what it earned.
    fn record_session(&mut self, duration_minutes: u32, cycles_completed: u32)
        -> CompletionSummary;
}

impl<R: SessionRecorder + ?Sized> SessionRecorder for &mut R {
    fn record_session(
        &mut self,
        duration_minutes: u32,
        cycles_completed: u32,
    ) -> CompletionSummary {
        (**self).record_session(duration_minutes, cycles_completed)
    }
}

/// Apply one completed session to `current`.
///
/// `current` is not modified; the updated copy is returned together with
/// the summary. `today` is the local calendar day of completion and `title`
/// the title already drawn for this session.
pub fn apply_completion(
    current: &UserStats,
    completed: TrainingSession,
    today: NaiveDate,
    title: &str,
    clock: &dyn Clock,
) -> (UserStats, CompletionSummary) {
    let mut stats = current.clone();

    stats.current_streak = match stats.last_training_date {
        None => 1,
        Some(last) => match day_gap(clock, today, last) {
            0 => stats.current_streak,
            1 => stats.current_streak.saturating_add(1),
            _ => 1,
        },
    };
    stats.last_training_date = Some(today);

    let completed = completed.with_title(title);
    let cycles = completed.cycles_completed;
    stats.sessions.push(completed);

    let total = stats.sessions.len();
    // Order matters: the last newly unlocked badge is the one reported.
    let checks = [
        (total >= 1, FIRST_SESSION),
        (total >= 5, FIVE_SESSIONS),
        (total >= 20, TWENTY_SESSIONS),
        (total >= 100, HUNDRED_SESSIONS),
        (stats.current_streak >= STREAK_BADGE_DAYS, THIRTY_DAY_STREAK),
        (cycles >= CYCLE_BADGE_COUNT, TEN_CYCLES),
    ];

    let mut reported = None;
    for (met, id) in checks {
        if met && !stats.has_badge(id) {
            stats.badges.push(id.to_string());
            tracing::info!(badge = id, "badge unlocked");
            reported = Some(id);
        }
    }

    let summary = CompletionSummary {
        unlocked_badge_name: reported.and_then(badge_name).map(str::to_string),
        daily_title: title.to_string(),
    };

    (stats, summary)
}

/// Progression engine bound to a stats store.
pub struct ProgressionEngine<K: KvStore, T: TitleSource = RandomTitles<StdRng>, C: Clock = SystemClock>
{
    store: StatsStore<K>,
    titles: T,
    clock: C,
}

impl<K: KvStore> ProgressionEngine<K> {
    /// Engine with random titles and the system clock.
    pub fn new(store: StatsStore<K>) -> Self {
        Self::with_parts(store, RandomTitles::from_entropy(), SystemClock)
    }
}

impl<K: KvStore, T: TitleSource, C: Clock> ProgressionEngine<K, T, C> {
    /// Engine with an explicit title source and clock.
    pub fn with_parts(store: StatsStore<K>, titles: T, clock: C) -> Self {
        Self {
            store,
            titles,
            clock,
        }
    }

    /// The stats store this engine writes to.
    pub fn store(&self) -> &StatsStore<K> {
        &self.store
    }

    /// The clock used for completion days.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply `completed` to `current`, persist the result and return it.
    ///
    /// A failed save is logged; the computed stats are still returned.
    pub fn record_completion(
        &mut self,
        current: &UserStats,
        completed: TrainingSession,
    ) -> (UserStats, CompletionSummary) {
        let today = self.clock.today();
        let index = self.titles.pick(TITLES.len()) % TITLES.len();
        let (updated, summary) =
            apply_completion(current, completed, today, TITLES[index], &self.clock);

        self.store.save(&updated).fail_open_default("saving stats");
        tracing::info!(
            streak = updated.current_streak,
            sessions = updated.sessions.len(),
            title = %summary.daily_title,
            "session recorded"
        );

        (updated, summary)
    }

    /// Load the stored stats and record `completed` against them.
    pub fn complete(&mut self, completed: TrainingSession) -> (UserStats, CompletionSummary) {
        let current = self.store.load();
        self.record_completion(&current, completed)
    }
}

impl<K: KvStore, T: TitleSource, C: Clock> SessionRecorder for ProgressionEngine<K, T, C> {
    fn record_session(
        &mut self,
        duration_minutes: u32,
        cycles_completed: u32,
    ) -> CompletionSummary {
        let session = TrainingSession::new(self.clock.now(), duration_minutes, cycles_completed);
        self.complete(session).1
    }
}
