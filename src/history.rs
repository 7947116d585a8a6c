//! Read-only views over the session history.
//!
//! Everything here is derived from [`UserStats`] on demand and bucketed by
//! local calendar day through a [`Clock`].

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::core::{Clock, TrainingSession, UserStats, BADGES};

/// Days covered by the activity heatmap.
pub const HEATMAP_DAYS: i64 = 30;

/// Sessions shown in the cycle trend.
pub const TREND_SESSIONS: usize = 10;

/// Sessions listed by default in the recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Lifetime totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_minutes: u64,
    pub total_sessions: usize,
    /// Consecutive days with at least one session, counting back from today.
    /// Zero when there is no session today.
    pub calendar_streak: u32,
}

/// One heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: usize,
}

impl HeatmapDay {
    /// Shade bucket: 0, 1, 2, or 3 for three or more sessions.
    pub fn level(&self) -> u8 {
        self.count.min(3) as u8
    }
}

/// One point of the cycle trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Month/day of the session, e.g. `10/16`.
    pub label: String,
    pub cycles: u32,
}

/// Unlocked badges against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeProgress {
    pub unlocked: usize,
    pub total: usize,
}

/// Home-screen figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub sessions_today: usize,
    /// Streak as kept by the progression rules.
    pub current_streak: u32,
    pub last_training_date: Option<NaiveDate>,
    pub badges: BadgeProgress,
    pub summary: HistorySummary,
}

fn session_day(clock: &dyn Clock, session: &TrainingSession) -> NaiveDate {
    clock.local_day(session.timestamp)
}

/// Totals and the calendar streak.
pub fn summary(stats: &UserStats, clock: &dyn Clock) -> HistorySummary {
    let total_minutes = stats
        .sessions
        .iter()
        .map(|s| u64::from(s.duration_minutes))
        .sum();

    let days: HashSet<NaiveDate> = stats
        .sessions
        .iter()
        .map(|s| session_day(clock, s))
        .collect();

    let mut calendar_streak = 0;
    let mut check = clock.today();
    while days.contains(&check) {
        calendar_streak += 1;
        check -= Duration::days(1);
    }

    HistorySummary {
        total_minutes,
        total_sessions: stats.sessions.len(),
        calendar_streak,
    }
}

/// Sessions completed on today's local day.
pub fn sessions_today(stats: &UserStats, clock: &dyn Clock) -> usize {
    let today = clock.today();
    stats
        .sessions
        .iter()
        .filter(|s| session_day(clock, s) == today)
        .count()
}

/// Session counts for the last [`HEATMAP_DAYS`] days, oldest first, ending
/// today.
pub fn heatmap(stats: &UserStats, clock: &dyn Clock) -> Vec<HeatmapDay> {
    let today = clock.today();
    let days: Vec<NaiveDate> = stats
        .sessions
        .iter()
        .map(|s| session_day(clock, s))
        .collect();

    (0..HEATMAP_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let count = days.iter().filter(|d| **d == date).count();
            HeatmapDay { date, count }
        })
        .collect()
}

/// Cycles of the last [`TREND_SESSIONS`] sessions, in completion order.
pub fn trend(stats: &UserStats, clock: &dyn Clock) -> Vec<TrendPoint> {
    let start = stats.sessions.len().saturating_sub(TREND_SESSIONS);
    stats.sessions[start..]
        .iter()
        .map(|s| {
            let day = session_day(clock, s);
            TrendPoint {
                label: format!("{}/{}", day.month(), day.day()),
                cycles: s.cycles_completed,
            }
        })
        .collect()
}

/// The last `limit` sessions, newest first.
pub fn recent(stats: &UserStats, limit: usize) -> Vec<&TrainingSession> {
    stats.sessions.iter().rev().take(limit).collect()
}

/// Unlocked catalog badges. Unknown ids in the stats are not counted.
pub fn badge_progress(stats: &UserStats) -> BadgeProgress {
    let unlocked = BADGES.iter().filter(|b| stats.has_badge(b.id)).count();
    BadgeProgress {
        unlocked,
        total: BADGES.len(),
    }
}

/// Figures for the home screen.
pub fn dashboard(stats: &UserStats, clock: &dyn Clock) -> Dashboard {
    Dashboard {
        sessions_today: sessions_today(stats, clock),
        current_streak: stats.current_streak,
        last_training_date: stats.last_training_date,
        badges: badge_progress(stats),
        summary: summary(stats, clock),
    }
}
