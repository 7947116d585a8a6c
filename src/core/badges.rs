//! Badge and title catalogs.
//!
//! Both catalogs are fixed and read-only. A user's unlocked badges are kept
//! only as ids in [`UserStats::badges`](crate::core::UserStats).

use serde::{Deserialize, Serialize};

/// Visual category of a badge icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconType {
    Star,
    Medal,
    Flame,
    Shield,
    Trophy,
    Moon,
}

/// A one-time achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_type: IconType,
}

/// First completed session.
pub const FIRST_SESSION: &str = "b1";
/// Five sessions in total.
pub const FIVE_SESSIONS: &str = "b2";
/// Twenty sessions in total.
pub const TWENTY_SESSIONS: &str = "b3";
/// Thirty-day streak.
pub const THIRTY_DAY_STREAK: &str = "b4";
/// Ten cycles within one session.
pub const TEN_CYCLES: &str = "b5";
/// One hundred sessions in total.
pub const HUNDRED_SESSIONS: &str = "b6";

/// Every badge, in display order.
pub const BADGES: [Badge; 6] = [
    Badge {
        id: FIRST_SESSION,
        name: "初出茅庐",
        description: "完成第一次视力训练",
        icon_type: IconType::Star,
    },
    Badge {
        id: FIVE_SESSIONS,
        name: "坚持不懈",
        description: "累计完成 5 次训练",
        icon_type: IconType::Medal,
    },
    Badge {
        id: TWENTY_SESSIONS,
        name: "护眼专家",
        description: "累计完成 20 次训练",
        icon_type: IconType::Shield,
    },
    Badge {
        id: THIRTY_DAY_STREAK,
        name: "满月守护者",
        description: "达成 30 天连续打卡里程碑",
        icon_type: IconType::Moon,
    },
    Badge {
        id: TEN_CYCLES,
        name: "极限聚焦",
        description: "单次训练超过 10 组循环",
        icon_type: IconType::Flame,
    },
    Badge {
        id: HUNDRED_SESSIONS,
        name: "瞳之觉醒",
        description: "累计完成 100 次训练",
        icon_type: IconType::Trophy,
    },
];

/// Titles drawn at random when a session is saved.
pub const TITLES: [&str; 8] = [
    "视力修行者",
    "护眼小达人",
    "明眸卫士",
    "瞳之觉醒",
    "视界观察员",
    "光影捕捉者",
    "视域拓荒者",
    "清透之眼",
];

/// Look up a badge by id.
pub fn find_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|badge| badge.id == id)
}

/// Display name for a badge id, if the id is in the catalog.
pub fn badge_name(id: &str) -> Option<&'static str> {
    find_badge(id).map(|badge| badge.name)
}
