use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Streak,
    Craving,
    Savings,
    Health,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub requirement: f64,
}

/// The figures a badge can be measured against. Always the true values,
/// never the smoothed display values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BadgeStats {
    pub days: f64,
    pub cravings_resisted: u32,
    pub money_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeStatus {
    #[serde(flatten)]
    pub badge: Badge,
    pub progress_percent: f64,
    pub unlocked: bool,
}

const fn badge(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: BadgeCategory,
    requirement: f64,
) -> Badge {
    Badge {
        id,
        name,
        description,
        icon,
        category,
        requirement,
    }
}

pub const BADGES: [Badge; 11] = [
    badge(
        "streak-1",
        "24 Hours Strong",
        "Stayed smoke-free for 24 hours",
        "🌟",
        BadgeCategory::Streak,
        1.0,
    ),
    badge(
        "streak-2",
        "First Week Victory",
        "Completed 7 days smoke-free",
        "🏆",
        BadgeCategory::Streak,
        7.0,
    ),
    badge(
        "streak-3",
        "Two Week Warrior",
        "Maintained 14 days without smoking",
        "💪",
        BadgeCategory::Streak,
        14.0,
    ),
    badge(
        "streak-4",
        "Monthly Milestone",
        "One month of smoke-free life",
        "🌙",
        BadgeCategory::Streak,
        30.0,
    ),
    badge(
        "streak-5",
        "Quarter Champion",
        "Three months of dedication",
        "👑",
        BadgeCategory::Streak,
        90.0,
    ),
    badge(
        "craving-1",
        "Craving Conqueror",
        "Resisted 10 cravings",
        "🛡️",
        BadgeCategory::Craving,
        10.0,
    ),
    badge(
        "craving-2",
        "Master of Will",
        "Overcame 50 cravings",
        "⚔️",
        BadgeCategory::Craving,
        50.0,
    ),
    badge(
        "savings-1",
        "Money Saver",
        "Saved your first $100",
        "💰",
        BadgeCategory::Savings,
        100.0,
    ),
    badge(
        "savings-2",
        "Financial Freedom",
        "Saved $500 by not smoking",
        "💎",
        BadgeCategory::Savings,
        500.0,
    ),
    badge(
        "health-1",
        "Breathing Better",
        "Oxygen levels back to normal",
        "🫁",
        BadgeCategory::Health,
        1.0,
    ),
    badge(
        "health-2",
        "Taste Master",
        "Sense of taste and smell improved",
        "👅",
        BadgeCategory::Health,
        2.0,
    ),
];

pub fn badge_progress(category: BadgeCategory, requirement: f64, stats: &BadgeStats) -> f64 {
    let value = match category {
        BadgeCategory::Streak | BadgeCategory::Health => stats.days,
        BadgeCategory::Craving => f64::from(stats.cravings_resisted),
        BadgeCategory::Savings => stats.money_saved,
        BadgeCategory::Unknown => return 0.0,
    };
    if requirement.is_nan() || requirement <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / requirement * 100.0).clamp(0.0, 100.0)
}

pub fn evaluate(badge: &Badge, stats: &BadgeStats) -> BadgeStatus {
    let progress_percent = badge_progress(badge.category, badge.requirement, stats);
    BadgeStatus {
        badge: *badge,
        progress_percent,
        unlocked: progress_percent >= 100.0,
    }
}

pub fn evaluate_all(catalog: &[Badge], stats: &BadgeStats) -> Vec<BadgeStatus> {
    catalog.iter().map(|badge| evaluate(badge, stats)).collect()
}

/// Badges locked in `previous` and unlocked in `current`, matched by id.
/// With no previous snapshot nothing counts as newly unlocked.
pub fn newly_unlocked<'a>(
    previous: Option<&[BadgeStatus]>,
    current: &'a [BadgeStatus],
) -> Vec<&'a BadgeStatus> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    current
        .iter()
        .filter(|status| status.unlocked)
        .filter(|status| {
            previous
                .iter()
                .find(|before| before.badge.id == status.badge.id)
                .is_some_and(|before| !before.unlocked)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn savings_badge() -> Badge {
        badge("s", "Saver", "", "", BadgeCategory::Savings, 100.0)
    }

    #[test]
    fn savings_badge_unlocks_at_requirement() {
        let half = evaluate(
            &savings_badge(),
            &BadgeStats {
                money_saved: 50.0,
                ..BadgeStats::default()
            },
        );
        assert_eq!(half.progress_percent, 50.0);
        assert!(!half.unlocked);

        let full = evaluate(
            &savings_badge(),
            &BadgeStats {
                money_saved: 100.0,
                ..BadgeStats::default()
            },
        );
        assert_eq!(full.progress_percent, 100.0);
        assert!(full.unlocked);
    }

    #[test]
    fn category_selects_the_matching_stat() {
        let stats = BadgeStats {
            days: 3.5,
            cravings_resisted: 5,
            money_saved: 250.0,
        };
        assert_eq!(badge_progress(BadgeCategory::Streak, 7.0, &stats), 50.0);
        assert_eq!(badge_progress(BadgeCategory::Health, 7.0, &stats), 50.0);
        assert_eq!(badge_progress(BadgeCategory::Craving, 10.0, &stats), 50.0);
        assert_eq!(badge_progress(BadgeCategory::Savings, 500.0, &stats), 50.0);
    }

    #[test]
    fn unknown_category_maps_to_zero() {
        let category: BadgeCategory = serde_json::from_str("\"mystery\"").unwrap();
        assert_eq!(category, BadgeCategory::Unknown);
        let stats = BadgeStats {
            days: 400.0,
            cravings_resisted: 400,
            money_saved: 4000.0,
        };
        assert_eq!(badge_progress(category, 1.0, &stats), 0.0);
    }

    #[test]
    fn progress_is_bounded() {
        let huge = BadgeStats {
            days: 1e9,
            cravings_resisted: u32::MAX,
            money_saved: 1e12,
        };
        for status in evaluate_all(&BADGES, &huge) {
            assert_eq!(status.progress_percent, 100.0);
            assert!(status.unlocked);
        }
        for status in evaluate_all(&BADGES, &BadgeStats::default()) {
            assert_eq!(status.progress_percent, 0.0);
            assert!(!status.unlocked);
        }
        assert_eq!(badge_progress(BadgeCategory::Streak, 0.0, &huge), 0.0);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = BADGES.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), BADGES.len());
    }

    #[test]
    fn detects_transitions_between_snapshots() {
        let before = evaluate_all(
            &BADGES,
            &BadgeStats {
                days: 0.9,
                ..BadgeStats::default()
            },
        );
        let after = evaluate_all(
            &BADGES,
            &BadgeStats {
                days: 1.2,
                ..BadgeStats::default()
            },
        );
        let fresh: Vec<_> = newly_unlocked(Some(before.as_slice()), &after)
            .into_iter()
            .map(|s| s.badge.id)
            .collect();
        assert_eq!(fresh, vec!["streak-1", "health-1"]);

        assert!(newly_unlocked(Some(after.as_slice()), &after).is_empty());
        assert!(newly_unlocked(None, &after).is_empty());
    }
}
