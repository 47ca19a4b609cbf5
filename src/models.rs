use crate::badges::{BadgeStats, BadgeStatus};
use crate::breathing::PhaseStep;
use crate::cravings::CravingCounts;
use crate::progress::{DerivedStats, DisplayValues, MilestoneProgress};
use crate::recovery::RecoveryMap;
use crate::tracker::Tracked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmokingProfile {
    pub cigarettes_per_day: f64,
    pub cigarettes_per_pack: u32,
    pub cost_per_pack: f64,
    #[serde(default)]
    pub currency: Currency,
    pub quit_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub years_smoking: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Stress,
    #[serde(rename = "After Meals")]
    AfterMeals,
    #[serde(rename = "Social Situations")]
    SocialSituations,
    Boredom,
    #[serde(rename = "Coffee/Drinks")]
    CoffeeDrinks,
    #[serde(rename = "Seeing Others Smoke")]
    SeeingOthersSmoke,
    #[serde(rename = "Work Break")]
    WorkBreak,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopingStrategy {
    #[serde(rename = "Deep Breathing")]
    DeepBreathing,
    Walking,
    #[serde(rename = "Drinking Water")]
    DrinkingWater,
    Distraction,
    Meditation,
    Exercise,
    #[serde(rename = "Call a Friend")]
    CallAFriend,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CravingEvent {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub intensity: u8,
    pub trigger: Trigger,
    pub coping_strategy: CopingStrategy,
    #[serde(default)]
    pub notes: String,
    pub gave_in: bool,
    #[serde(default)]
    pub cigarettes_smoked: u32,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Everything persisted to the data file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub profiles: BTreeMap<String, SmokingProfile>,
    #[serde(default)]
    pub cravings: Vec<CravingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub cigarettes_per_day: f64,
    pub cigarettes_per_pack: u32,
    pub cost_per_pack: f64,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub quit_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub years_smoking: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewCravingRequest {
    pub intensity: u8,
    pub trigger: Trigger,
    pub coping_strategy: CopingStrategy,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub gave_in: bool,
    #[serde(default)]
    pub cigarettes_smoked: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateCravingRequest {
    pub intensity: Option<u8>,
    pub trigger: Option<Trigger>,
    pub coping_strategy: Option<CopingStrategy>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: SmokingProfile,
    pub currency_symbol: &'static str,
}

impl From<SmokingProfile> for ProfileResponse {
    fn from(profile: SmokingProfile) -> Self {
        Self {
            currency_symbol: profile.currency.symbol(),
            profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DerivedStats,
    pub currency_symbol: &'static str,
    pub display: DisplayValues,
    pub cravings: CravingCounts,
    pub computed_at: DateTime<Utc>,
    pub stale: bool,
}

impl From<Tracked> for StatsResponse {
    fn from(tracked: Tracked) -> Self {
        let snapshot = tracked.snapshot;
        Self {
            currency_symbol: snapshot.stats.currency.symbol(),
            stats: snapshot.stats,
            display: snapshot.display,
            cravings: snapshot.cravings,
            computed_at: snapshot.computed_at,
            stale: tracked.stale,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BadgesResponse {
    pub stats: BadgeStats,
    pub badges: Vec<BadgeStatus>,
    pub newly_unlocked: Vec<&'static str>,
    pub unlocked_count: usize,
    pub stale: bool,
}

impl From<Tracked> for BadgesResponse {
    fn from(tracked: Tracked) -> Self {
        let snapshot = tracked.snapshot;
        Self {
            unlocked_count: snapshot.badges.iter().filter(|b| b.unlocked).count(),
            stats: snapshot.badge_stats,
            badges: snapshot.badges,
            newly_unlocked: snapshot.newly_unlocked,
            stale: tracked.stale,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecoveryResponse {
    pub milestones: Vec<MilestoneProgress>,
    #[serde(flatten)]
    pub recovery: RecoveryMap,
    pub stale: bool,
}

impl From<Tracked> for RecoveryResponse {
    fn from(tracked: Tracked) -> Self {
        let snapshot = tracked.snapshot;
        Self {
            milestones: snapshot.stats.health_milestones,
            recovery: snapshot.recovery,
            stale: tracked.stale,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreathingResponse {
    pub name: &'static str,
    pub steps: Vec<PhaseStep>,
    pub cycle_seconds: u32,
}
