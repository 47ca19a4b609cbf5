//! Derived statistics for a quit attempt.
//!
//! Everything here is a pure function of the profile, the relapse events and
//! an explicit `now`; callers own the clock.

use crate::models::{CravingEvent, Currency, SmokingProfile};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

const MINUTES_PER_DAY: f64 = 1440.0;
const SECONDS_PER_DAY: i64 = 86_400;

/// Flat penalty applied to recovery progress after a relapse in the last day.
pub const RECENT_RELAPSE_PENALTY: f64 = 25.0;
/// Points lost per day's worth of cigarettes smoked since quitting.
pub const RELAPSE_DAY_PENALTY: f64 = 10.0;

pub const MAX_CIGARETTES_PER_DAY: f64 = 1000.0;
pub const MAX_COST_PER_PACK: f64 = 10_000.0;

pub const HEALTH_MILESTONES: [(u32, &str); 6] = [
    (1, "Blood oxygen levels return to normal"),
    (2, "Sense of taste and smell improve"),
    (3, "Breathing becomes easier"),
    (14, "Circulation improves"),
    (30, "Lung function increases"),
    (90, "Risk of heart attack decreases"),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("no smoking profile recorded for user {0}")]
    ProfileMissing(String),
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

/// Time since quitting. Measured on the UTC timeline, so every day is
/// exactly 86 400 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Elapsed {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Elapsed {
    /// Negative spans (clock skew) collapse to zero.
    pub fn between(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = now.signed_duration_since(start).num_seconds().max(0);
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_minutes(&self) -> f64 {
        self.days as f64 * MINUTES_PER_DAY
            + self.hours as f64 * 60.0
            + self.minutes as f64
            + self.seconds as f64 / 60.0
    }

    pub fn fractional_days(&self) -> f64 {
        self.days as f64
            + self.hours as f64 / 24.0
            + self.minutes as f64 / MINUTES_PER_DAY
            + self.seconds as f64 / SECONDS_PER_DAY as f64
    }
}

/// Aggregate of the events where the user gave in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelapseSummary {
    pub cigarettes: u64,
    pub recent: bool,
}

impl RelapseSummary {
    pub fn from_events<'a, I>(events: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a CravingEvent>,
    {
        let window_start = now - Duration::hours(24);
        events
            .into_iter()
            .filter(|event| event.gave_in)
            .fold(Self::default(), |acc, event| Self {
                cigarettes: acc.cigarettes.saturating_add(u64::from(event.cigarettes_smoked)),
                recent: acc.recent || (event.timestamp > window_start && event.timestamp <= now),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub label: &'static str,
    pub threshold_days: u32,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStats {
    pub elapsed: Elapsed,
    pub elapsed_days: f64,
    pub cigarettes_not_smoked: f64,
    pub money_saved: f64,
    pub currency: Currency,
    pub health_milestones: Vec<MilestoneProgress>,
}

pub fn validate_profile(profile: &SmokingProfile) -> Result<(), ProgressError> {
    if !profile.cigarettes_per_day.is_finite() || profile.cigarettes_per_day <= 0.0 {
        return Err(ProgressError::InvalidProfile(
            "cigarettes_per_day must be a positive number".to_string(),
        ));
    }
    if profile.cigarettes_per_day > MAX_CIGARETTES_PER_DAY {
        return Err(ProgressError::InvalidProfile(format!(
            "cigarettes_per_day must be at most {MAX_CIGARETTES_PER_DAY}"
        )));
    }
    if profile.cigarettes_per_pack == 0 {
        return Err(ProgressError::InvalidProfile(
            "cigarettes_per_pack must be greater than zero".to_string(),
        ));
    }
    if !profile.cost_per_pack.is_finite() || profile.cost_per_pack < 0.0 {
        return Err(ProgressError::InvalidProfile(
            "cost_per_pack must be zero or more".to_string(),
        ));
    }
    if profile.cost_per_pack > MAX_COST_PER_PACK {
        return Err(ProgressError::InvalidProfile(format!(
            "cost_per_pack must be at most {MAX_COST_PER_PACK}"
        )));
    }
    Ok(())
}

pub fn compute_stats_at(
    now: DateTime<Utc>,
    profile: &SmokingProfile,
    relapses: &[CravingEvent],
) -> Result<DerivedStats, ProgressError> {
    validate_profile(profile)?;

    let elapsed = Elapsed::between(profile.quit_timestamp, now);
    let relapse = RelapseSummary::from_events(relapses, now);

    let per_minute = profile.cigarettes_per_day / MINUTES_PER_DAY;
    let theoretical = elapsed.total_minutes() * per_minute;
    let cigarettes_not_smoked = round2((theoretical - relapse.cigarettes as f64).max(0.0));
    let money_saved = round2(
        (cigarettes_not_smoked / f64::from(profile.cigarettes_per_pack) * profile.cost_per_pack)
            .max(0.0),
    );
    if !cigarettes_not_smoked.is_finite() || !money_saved.is_finite() {
        return Err(ProgressError::InvalidProfile(
            "derived savings are out of range".to_string(),
        ));
    }

    let elapsed_days = elapsed.fractional_days();
    let health_milestones = HEALTH_MILESTONES
        .iter()
        .map(|&(threshold_days, label)| MilestoneProgress {
            label,
            threshold_days,
            progress_percent: recovery_percent(
                elapsed_days,
                f64::from(threshold_days),
                &relapse,
                profile.cigarettes_per_day,
            ),
        })
        .collect();

    Ok(DerivedStats {
        elapsed,
        elapsed_days,
        cigarettes_not_smoked,
        money_saved,
        currency: profile.currency,
        health_milestones,
    })
}

/// Progress toward a recovery horizon, net of relapse penalties, in [0, 100].
///
/// `threshold_days` and `cigarettes_per_day` must be positive; a non-positive
/// value yields 0 rather than a division.
pub fn recovery_percent(
    elapsed_days: f64,
    threshold_days: f64,
    relapse: &RelapseSummary,
    cigarettes_per_day: f64,
) -> f64 {
    if threshold_days <= 0.0 || cigarettes_per_day <= 0.0 {
        return 0.0;
    }

    let mut progress = elapsed_days / threshold_days * 100.0;
    if relapse.recent {
        progress -= RECENT_RELAPSE_PENALTY;
    }
    progress -= relapse.cigarettes as f64 / cigarettes_per_day * RELAPSE_DAY_PENALTY;
    progress.clamp(0.0, 100.0)
}

/// Presentation-only easing of a displayed number toward its true value.
pub const SMOOTHING_FACTOR: f64 = 0.1;
/// Below this gap a cent-rounded step would make no progress.
const MONEY_SNAP: f64 = 0.1;

pub fn smooth_toward(shown: f64, truth: f64) -> f64 {
    shown + (truth - shown) * SMOOTHING_FACTOR
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayValues {
    pub cigarettes_not_smoked: f64,
    pub money_saved: f64,
}

impl DisplayValues {
    pub fn exact(stats: &DerivedStats) -> Self {
        Self {
            cigarettes_not_smoked: stats.cigarettes_not_smoked,
            money_saved: stats.money_saved,
        }
    }

    /// Next displayed values; money stays at cent precision.
    pub fn step_toward(&self, stats: &DerivedStats) -> Self {
        let money_saved = if (stats.money_saved - self.money_saved).abs() < MONEY_SNAP {
            stats.money_saved
        } else {
            round2(smooth_toward(self.money_saved, stats.money_saved))
        };
        Self {
            cigarettes_not_smoked: smooth_toward(
                self.cigarettes_not_smoked,
                stats.cigarettes_not_smoked,
            ),
            money_saved,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CopingStrategy, Trigger};
    use chrono::TimeZone;

    fn quit() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn profile() -> SmokingProfile {
        SmokingProfile {
            cigarettes_per_day: 20.0,
            cigarettes_per_pack: 20,
            cost_per_pack: 10.0,
            currency: Currency::Usd,
            quit_timestamp: quit(),
            years_smoking: None,
        }
    }

    fn relapse(at: DateTime<Utc>, cigarettes: u32) -> CravingEvent {
        CravingEvent {
            id: format!("relapse-{}", at.timestamp()),
            user_id: "u1".to_string(),
            timestamp: at,
            intensity: 8,
            trigger: Trigger::Stress,
            coping_strategy: CopingStrategy::Walking,
            notes: String::new(),
            gave_in: true,
            cigarettes_smoked: cigarettes,
            resolved: false,
            resolved_at: None,
        }
    }

    #[test]
    fn nothing_saved_at_quit_instant() {
        let stats = compute_stats_at(quit(), &profile(), &[]).unwrap();
        assert_eq!(stats.cigarettes_not_smoked, 0.0);
        assert_eq!(stats.money_saved, 0.0);
        assert_eq!(stats.elapsed, Elapsed::default());
    }

    #[test]
    fn one_day_without_relapse() {
        let now = quit() + Duration::hours(24);
        let stats = compute_stats_at(now, &profile(), &[]).unwrap();
        assert_eq!(stats.cigarettes_not_smoked, 20.0);
        assert_eq!(stats.money_saved, 10.0);
        assert_eq!(stats.elapsed.days, 1);
        assert_eq!(stats.health_milestones[0].progress_percent, 100.0);
    }

    #[test]
    fn relapse_subtracts_cigarettes_and_money() {
        let now = quit() + Duration::hours(24);
        let events = vec![relapse(quit() + Duration::hours(2), 5)];
        let stats = compute_stats_at(now, &profile(), &events).unwrap();
        assert_eq!(stats.cigarettes_not_smoked, 15.0);
        assert_eq!(stats.money_saved, 7.5);
    }

    #[test]
    fn heavy_relapse_never_goes_negative() {
        let now = quit() + Duration::hours(3);
        let events = vec![relapse(quit() + Duration::hours(1), 400)];
        let stats = compute_stats_at(now, &profile(), &events).unwrap();
        assert_eq!(stats.cigarettes_not_smoked, 0.0);
        assert_eq!(stats.money_saved, 0.0);
        assert!(
            stats
                .health_milestones
                .iter()
                .all(|m| m.progress_percent == 0.0)
        );
    }

    #[test]
    fn clock_skew_clamps_to_zero() {
        let now = quit() - Duration::minutes(30);
        let stats = compute_stats_at(now, &profile(), &[]).unwrap();
        assert_eq!(stats.elapsed, Elapsed::default());
        assert_eq!(stats.cigarettes_not_smoked, 0.0);
    }

    #[test]
    fn elapsed_decomposes_remainders() {
        let now = quit() + Duration::days(3) + Duration::hours(5) + Duration::seconds(125);
        let elapsed = Elapsed::between(quit(), now);
        assert_eq!(
            elapsed,
            Elapsed {
                days: 3,
                hours: 5,
                minutes: 2,
                seconds: 5
            }
        );
    }

    #[test]
    fn savings_never_decrease_over_time() {
        let events = vec![relapse(quit() + Duration::hours(1), 3)];
        let mut previous = (0.0, 0.0);
        for minutes in (0..3 * 1440).step_by(37) {
            let now = quit() + Duration::minutes(minutes);
            let stats = compute_stats_at(now, &profile(), &events).unwrap();
            assert!(stats.cigarettes_not_smoked >= previous.0);
            assert!(stats.money_saved >= previous.1);
            previous = (stats.cigarettes_not_smoked, stats.money_saved);
        }
    }

    #[test]
    fn milestones_grow_with_time_without_relapse() {
        let mut previous = vec![0.0; HEALTH_MILESTONES.len()];
        for hours in 0..(100 * 24) {
            let now = quit() + Duration::hours(hours);
            let stats = compute_stats_at(now, &profile(), &[]).unwrap();
            for (index, milestone) in stats.health_milestones.iter().enumerate() {
                assert!(milestone.progress_percent >= previous[index]);
                assert!((0.0..=100.0).contains(&milestone.progress_percent));
                previous[index] = milestone.progress_percent;
            }
        }
        assert!(previous.iter().all(|p| *p == 100.0));
    }

    #[test]
    fn recent_relapse_costs_flat_and_proportional_points() {
        let now = quit() + Duration::days(2);
        let events = vec![relapse(now - Duration::hours(2), 10)];
        let stats = compute_stats_at(now, &profile(), &events).unwrap();
        // 2 of 3 days = 66.67, minus 25 flat, minus 10/20*10 = 5.
        let breathing = &stats.health_milestones[2];
        assert_eq!(breathing.threshold_days, 3);
        assert!((breathing.progress_percent - (200.0 / 3.0 - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn old_relapse_only_costs_proportional_points() {
        let now = quit() + Duration::days(2);
        let summary = RelapseSummary::from_events(&[relapse(quit(), 10)], now);
        assert!(!summary.recent);
        assert_eq!(summary.cigarettes, 10);
        assert_eq!(recovery_percent(1.0, 2.0, &summary, 20.0), 45.0);
    }

    #[test]
    fn resisted_cravings_do_not_count_as_relapses() {
        let mut event = relapse(quit(), 4);
        event.gave_in = false;
        let summary = RelapseSummary::from_events(&[event], quit());
        assert_eq!(summary, RelapseSummary::default());
    }

    #[test]
    fn invalid_profiles_are_rejected() {
        let mut bad = profile();
        bad.cigarettes_per_day = 0.0;
        assert!(matches!(
            compute_stats_at(quit(), &bad, &[]),
            Err(ProgressError::InvalidProfile(_))
        ));

        let mut bad = profile();
        bad.cigarettes_per_pack = 0;
        assert!(matches!(
            compute_stats_at(quit(), &bad, &[]),
            Err(ProgressError::InvalidProfile(_))
        ));

        let mut bad = profile();
        bad.cigarettes_per_day = f64::NAN;
        assert!(validate_profile(&bad).is_err());
    }

    #[test]
    fn smoothing_moves_a_tenth_of_the_gap() {
        assert_eq!(smooth_toward(0.0, 10.0), 1.0);
        assert_eq!(smooth_toward(10.0, 10.0), 10.0);

        let stats = compute_stats_at(quit() + Duration::hours(24), &profile(), &[]).unwrap();
        let mut shown = DisplayValues {
            cigarettes_not_smoked: 0.0,
            money_saved: 0.0,
        };
        for _ in 0..200 {
            shown = shown.step_toward(&stats);
        }
        assert!((shown.cigarettes_not_smoked - 20.0).abs() < 0.01);
        assert_eq!(shown.money_saved, 10.0);
        assert_eq!(stats.money_saved, 10.0);
    }

    #[test]
    fn displayed_money_reaches_truth_from_a_few_cents_away() {
        let stats = compute_stats_at(quit() + Duration::hours(24), &profile(), &[]).unwrap();
        let shown = DisplayValues {
            cigarettes_not_smoked: 20.0,
            money_saved: 9.96,
        };
        assert_eq!(shown.step_toward(&stats).money_saved, 10.0);

        let far = DisplayValues {
            cigarettes_not_smoked: 20.0,
            money_saved: 9.0,
        };
        assert_eq!(far.step_toward(&stats).money_saved, 9.1);
    }

    #[test]
    fn huge_profiles_are_rejected_instead_of_overflowing() {
        let mut huge = profile();
        huge.cigarettes_per_day = 1e306;
        huge.cost_per_pack = 1e300;
        assert!(matches!(
            compute_stats_at(quit() + Duration::days(400), &huge, &[]),
            Err(ProgressError::InvalidProfile(_))
        ));

        let mut pricey = profile();
        pricey.cost_per_pack = 10_000.5;
        assert!(validate_profile(&pricey).is_err());

        let mut heavy = profile();
        heavy.cigarettes_per_day = MAX_CIGARETTES_PER_DAY;
        heavy.cost_per_pack = MAX_COST_PER_PACK;
        let stats = compute_stats_at(quit() + Duration::days(36_500), &heavy, &[]).unwrap();
        assert!(stats.money_saved.is_finite());
        assert!(stats.cigarettes_not_smoked.is_finite());
    }
}
