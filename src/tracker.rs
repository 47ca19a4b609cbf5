//! Last-known-good snapshots of each user's progress.

use crate::badges::{BADGES, BadgeStats, BadgeStatus, evaluate_all, newly_unlocked};
use crate::cravings::CravingCounts;
use crate::progress::{
    DerivedStats, DisplayValues, Elapsed, ProgressError, RelapseSummary, compute_stats_at,
};
use crate::recovery::{RecoveryMap, build_recovery};
use crate::store::{EventStore, ProfileStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const FIRST_HOUR_CADENCE: Duration = Duration::from_secs(1);
const STEADY_CADENCE: Duration = Duration::from_secs(60);

/// How often a user's numbers are worth recomputing: every second during the
/// first hour after quitting, every minute after that.
pub fn refresh_cadence(elapsed: &Elapsed) -> Duration {
    if elapsed.days == 0 && elapsed.hours == 0 {
        FIRST_HOUR_CADENCE
    } else {
        STEADY_CADENCE
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub stats: DerivedStats,
    pub display: DisplayValues,
    pub badge_stats: BadgeStats,
    pub badges: Vec<BadgeStatus>,
    /// Unlocks not yet handed out by `acknowledge_unlocks`.
    pub newly_unlocked: Vec<&'static str>,
    pub cravings: CravingCounts,
    pub recovery: RecoveryMap,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Tracked {
    pub snapshot: Snapshot,
    pub stale: bool,
}

#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<String, Snapshot>,
}

impl SnapshotCache {
    pub fn get(&self, user_id: &str) -> Option<&Snapshot> {
        self.entries.get(user_id)
    }

    pub fn is_due(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        let Some(snapshot) = self.entries.get(user_id) else {
            return true;
        };
        let age = now
            .signed_duration_since(snapshot.computed_at)
            .to_std()
            .unwrap_or_default();
        age >= refresh_cadence(&snapshot.stats.elapsed)
    }

    /// Recomputes a user's snapshot from the stores. On failure the previous
    /// snapshot, if any, is left untouched.
    pub fn refresh<S>(
        &mut self,
        store: &S,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Snapshot, ProgressError>
    where
        S: ProfileStore + EventStore,
    {
        let profile = store
            .profile(user_id)?
            .ok_or_else(|| ProgressError::ProfileMissing(user_id.to_string()))?;
        let events = store.cravings(user_id)?;
        let relapses = store.relapses(user_id)?;

        if now < profile.quit_timestamp {
            warn!(
                "clock skew for {user_id}: now {now} precedes quit time {}",
                profile.quit_timestamp
            );
        }

        let stats = compute_stats_at(now, &profile, &relapses)?;
        let cravings = CravingCounts::from_events(&events);
        let badge_stats = BadgeStats {
            days: stats.elapsed_days,
            cravings_resisted: cravings.resisted,
            money_saved: stats.money_saved,
        };
        let badges = evaluate_all(&BADGES, &badge_stats);
        let recovery = build_recovery(
            stats.elapsed_days,
            &RelapseSummary::from_events(&relapses, now),
            profile.cigarettes_per_day,
        );

        let previous = self.entries.get(user_id);
        let fresh: Vec<&'static str> =
            newly_unlocked(previous.map(|snapshot| snapshot.badges.as_slice()), &badges)
                .into_iter()
                .map(|status| status.badge.id)
                .collect();
        for id in &fresh {
            info!("{user_id} unlocked badge {id}");
        }
        let mut pending = previous
            .map(|snapshot| snapshot.newly_unlocked.clone())
            .unwrap_or_default();
        pending.retain(|id| {
            badges
                .iter()
                .any(|status| status.unlocked && status.badge.id == *id)
        });
        for id in fresh {
            if !pending.contains(&id) {
                pending.push(id);
            }
        }
        let display = previous
            .map(|snapshot| snapshot.display.step_toward(&stats))
            .unwrap_or_else(|| DisplayValues::exact(&stats));

        let snapshot = Snapshot {
            stats,
            display,
            badge_stats,
            badges,
            newly_unlocked: pending,
            cravings,
            recovery,
            computed_at: now,
        };
        self.entries.insert(user_id.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    /// Hands out the pending unlocks for a user and clears them.
    pub fn acknowledge_unlocks(&mut self, user_id: &str) -> Vec<&'static str> {
        self.entries
            .get_mut(user_id)
            .map(|snapshot| std::mem::take(&mut snapshot.newly_unlocked))
            .unwrap_or_default()
    }

    /// Refreshes, falling back to the last good snapshot when the stores
    /// cannot answer.
    pub fn current<S>(
        &mut self,
        store: &S,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Tracked, ProgressError>
    where
        S: ProfileStore + EventStore,
    {
        match self.refresh(store, user_id, now) {
            Ok(snapshot) => Ok(Tracked {
                snapshot,
                stale: false,
            }),
            Err(ProgressError::DataUnavailable(reason)) => match self.entries.get(user_id) {
                Some(snapshot) => {
                    warn!("serving stale stats for {user_id}: {reason}");
                    Ok(Tracked {
                        snapshot: snapshot.clone(),
                        stale: true,
                    })
                }
                None => Err(ProgressError::DataUnavailable(reason)),
            },
            Err(ProgressError::ProfileMissing(user)) => {
                self.entries.remove(user_id);
                Err(ProgressError::ProfileMissing(user))
            }
            Err(err) => Err(err),
        }
    }
}
