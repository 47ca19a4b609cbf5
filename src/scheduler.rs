//! Background recomputation: a fixed ticker plus change notifications.

use crate::state::AppState;
use crate::store::ProfileStore;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub async fn run_ticker(state: AppState, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        refresh_due(&state, Utc::now()).await;
    }
}

/// Recomputes every user whose cadence has elapsed. Returns how many were
/// refreshed.
pub async fn refresh_due(state: &AppState, now: DateTime<Utc>) -> usize {
    let data = state.data.lock().await;
    let mut snapshots = state.snapshots.lock().await;

    let users = match data.user_ids() {
        Ok(users) => users,
        Err(err) => {
            warn!("skipping refresh: {err}");
            return 0;
        }
    };

    let mut refreshed = 0;
    for user_id in users {
        if !snapshots.is_due(&user_id, now) {
            continue;
        }
        match snapshots.refresh(&*data, &user_id, now) {
            Ok(_) => refreshed += 1,
            Err(err) => warn!("refresh failed for {user_id}: {err}"),
        }
    }
    refreshed
}

pub async fn run_change_listener(state: AppState, mut changes: Receiver<String>) {
    loop {
        match changes.recv().await {
            Ok(user_id) => {
                let data = state.data.lock().await;
                let mut snapshots = state.snapshots.lock().await;
                match snapshots.refresh(&*data, &user_id, Utc::now()) {
                    Ok(_) => debug!("recomputed {user_id} after change"),
                    Err(err) => warn!("recompute after change failed for {user_id}: {err}"),
                }
            }
            Err(RecvError::Lagged(missed)) => {
                debug!("change listener skipped {missed} notifications");
            }
            Err(RecvError::Closed) => {
                info!("change channel closed");
                break;
            }
        }
    }
}
