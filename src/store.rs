//! Read access to profiles and craving events.
//!
//! `AppData` is the local implementation; anything else answering these
//! queries (a remote document store, a test double) can stand in for it.

use crate::cravings::list_cravings;
use crate::models::{AppData, CravingEvent, SmokingProfile};
use crate::progress::ProgressError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ProgressError {
    fn from(err: StoreError) -> Self {
        ProgressError::DataUnavailable(err.to_string())
    }
}

pub trait ProfileStore {
    fn profile(&self, user_id: &str) -> Result<Option<SmokingProfile>, StoreError>;

    fn user_ids(&self) -> Result<Vec<String>, StoreError>;
}

pub trait EventStore {
    /// All of a user's cravings, newest first.
    fn cravings(&self, user_id: &str) -> Result<Vec<CravingEvent>, StoreError>;

    /// Cravings the user gave in to, newest first.
    fn relapses(&self, user_id: &str) -> Result<Vec<CravingEvent>, StoreError> {
        let mut events = self.cravings(user_id)?;
        events.retain(|event| event.gave_in);
        Ok(events)
    }
}

impl ProfileStore for AppData {
    fn profile(&self, user_id: &str) -> Result<Option<SmokingProfile>, StoreError> {
        Ok(self.profiles.get(user_id).cloned())
    }

    fn user_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.profiles.keys().cloned().collect())
    }
}

impl EventStore for AppData {
    fn cravings(&self, user_id: &str) -> Result<Vec<CravingEvent>, StoreError> {
        Ok(list_cravings(self, user_id))
    }
}
