use crate::errors::AppError;
use crate::models::{AppData, CravingEvent, NewCravingRequest, UpdateCravingRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

const INTENSITY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CravingCounts {
    pub total: u32,
    pub resisted: u32,
}

impl CravingCounts {
    pub fn from_events(events: &[CravingEvent]) -> Self {
        let resisted = events.iter().filter(|event| !event.gave_in).count();
        Self {
            total: events.len() as u32,
            resisted: resisted as u32,
        }
    }
}

pub fn list_cravings(data: &AppData, user_id: &str) -> Vec<CravingEvent> {
    let mut events: Vec<CravingEvent> = data
        .cravings
        .iter()
        .filter(|event| event.user_id == user_id)
        .cloned()
        .collect();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

pub fn record_craving(
    data: &mut AppData,
    user_id: &str,
    request: NewCravingRequest,
    now: DateTime<Utc>,
) -> Result<CravingEvent, AppError> {
    check_intensity(request.intensity)?;

    let event = CravingEvent {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        timestamp: now,
        intensity: request.intensity,
        trigger: request.trigger,
        coping_strategy: request.coping_strategy,
        notes: request.notes.trim().to_string(),
        gave_in: request.gave_in,
        cigarettes_smoked: if request.gave_in {
            request.cigarettes_smoked
        } else {
            0
        },
        resolved: false,
        resolved_at: None,
    };
    data.cravings.push(event.clone());
    Ok(event)
}

pub fn update_craving(
    data: &mut AppData,
    user_id: &str,
    craving_id: &str,
    request: UpdateCravingRequest,
) -> Result<CravingEvent, AppError> {
    if let Some(intensity) = request.intensity {
        check_intensity(intensity)?;
    }

    let event = owned_mut(data, user_id, craving_id)?;
    if let Some(intensity) = request.intensity {
        event.intensity = intensity;
    }
    if let Some(trigger) = request.trigger {
        event.trigger = trigger;
    }
    if let Some(strategy) = request.coping_strategy {
        event.coping_strategy = strategy;
    }
    if let Some(notes) = request.notes {
        event.notes = notes.trim().to_string();
    }
    Ok(event.clone())
}

/// Marks a craving resolved. Resolving twice keeps the first `resolved_at`.
pub fn resolve_craving(
    data: &mut AppData,
    user_id: &str,
    craving_id: &str,
    now: DateTime<Utc>,
) -> Result<CravingEvent, AppError> {
    let event = owned_mut(data, user_id, craving_id)?;
    if !event.resolved {
        event.resolved = true;
        event.resolved_at = Some(now);
    }
    Ok(event.clone())
}

pub fn delete_craving(
    data: &mut AppData,
    user_id: &str,
    craving_id: &str,
) -> Result<CravingEvent, AppError> {
    let index = data
        .cravings
        .iter()
        .position(|event| event.id == craving_id && event.user_id == user_id)
        .ok_or_else(|| not_found(craving_id))?;
    Ok(data.cravings.remove(index))
}

fn owned_mut<'a>(
    data: &'a mut AppData,
    user_id: &str,
    craving_id: &str,
) -> Result<&'a mut CravingEvent, AppError> {
    data.cravings
        .iter_mut()
        .find(|event| event.id == craving_id && event.user_id == user_id)
        .ok_or_else(|| not_found(craving_id))
}

fn check_intensity(intensity: u8) -> Result<(), AppError> {
    if INTENSITY_RANGE.contains(&intensity) {
        Ok(())
    } else {
        Err(AppError::bad_request("intensity must be between 1 and 10"))
    }
}

fn not_found(craving_id: &str) -> AppError {
    AppError::not_found(format!("craving {craving_id} not found"))
}
