use crate::errors::AppError;
use crate::models::{AppData, ProfileRequest, SmokingProfile};
use crate::progress::validate_profile;
use chrono::{DateTime, Utc};

/// Creates or replaces a user's profile. A new profile starts its quit clock
/// at `now` unless the request names a time; an edit keeps the old one.
pub fn upsert_profile(
    data: &mut AppData,
    user_id: &str,
    request: ProfileRequest,
    now: DateTime<Utc>,
) -> Result<SmokingProfile, AppError> {
    let existing = data.profiles.get(user_id);
    let quit_timestamp = request
        .quit_timestamp
        .or_else(|| existing.map(|profile| profile.quit_timestamp))
        .unwrap_or(now);
    let currency = request
        .currency
        .or_else(|| existing.map(|profile| profile.currency))
        .unwrap_or_default();

    let profile = SmokingProfile {
        cigarettes_per_day: request.cigarettes_per_day,
        cigarettes_per_pack: request.cigarettes_per_pack,
        cost_per_pack: request.cost_per_pack,
        currency,
        quit_timestamp,
        years_smoking: request.years_smoking,
    };
    validate_profile(&profile).map_err(|err| AppError::bad_request(err.to_string()))?;

    data.profiles.insert(user_id.to_string(), profile.clone());
    Ok(profile)
}
