use crate::breathing::pattern;
use crate::cravings::{
    delete_craving as remove_craving, list_cravings as user_cravings, record_craving,
    resolve_craving as mark_resolved, update_craving as edit_craving,
};
use crate::errors::AppError;
use crate::models::{
    AppData, BadgesResponse, BreathingResponse, CravingEvent, NewCravingRequest, ProfileRequest,
    ProfileResponse, RecoveryResponse, StatsResponse, UpdateCravingRequest,
};
use crate::profiles::upsert_profile;
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::{error, info};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn breathing_pattern() -> Json<BreathingResponse> {
    let steps = pattern();
    let cycle_seconds: u32 = steps.iter().map(|step| step.seconds).sum();
    Json(BreathingResponse {
        name: "4-7-8",
        steps,
        cycle_seconds,
    })
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let data = state.data.lock().await;
    let profile = data
        .profiles
        .get(&user_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("no profile for {user_id}")))?;
    Ok(Json(profile.into()))
}

pub async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = commit(&state, &user_id, |data| {
        upsert_profile(data, &user_id, payload, Utc::now())
    })
    .await?;

    info!("profile saved for {user_id}");
    Ok(Json(profile.into()))
}

pub async fn list_cravings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<CravingEvent>> {
    let data = state.data.lock().await;
    Json(user_cravings(&data, &user_id))
}

pub async fn create_craving(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<NewCravingRequest>,
) -> Result<(StatusCode, Json<CravingEvent>), AppError> {
    let event = commit(&state, &user_id, |data| {
        record_craving(data, &user_id, payload, Utc::now())
    })
    .await?;

    info!(
        "craving {} recorded for {user_id} (gave_in: {})",
        event.id, event.gave_in
    );
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_craving(
    State(state): State<AppState>,
    Path((user_id, craving_id)): Path<(String, String)>,
    Json(payload): Json<UpdateCravingRequest>,
) -> Result<Json<CravingEvent>, AppError> {
    let event = commit(&state, &user_id, |data| {
        edit_craving(data, &user_id, &craving_id, payload)
    })
    .await?;
    Ok(Json(event))
}

pub async fn resolve_craving(
    State(state): State<AppState>,
    Path((user_id, craving_id)): Path<(String, String)>,
) -> Result<Json<CravingEvent>, AppError> {
    let event = commit(&state, &user_id, |data| {
        mark_resolved(data, &user_id, &craving_id, Utc::now())
    })
    .await?;
    Ok(Json(event))
}

pub async fn delete_craving(
    State(state): State<AppState>,
    Path((user_id, craving_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    commit(&state, &user_id, |data| {
        remove_craving(data, &user_id, &craving_id)
    })
    .await?;

    info!("craving {craving_id} deleted for {user_id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let tracked = state.track(&user_id, Utc::now()).await?;
    Ok(Json(tracked.into()))
}

pub async fn get_badges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BadgesResponse>, AppError> {
    let tracked = state.track_badges(&user_id, Utc::now()).await?;
    Ok(Json(tracked.into()))
}

pub async fn get_recovery(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<RecoveryResponse>, AppError> {
    let tracked = state.track(&user_id, Utc::now()).await?;
    Ok(Json(tracked.into()))
}

/// Applies a change, persists it and notifies listeners. A failed write
/// rolls the in-memory data back so it keeps matching the file.
async fn commit<T>(
    state: &AppState,
    user_id: &str,
    change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut data = state.data.lock().await;
    let before = data.clone();
    let value = change(&mut data)?;
    if let Err(err) = persist_data(&state.data_path, &data).await {
        error!("write failed for {user_id}, reverting: {}", err.message);
        *data = before;
        return Err(err);
    }
    drop(data);

    state.notifier.notify(user_id);
    Ok(value)
}
