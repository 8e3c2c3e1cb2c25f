use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppResult,
    middleware::{AppJson, AuthUser},
    models::{
        Activity, CreateHouseholdInput, CreateMemberInput, CreatePodInput, Household, Member, Pod,
        RecordActivityInput,
    },
};

pub async fn create_household(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(input): AppJson<CreateHouseholdInput>,
) -> AppResult<(StatusCode, Json<Household>)> {
    let household = state.household_service.create(user_id, input).await?;

    Ok((StatusCode::CREATED, Json(household)))
}

pub async fn create_pod(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<String>,
    AppJson(input): AppJson<CreatePodInput>,
) -> AppResult<(StatusCode, Json<Pod>)> {
    let pod = state
        .household_service
        .add_pod(user_id, &household_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(pod)))
}

pub async fn create_member(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<String>,
    AppJson(input): AppJson<CreateMemberInput>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let member = state
        .household_service
        .add_member(user_id, &household_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn record_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<String>,
    AppJson(input): AppJson<RecordActivityInput>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    let activity = state
        .household_service
        .record_activity(user_id, &household_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(activity)))
}
