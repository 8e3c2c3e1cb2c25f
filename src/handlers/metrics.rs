use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    error::AppResult,
    middleware::AuthUser,
    models::{AchievementDto, FamilyHealthMetrics, HouseholdQuery, MilestoneDto},
};

pub async fn get_family_health_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<HouseholdQuery>,
) -> AppResult<Json<FamilyHealthMetrics>> {
    let household_id = query.require_household_id()?;
    let metrics = state
        .metrics_service
        .family_health_metrics(user_id, &household_id)
        .await?;

    Ok(Json(metrics))
}

pub async fn get_achievements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<HouseholdQuery>,
) -> AppResult<Json<Vec<AchievementDto>>> {
    let household_id = query.require_household_id()?;
    let achievements = state
        .metrics_service
        .achievements(user_id, &household_id)
        .await?;

    Ok(Json(achievements))
}

pub async fn get_milestones(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<HouseholdQuery>,
) -> AppResult<Json<Vec<MilestoneDto>>> {
    let household_id = query.require_household_id()?;
    let milestones = state
        .metrics_service
        .milestones(user_id, &household_id)
        .await?;

    Ok(Json(milestones))
}
