//! Tests against a real Postgres. They return early when `DATABASE_URL` is
//! not set.

mod common;

use axum::{body::to_bytes, http::StatusCode};
use family_engagement::{
    AppState,
    error::AppError,
    models::{
        CreateHouseholdInput, CreateMemberInput, Household, MilestoneProgress,
        RecordActivityInput, RegisterInput,
    },
    repository::ProgressRepository,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use common::{get, setup_database_app};

async fn register(state: &AppState) -> i32 {
    let user = state
        .auth_service
        .register(RegisterInput {
            email: format!("{}@example.com", Uuid::new_v4()),
            password: "correct-horse".to_string(),
            name: "Sarah".to_string(),
        })
        .await
        .expect("registration should succeed");
    user.id
}

async fn household_with_activity(state: &AppState, user_id: i32) -> Household {
    let household = state
        .household_service
        .create(
            user_id,
            CreateHouseholdInput {
                name: "The Parkers".to_string(),
            },
        )
        .await
        .expect("household should be created");

    let member = state
        .household_service
        .add_member(
            user_id,
            &household.household_id,
            CreateMemberInput {
                member_name: "Sarah".to_string(),
                avatar_emoji: None,
            },
        )
        .await
        .expect("member should be added");

    state
        .household_service
        .record_activity(
            user_id,
            &household.household_id,
            RecordActivityInput {
                title: "Park walk".to_string(),
                pod_id: None,
                initiator_id: member.member_id,
                participant_ids: vec![],
                occurred_at: None,
                duration_hours: 1.5,
                rating: Some(5),
            },
        )
        .await
        .expect("activity should be recorded");

    household
}

#[tokio::test]
async fn test_unknown_household_is_not_found() {
    let Some((state, _)) = setup_database_app().await else {
        return;
    };
    let user_id = register(&state).await;

    let result = state
        .metrics_service
        .family_health_metrics(user_id, &Uuid::new_v4().to_string())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_foreign_household_is_forbidden() {
    let Some((state, _)) = setup_database_app().await else {
        return;
    };
    let owner = register(&state).await;
    let stranger = register(&state).await;
    let household = household_with_activity(&state, owner).await;

    let result = state
        .metrics_service
        .achievements(stranger, &household.household_id)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_unlock_time_is_kept_across_reads() {
    let Some((state, _)) = setup_database_app().await else {
        return;
    };
    let user_id = register(&state).await;
    let household = household_with_activity(&state, user_id).await;

    let first = state
        .metrics_service
        .achievements(user_id, &household.household_id)
        .await
        .expect("first read succeeds");
    let second = state
        .metrics_service
        .achievements(user_id, &household.household_id)
        .await
        .expect("second read succeeds");

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "first-steps");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].unlocked_at, first[0].unlocked_at);
}

#[tokio::test]
async fn test_completed_milestone_stays_frozen() {
    let Some((state, _)) = setup_database_app().await else {
        return;
    };
    let user_id = register(&state).await;
    let household = household_with_activity(&state, user_id).await;
    let progress = ProgressRepository::new(state.pool.clone());

    let completed = MilestoneProgress {
        milestone_id: "first-25".to_string(),
        current_value: 25,
        completed: true,
    };
    let stored = progress
        .save_milestone(&household.household_id, &completed)
        .await
        .expect("save succeeds");
    assert_eq!(stored, completed);

    let lower = MilestoneProgress {
        milestone_id: "first-25".to_string(),
        current_value: 3,
        completed: false,
    };
    let stored = progress
        .save_milestone(&household.household_id, &lower)
        .await
        .expect("save succeeds");
    assert_eq!(stored, completed);

    let milestones = state
        .metrics_service
        .milestones(user_id, &household.household_id)
        .await
        .expect("milestones load");
    let first_25 = milestones
        .iter()
        .find(|m| m.id == "first-25")
        .expect("catalog milestone");
    assert!(first_25.completed);
    assert_eq!(first_25.current_value, 25);
}

#[tokio::test]
async fn test_progress_never_regresses_in_storage() {
    let Some((state, _)) = setup_database_app().await else {
        return;
    };
    let user_id = register(&state).await;
    let household = household_with_activity(&state, user_id).await;
    let progress = ProgressRepository::new(state.pool.clone());

    let higher = MilestoneProgress {
        milestone_id: "century-club".to_string(),
        current_value: 40,
        completed: false,
    };
    progress
        .save_milestone(&household.household_id, &higher)
        .await
        .expect("save succeeds");

    let stored = progress
        .save_milestone(
            &household.household_id,
            &MilestoneProgress {
                current_value: 12,
                ..higher.clone()
            },
        )
        .await
        .expect("save succeeds");

    assert_eq!(stored.current_value, 40);
}

#[tokio::test]
async fn test_authenticated_metrics_request_succeeds() {
    let Some((state, app)) = setup_database_app().await else {
        return;
    };
    let user_id = register(&state).await;
    let household = household_with_activity(&state, user_id).await;
    let token = tokio_test::assert_ok!(state.auth_service.issue_token(user_id));

    let uri = format!("/family-health-metrics?household_id={}", household.household_id);
    let response = app.oneshot(get(&uri, Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["household_id"], household.household_id);
    assert_eq!(body["total_activities_all_time"], 1);
    assert_eq!(body["current_streak"], 1);
    assert_eq!(body["average_rating"], 5.0);
    assert_eq!(body["weekly_trend"]["daily_counts"][6], 1);
    assert_eq!(body["recent_achievements"][0]["id"], "first-steps");
    assert_eq!(body["milestones"].as_array().map(Vec::len), Some(4));
}
