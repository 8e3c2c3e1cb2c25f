use time::{Duration, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Activity, CreateHouseholdInput, CreateMemberInput, CreatePodInput, Household, Member, Pod,
        RecordActivityInput,
    },
    repository::{ActivityRepository, HouseholdRepository, NewActivity},
    telemetry::{ACTIVITIES_RECORDED, HOUSEHOLDS_CREATED},
};

pub const MAX_ACTIVITY_HOURS: f64 = 24.0;

/// Clock skew tolerated for activities reported "just now" by a client.
const FUTURE_TOLERANCE: Duration = Duration::minutes(5);

#[derive(Clone)]
pub struct HouseholdService {
    household_repo: HouseholdRepository,
    activity_repo: ActivityRepository,
}

impl HouseholdService {
    pub fn new(household_repo: HouseholdRepository, activity_repo: ActivityRepository) -> Self {
        Self {
            household_repo,
            activity_repo,
        }
    }

    /// Resolves a household the caller may access: unknown ids are 404,
    /// households the caller has no access to are 403.
    #[instrument(name = "household.authorize", skip(self))]
    pub async fn authorize(&self, user_id: i32, household_id: &str) -> AppResult<Household> {
        let household = self.household_repo.find_by_id(household_id).await?;
        let granted = match &household {
            Some(found) => {
                self.household_repo
                    .has_access(&found.household_id, user_id)
                    .await?
            }
            None => false,
        };

        if household.is_some() && !granted {
            tracing::warn!(user_id, household_id, "Household access denied");
        }

        access_decision(household, granted)
    }

    #[instrument(name = "household.create", skip(self, input))]
    pub async fn create(&self, user_id: i32, input: CreateHouseholdInput) -> AppResult<Household> {
        let name = required("name", &input.name)?;
        let household_id = Uuid::new_v4().to_string();

        let household = self
            .household_repo
            .create(&household_id, name, user_id)
            .await?;

        HOUSEHOLDS_CREATED.add(1, &[]);
        tracing::info!(household_id = %household.household_id, user_id, "Household created");

        Ok(household)
    }

    #[instrument(name = "household.add_pod", skip(self, input))]
    pub async fn add_pod(
        &self,
        user_id: i32,
        household_id: &str,
        input: CreatePodInput,
    ) -> AppResult<Pod> {
        let household = self.authorize(user_id, household_id).await?;
        let pod_name = required("pod_name", &input.pod_name)?;
        let icon = input.icon.as_deref().map(str::trim).unwrap_or("");

        let pod = self
            .household_repo
            .create_pod(
                &Uuid::new_v4().to_string(),
                &household.household_id,
                pod_name,
                icon,
            )
            .await?;

        tracing::info!(pod_id = %pod.pod_id, household_id, "Pod created");
        Ok(pod)
    }

    #[instrument(name = "household.add_member", skip(self, input))]
    pub async fn add_member(
        &self,
        user_id: i32,
        household_id: &str,
        input: CreateMemberInput,
    ) -> AppResult<Member> {
        let household = self.authorize(user_id, household_id).await?;
        let member_name = required("member_name", &input.member_name)?;
        let avatar_emoji = input.avatar_emoji.as_deref().map(str::trim).unwrap_or("");

        let member = self
            .household_repo
            .create_member(
                &Uuid::new_v4().to_string(),
                &household.household_id,
                member_name,
                avatar_emoji,
            )
            .await?;

        tracing::info!(member_id = %member.member_id, household_id, "Member added");
        Ok(member)
    }

    #[instrument(name = "household.record_activity", skip(self, input))]
    pub async fn record_activity(
        &self,
        user_id: i32,
        household_id: &str,
        input: RecordActivityInput,
    ) -> AppResult<Activity> {
        let household = self.authorize(user_id, household_id).await?;
        let pods = self
            .household_repo
            .list_pods(&household.household_id)
            .await?;
        let members = self
            .household_repo
            .list_members(&household.household_id)
            .await?;

        let now = OffsetDateTime::now_utc();
        let validated = validate_activity(input, &pods, &members, now)?;

        let activity = self
            .activity_repo
            .create(NewActivity {
                activity_id: &Uuid::new_v4().to_string(),
                household_id: &household.household_id,
                pod_id: validated.pod_id.as_deref(),
                initiator_id: &validated.initiator_id,
                participant_ids: &validated.participant_ids,
                title: &validated.title,
                occurred_at: validated.occurred_at,
                duration_hours: validated.duration_hours,
                rating: validated.rating,
            })
            .await?;

        ACTIVITIES_RECORDED.add(1, &[]);
        tracing::info!(
            activity_id = %activity.activity_id,
            household_id,
            duration_hours = activity.duration_hours,
            "Activity recorded"
        );

        Ok(activity)
    }
}

fn access_decision(household: Option<Household>, granted: bool) -> AppResult<Household> {
    match household {
        None => Err(AppError::NotFound("Household not found".to_string())),
        Some(_) if !granted => Err(AppError::Forbidden),
        Some(household) => Ok(household),
    }
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

#[derive(Debug)]
struct ValidatedActivity {
    title: String,
    pod_id: Option<String>,
    initiator_id: String,
    participant_ids: Vec<String>,
    occurred_at: OffsetDateTime,
    duration_hours: f64,
    rating: Option<i16>,
}

fn validate_activity(
    input: RecordActivityInput,
    pods: &[Pod],
    members: &[Member],
    now: OffsetDateTime,
) -> AppResult<ValidatedActivity> {
    let title = required("title", &input.title)?.to_string();

    if !input.duration_hours.is_finite()
        || input.duration_hours <= 0.0
        || input.duration_hours > MAX_ACTIVITY_HOURS
    {
        return Err(AppError::Validation(format!(
            "duration_hours must be greater than 0 and at most {MAX_ACTIVITY_HOURS}"
        )));
    }

    if let Some(rating) = input.rating
        && !(1..=5).contains(&rating)
    {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    if let Some(pod_id) = input.pod_id.as_deref()
        && !pods.iter().any(|p| p.pod_id == pod_id)
    {
        return Err(AppError::Validation(format!(
            "pod {pod_id} does not belong to this household"
        )));
    }

    let is_member = |id: &str| members.iter().any(|m| m.member_id == id);
    if !is_member(&input.initiator_id) {
        return Err(AppError::Validation(format!(
            "initiator {} is not a member of this household",
            input.initiator_id
        )));
    }

    let mut participant_ids: Vec<String> = Vec::with_capacity(input.participant_ids.len());
    for id in input.participant_ids {
        if !is_member(&id) {
            return Err(AppError::Validation(format!(
                "participant {id} is not a member of this household"
            )));
        }
        if id != input.initiator_id && !participant_ids.contains(&id) {
            participant_ids.push(id);
        }
    }

    let occurred_at = input.occurred_at.unwrap_or(now);
    if occurred_at > now + FUTURE_TOLERANCE {
        return Err(AppError::Validation(
            "occurred_at cannot be in the future".to_string(),
        ));
    }

    Ok(ValidatedActivity {
        title,
        pod_id: input.pod_id,
        initiator_id: input.initiator_id,
        participant_ids,
        occurred_at,
        duration_hours: input.duration_hours,
        rating: input.rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-10-12 18:00:00 UTC);

    fn pods() -> Vec<Pod> {
        vec![Pod {
            pod_id: "pod-1".to_string(),
            household_id: "hh-1".to_string(),
            pod_name: "The Whole Gang".to_string(),
            icon: String::new(),
        }]
    }

    fn members() -> Vec<Member> {
        ["m-1", "m-2"]
            .into_iter()
            .map(|id| Member {
                member_id: id.to_string(),
                household_id: "hh-1".to_string(),
                member_name: id.to_uppercase(),
                avatar_emoji: String::new(),
            })
            .collect()
    }

    fn input() -> RecordActivityInput {
        RecordActivityInput {
            title: "  Park walk ".to_string(),
            pod_id: Some("pod-1".to_string()),
            initiator_id: "m-1".to_string(),
            participant_ids: vec!["m-2".to_string(), "m-1".to_string(), "m-2".to_string()],
            occurred_at: None,
            duration_hours: 1.5,
            rating: Some(5),
        }
    }

    fn assert_invalid(input: RecordActivityInput) {
        let result = validate_activity(input, &pods(), &members(), NOW);
        assert!(
            matches!(result, Err(AppError::Validation(_))),
            "expected validation error, got {result:?}"
        );
    }

    fn household() -> Household {
        Household {
            household_id: "hh-1".to_string(),
            name: "The Parkers".to_string(),
            created_at: NOW,
        }
    }

    #[test]
    fn test_unknown_household_is_not_found() {
        let result = access_decision(None, false);
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(
            result.unwrap_err().status_code(),
            axum::http::StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_household_without_access_is_forbidden() {
        let result = access_decision(Some(household()), false);
        assert!(matches!(result, Err(AppError::Forbidden)));
        assert_eq!(
            result.unwrap_err().status_code(),
            axum::http::StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_household_with_access_is_returned() {
        let found = access_decision(Some(household()), true).expect("access is granted");
        assert_eq!(found.household_id, "hh-1");
    }

    #[test]
    fn test_valid_activity_is_normalized() {
        let validated =
            validate_activity(input(), &pods(), &members(), NOW).expect("input is valid");

        assert_eq!(validated.title, "Park walk");
        assert_eq!(validated.occurred_at, NOW);
        assert_eq!(validated.participant_ids, vec!["m-2".to_string()]);
    }

    #[test]
    fn test_duration_bounds() {
        assert_invalid(RecordActivityInput {
            duration_hours: 0.0,
            ..input()
        });
        assert_invalid(RecordActivityInput {
            duration_hours: 25.0,
            ..input()
        });
        assert_invalid(RecordActivityInput {
            duration_hours: f64::NAN,
            ..input()
        });
    }

    #[test]
    fn test_rating_bounds() {
        assert_invalid(RecordActivityInput {
            rating: Some(0),
            ..input()
        });
        assert_invalid(RecordActivityInput {
            rating: Some(6),
            ..input()
        });
        assert!(
            validate_activity(
                RecordActivityInput {
                    rating: None,
                    ..input()
                },
                &pods(),
                &members(),
                NOW
            )
            .is_ok()
        );
    }

    #[test]
    fn test_foreign_pod_and_members_are_rejected() {
        assert_invalid(RecordActivityInput {
            pod_id: Some("pod-other".to_string()),
            ..input()
        });
        assert_invalid(RecordActivityInput {
            initiator_id: "m-9".to_string(),
            ..input()
        });
        assert_invalid(RecordActivityInput {
            participant_ids: vec!["m-9".to_string()],
            ..input()
        });
    }

    #[test]
    fn test_future_timestamp_is_rejected() {
        assert_invalid(RecordActivityInput {
            occurred_at: Some(NOW + Duration::hours(2)),
            ..input()
        });

        let slightly_ahead = RecordActivityInput {
            occurred_at: Some(NOW + Duration::minutes(1)),
            ..input()
        };
        assert!(validate_activity(slightly_ahead, &pods(), &members(), NOW).is_ok());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        assert_invalid(RecordActivityInput {
            title: "   ".to_string(),
            ..input()
        });
    }
}
