use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Household {
    pub household_id: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pod {
    pub pod_id: String,
    #[serde(skip_serializing)]
    pub household_id: String,
    pub pod_name: String,
    pub icon: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub member_id: String,
    #[serde(skip_serializing)]
    pub household_id: String,
    pub member_name: String,
    pub avatar_emoji: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHouseholdInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePodInput {
    pub pod_name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMemberInput {
    pub member_name: String,
    #[serde(default)]
    pub avatar_emoji: Option<String>,
}

/// Query string shared by the metrics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct HouseholdQuery {
    pub household_id: Option<String>,
}

impl HouseholdQuery {
    /// A missing or blank `household_id` is a client error, never an implicit
    /// "all households" filter.
    pub fn require_household_id(self) -> AppResult<String> {
        match self.household_id {
            Some(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => Err(AppError::Validation(
                "household_id query parameter is required".to_string(),
            )),
        }
    }
}
