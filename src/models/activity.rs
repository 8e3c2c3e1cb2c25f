use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub activity_id: String,
    #[serde(skip_serializing)]
    pub household_id: String,
    pub pod_id: Option<String>,
    pub initiator_id: String,
    pub participant_ids: Vec<String>,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
    pub duration_hours: f64,
    pub rating: Option<i16>,
}

impl Activity {
    /// Whether `member_id` initiated or took part in this activity.
    pub fn involves(&self, member_id: &str) -> bool {
        self.initiator_id == member_id || self.participant_ids.iter().any(|p| p == member_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordActivityInput {
    pub title: String,
    #[serde(default)]
    pub pod_id: Option<String>,
    pub initiator_id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub occurred_at: Option<OffsetDateTime>,
    pub duration_hours: f64,
    #[serde(default)]
    pub rating: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_involves_initiator_and_participants() {
        let activity = Activity {
            activity_id: "a-1".to_string(),
            household_id: "hh-1".to_string(),
            pod_id: None,
            initiator_id: "m-1".to_string(),
            participant_ids: vec!["m-2".to_string()],
            title: "Board games".to_string(),
            occurred_at: datetime!(2025-10-12 14:30:00 UTC),
            duration_hours: 1.5,
            rating: Some(5),
        };

        assert!(activity.involves("m-1"));
        assert!(activity.involves("m-2"));
        assert!(!activity.involves("m-3"));
    }

    #[test]
    fn test_record_activity_input_defaults() {
        let json = r#"{"title": "Park walk", "initiator_id": "m-1", "duration_hours": 2.0}"#;
        let input: RecordActivityInput =
            serde_json::from_str(json).expect("deserialization should succeed");

        assert!(input.pod_id.is_none());
        assert!(input.participant_ids.is_empty());
        assert!(input.occurred_at.is_none());
        assert!(input.rating.is_none());
    }

    #[test]
    fn test_record_activity_input_parses_timestamp() {
        let json = r#"{
            "title": "Movie night",
            "initiator_id": "m-1",
            "participant_ids": ["m-2", "m-3"],
            "occurred_at": "2025-10-12T14:30:00Z",
            "duration_hours": 2.5,
            "rating": 4
        }"#;
        let input: RecordActivityInput =
            serde_json::from_str(json).expect("deserialization should succeed");

        assert_eq!(input.occurred_at, Some(datetime!(2025-10-12 14:30:00 UTC)));
        assert_eq!(input.participant_ids.len(), 2);
        assert_eq!(input.rating, Some(4));
    }
}
