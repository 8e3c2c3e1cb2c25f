use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::instrument;

use crate::models::Activity;

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

pub struct NewActivity<'a> {
    pub activity_id: &'a str,
    pub household_id: &'a str,
    pub pod_id: Option<&'a str>,
    pub initiator_id: &'a str,
    pub participant_ids: &'a [String],
    pub title: &'a str,
    pub occurred_at: OffsetDateTime,
    pub duration_hours: f64,
    pub rating: Option<i16>,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(
        name = "db.activity.create",
        skip(self, activity),
        fields(activity_id = %activity.activity_id, household_id = %activity.household_id)
    )]
    pub async fn create(&self, activity: NewActivity<'_>) -> Result<Activity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO activities
                (activity_id, household_id, pod_id, initiator_id, title, occurred_at, duration_hours, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(activity.activity_id)
        .bind(activity.household_id)
        .bind(activity.pod_id)
        .bind(activity.initiator_id)
        .bind(activity.title)
        .bind(activity.occurred_at)
        .bind(activity.duration_hours)
        .bind(activity.rating)
        .execute(&mut *tx)
        .await?;

        if !activity.participant_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO activity_participants (activity_id, member_id)
                SELECT $1, member_id FROM UNNEST($2::text[]) AS member_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(activity.activity_id)
            .bind(activity.participant_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Activity {
            activity_id: activity.activity_id.to_string(),
            household_id: activity.household_id.to_string(),
            pod_id: activity.pod_id.map(str::to_string),
            initiator_id: activity.initiator_id.to_string(),
            participant_ids: activity.participant_ids.to_vec(),
            title: activity.title.to_string(),
            occurred_at: activity.occurred_at,
            duration_hours: activity.duration_hours,
            rating: activity.rating,
        })
    }

    #[instrument(name = "db.activity.list_for_household", skip(self))]
    pub async fn list_for_household(&self, household_id: &str) -> Result<Vec<Activity>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            r#"
            SELECT
                a.activity_id, a.household_id, a.pod_id, a.initiator_id, a.title,
                a.occurred_at, a.duration_hours, a.rating,
                COALESCE(
                    ARRAY_AGG(p.member_id ORDER BY p.member_id)
                        FILTER (WHERE p.member_id IS NOT NULL),
                    ARRAY[]::text[]
                ) AS participant_ids
            FROM activities a
            LEFT JOIN activity_participants p ON p.activity_id = a.activity_id
            WHERE a.household_id = $1
            GROUP BY a.activity_id
            ORDER BY a.occurred_at
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
    }
}
