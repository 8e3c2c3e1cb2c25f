use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::models::{Household, Member, Pod};

#[derive(Clone)]
pub struct HouseholdRepository {
    pool: PgPool,
}

impl HouseholdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the household and grants its creator access in one transaction.
    #[instrument(name = "db.household.create", skip(self))]
    pub async fn create(
        &self,
        household_id: &str,
        name: &str,
        created_by: i32,
    ) -> Result<Household, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let household = sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO households (household_id, name, created_by)
            VALUES ($1, $2, $3)
            RETURNING household_id, name, created_at
            "#,
        )
        .bind(household_id)
        .bind(name)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO household_access (household_id, user_id) VALUES ($1, $2)")
            .bind(household_id)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(household)
    }

    #[instrument(name = "db.household.find_by_id", skip(self))]
    pub async fn find_by_id(&self, household_id: &str) -> Result<Option<Household>, sqlx::Error> {
        sqlx::query_as::<_, Household>(
            r#"
            SELECT household_id, name, created_at
            FROM households
            WHERE household_id = $1
            "#,
        )
        .bind(household_id)
        .fetch_optional(&self.pool)
        .await
    }

    #[instrument(name = "db.household.has_access", skip(self))]
    pub async fn has_access(&self, household_id: &str, user_id: i32) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM household_access WHERE household_id = $1 AND user_id = $2
            ) as exists
            "#,
        )
        .bind(household_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<bool, _>("exists"))
    }

    #[instrument(name = "db.pod.create", skip(self))]
    pub async fn create_pod(
        &self,
        pod_id: &str,
        household_id: &str,
        pod_name: &str,
        icon: &str,
    ) -> Result<Pod, sqlx::Error> {
        sqlx::query_as::<_, Pod>(
            r#"
            INSERT INTO pods (pod_id, household_id, pod_name, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING pod_id, household_id, pod_name, icon
            "#,
        )
        .bind(pod_id)
        .bind(household_id)
        .bind(pod_name)
        .bind(icon)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.pod.list", skip(self))]
    pub async fn list_pods(&self, household_id: &str) -> Result<Vec<Pod>, sqlx::Error> {
        sqlx::query_as::<_, Pod>(
            r#"
            SELECT pod_id, household_id, pod_name, icon
            FROM pods
            WHERE household_id = $1
            ORDER BY created_at, pod_id
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.member.create", skip(self))]
    pub async fn create_member(
        &self,
        member_id: &str,
        household_id: &str,
        member_name: &str,
        avatar_emoji: &str,
    ) -> Result<Member, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (member_id, household_id, member_name, avatar_emoji)
            VALUES ($1, $2, $3, $4)
            RETURNING member_id, household_id, member_name, avatar_emoji
            "#,
        )
        .bind(member_id)
        .bind(household_id)
        .bind(member_name)
        .bind(avatar_emoji)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.member.list", skip(self))]
    pub async fn list_members(&self, household_id: &str) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id, household_id, member_name, avatar_emoji
            FROM members
            WHERE household_id = $1
            ORDER BY created_at, member_id
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
    }
}
