use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::instrument;

use crate::models::{MilestoneProgress, UnlockedAchievement};

/// Per-household achievement unlocks and milestone progress.
///
/// Writes are monotonic at the SQL level: unlocks are insert-only and
/// milestone values only grow until completion.
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "db.achievement.list_unlocked", skip(self))]
    pub async fn list_unlocked(
        &self,
        household_id: &str,
    ) -> Result<Vec<UnlockedAchievement>, sqlx::Error> {
        sqlx::query_as::<_, UnlockedAchievement>(
            r#"
            SELECT achievement_id, unlocked_at
            FROM household_achievements
            WHERE household_id = $1
            ORDER BY unlocked_at DESC, achievement_id
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Returns `false` when the achievement was already unlocked.
    #[instrument(name = "db.achievement.unlock", skip(self))]
    pub async fn unlock(
        &self,
        household_id: &str,
        achievement_id: &str,
        unlocked_at: OffsetDateTime,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO household_achievements (household_id, achievement_id, unlocked_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (household_id, achievement_id) DO NOTHING
            "#,
        )
        .bind(household_id)
        .bind(achievement_id)
        .bind(unlocked_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(name = "db.milestone.list_progress", skip(self))]
    pub async fn list_milestones(
        &self,
        household_id: &str,
    ) -> Result<Vec<MilestoneProgress>, sqlx::Error> {
        sqlx::query_as::<_, MilestoneProgress>(
            r#"
            SELECT milestone_id, current_value, completed
            FROM milestone_progress
            WHERE household_id = $1
            "#,
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Upserts progress and returns what is stored afterwards. A completed
    /// row is left untouched and a lower value never overwrites a higher one,
    /// so the result may differ from `progress`.
    #[instrument(name = "db.milestone.save_progress", skip(self, progress), fields(milestone_id = %progress.milestone_id))]
    pub async fn save_milestone(
        &self,
        household_id: &str,
        progress: &MilestoneProgress,
    ) -> Result<MilestoneProgress, sqlx::Error> {
        let updated = sqlx::query_as::<_, MilestoneProgress>(
            r#"
            INSERT INTO milestone_progress (household_id, milestone_id, current_value, completed, completed_at)
            VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN NOW() END)
            ON CONFLICT (household_id, milestone_id) DO UPDATE
            SET current_value = GREATEST(milestone_progress.current_value, EXCLUDED.current_value),
                completed = milestone_progress.completed OR EXCLUDED.completed,
                completed_at = COALESCE(milestone_progress.completed_at, EXCLUDED.completed_at),
                updated_at = NOW()
            WHERE NOT milestone_progress.completed
            RETURNING milestone_id, current_value, completed
            "#,
        )
        .bind(household_id)
        .bind(&progress.milestone_id)
        .bind(progress.current_value)
        .bind(progress.completed)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(stored) => Ok(stored),
            None => {
                sqlx::query_as::<_, MilestoneProgress>(
                    r#"
                    SELECT milestone_id, current_value, completed
                    FROM milestone_progress
                    WHERE household_id = $1 AND milestone_id = $2
                    "#,
                )
                .bind(household_id)
                .bind(&progress.milestone_id)
                .fetch_one(&self.pool)
                .await
            }
        }
    }
}
