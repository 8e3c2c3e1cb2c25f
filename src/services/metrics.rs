use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    engagement::{
        self, EngagementSummary, HouseholdLog,
        catalog::{self, AchievementDefinition, MilestoneDefinition},
    },
    error::AppResult,
    models::{
        AchievementDto, FamilyHealthMetrics, Household, MilestoneDto, MilestoneProgress,
        UnlockedAchievement,
    },
    repository::{ActivityRepository, HouseholdRepository, ProgressRepository},
    services::HouseholdService,
    telemetry::{ACHIEVEMENTS_UNLOCKED, MILESTONES_COMPLETED, SNAPSHOTS_COMPUTED},
};

#[derive(Clone)]
pub struct MetricsService {
    households: HouseholdService,
    household_repo: HouseholdRepository,
    activity_repo: ActivityRepository,
    progress_repo: ProgressRepository,
    recent_achievements_limit: usize,
}

/// Aggregated state of a household after unlocks and milestone progress
/// have been brought up to date.
struct Synced {
    summary: EngagementSummary,
    achievements: Vec<AchievementDto>,
    milestones: Vec<MilestoneDto>,
}

impl MetricsService {
    pub fn new(
        households: HouseholdService,
        household_repo: HouseholdRepository,
        activity_repo: ActivityRepository,
        progress_repo: ProgressRepository,
        recent_achievements_limit: usize,
    ) -> Self {
        Self {
            households,
            household_repo,
            activity_repo,
            progress_repo,
            recent_achievements_limit,
        }
    }

    #[instrument(name = "metrics.family_health", skip(self))]
    pub async fn family_health_metrics(
        &self,
        user_id: i32,
        household_id: &str,
    ) -> AppResult<FamilyHealthMetrics> {
        let household = self.households.authorize(user_id, household_id).await?;
        let now = OffsetDateTime::now_utc();
        let synced = self.sync(&household, now).await?;

        let recent = synced
            .achievements
            .into_iter()
            .take(self.recent_achievements_limit)
            .collect();

        SNAPSHOTS_COMPUTED.add(1, &[]);

        Ok(engagement::family_health_metrics(
            &household.household_id,
            synced.summary,
            recent,
            synced.milestones,
        ))
    }

    #[instrument(name = "metrics.achievements", skip(self))]
    pub async fn achievements(
        &self,
        user_id: i32,
        household_id: &str,
    ) -> AppResult<Vec<AchievementDto>> {
        let household = self.households.authorize(user_id, household_id).await?;
        let synced = self.sync(&household, OffsetDateTime::now_utc()).await?;
        Ok(synced.achievements)
    }

    #[instrument(name = "metrics.milestones", skip(self))]
    pub async fn milestones(&self, user_id: i32, household_id: &str) -> AppResult<Vec<MilestoneDto>> {
        let household = self.households.authorize(user_id, household_id).await?;
        let synced = self.sync(&household, OffsetDateTime::now_utc()).await?;
        Ok(synced.milestones)
    }

    #[instrument(name = "metrics.sync", skip(self, household), fields(household_id = %household.household_id))]
    async fn sync(&self, household: &Household, now: OffsetDateTime) -> AppResult<Synced> {
        let household_id = household.household_id.as_str();

        let pods = self.household_repo.list_pods(household_id).await?;
        let members = self.household_repo.list_members(household_id).await?;
        let activities = self.activity_repo.list_for_household(household_id).await?;

        let summary = engagement::summarize(
            HouseholdLog {
                pods: &pods,
                members: &members,
                activities: &activities,
            },
            now,
        );

        let achievements = self.sync_achievements(household_id, &summary, now).await?;
        let milestones = self.sync_milestones(household_id, &summary).await?;

        tracing::debug!(
            activities = activities.len(),
            achievements = achievements.len(),
            "Household engagement synced"
        );

        Ok(Synced {
            summary,
            achievements,
            milestones,
        })
    }

    /// Unlocks newly earned achievements and returns the full history,
    /// newest first.
    async fn sync_achievements(
        &self,
        household_id: &str,
        summary: &EngagementSummary,
        now: OffsetDateTime,
    ) -> AppResult<Vec<AchievementDto>> {
        let unlocked = self.progress_repo.list_unlocked(household_id).await?;

        let mut newly_unlocked = false;
        for definition in pending_unlocks(summary, &unlocked) {
            if self
                .progress_repo
                .unlock(household_id, definition.id, now)
                .await?
            {
                newly_unlocked = true;
                ACHIEVEMENTS_UNLOCKED.add(1, &[]);
                tracing::info!(household_id, achievement_id = definition.id, "Achievement unlocked");
            }
        }

        let unlocked = if newly_unlocked {
            self.progress_repo.list_unlocked(household_id).await?
        } else {
            unlocked
        };

        Ok(achievement_history(&unlocked))
    }

    async fn sync_milestones(
        &self,
        household_id: &str,
        summary: &EngagementSummary,
    ) -> AppResult<Vec<MilestoneDto>> {
        let stored = self.progress_repo.list_milestones(household_id).await?;

        let mut milestones = Vec::with_capacity(catalog::MILESTONES.len());
        for step in plan_milestones(summary, stored) {
            let current = if step.needs_save() {
                let persisted = self
                    .progress_repo
                    .save_milestone(household_id, &step.next)
                    .await?;
                if persisted.completed && !step.previous.completed {
                    MILESTONES_COMPLETED.add(1, &[]);
                    tracing::info!(
                        household_id,
                        milestone_id = step.definition.id,
                        "Milestone completed"
                    );
                }
                persisted
            } else {
                step.previous
            };

            milestones.push(step.definition.to_dto(&current));
        }

        Ok(milestones)
    }
}

/// Earned achievements that have no stored unlock yet. Already unlocked ones
/// are skipped so their original timestamp is kept.
fn pending_unlocks(
    summary: &EngagementSummary,
    unlocked: &[UnlockedAchievement],
) -> Vec<&'static AchievementDefinition> {
    catalog::earned_achievements(summary)
        .filter(|definition| !unlocked.iter().any(|u| u.achievement_id == definition.id))
        .collect()
}

struct MilestoneStep {
    definition: &'static MilestoneDefinition,
    previous: MilestoneProgress,
    next: MilestoneProgress,
}

impl MilestoneStep {
    fn needs_save(&self) -> bool {
        self.next != self.previous
    }
}

/// One step per catalog milestone, in catalog order. Milestones never stored
/// start from zero progress.
fn plan_milestones(summary: &EngagementSummary, stored: Vec<MilestoneProgress>) -> Vec<MilestoneStep> {
    let mut stored: HashMap<String, MilestoneProgress> = stored
        .into_iter()
        .map(|p| (p.milestone_id.clone(), p))
        .collect();

    catalog::MILESTONES
        .iter()
        .map(|definition| {
            let previous = stored
                .remove(definition.id)
                .unwrap_or_else(|| definition.untouched());
            let next = definition.advance(&previous, definition.metric.observe(summary));
            MilestoneStep {
                definition,
                previous,
                next,
            }
        })
        .collect()
}

fn achievement_history(unlocked: &[UnlockedAchievement]) -> Vec<AchievementDto> {
    let mut history: Vec<AchievementDto> = unlocked
        .iter()
        .filter_map(|u| match catalog::achievement(&u.achievement_id) {
            Some(definition) => Some(definition.to_dto(u.unlocked_at)),
            None => {
                tracing::warn!(achievement_id = %u.achievement_id, "Unknown achievement in history");
                None
            }
        })
        .collect();

    history.sort_by(|a, b| b.unlocked_at.cmp(&a.unlocked_at).then(a.id.cmp(&b.id)));
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn unlocked(id: &str, at: OffsetDateTime) -> UnlockedAchievement {
        UnlockedAchievement {
            achievement_id: id.to_string(),
            unlocked_at: at,
        }
    }

    #[test]
    fn test_history_is_newest_first() {
        let history = achievement_history(&[
            unlocked("first-steps", datetime!(2025-10-10 10:00:00 UTC)),
            unlocked("quality-champions", datetime!(2025-10-12 09:15:00 UTC)),
            unlocked("week-warrior", datetime!(2025-10-11 15:30:00 UTC)),
        ]);

        let ids: Vec<&str> = history.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["quality-champions", "week-warrior", "first-steps"]);
    }

    #[test]
    fn test_history_keeps_original_unlock_time() {
        let at = datetime!(2025-10-10 10:00:00 UTC);
        let history = achievement_history(&[unlocked("first-steps", at)]);

        assert_eq!(history[0].unlocked_at, at);
        assert_eq!(history[0].title, "First Steps");
        assert_eq!(history[0].points, 10);
    }

    fn summary_with(activities: u32, longest_streak: u32) -> EngagementSummary {
        let mut summary = engagement::summarize(
            HouseholdLog {
                pods: &[],
                members: &[],
                activities: &[],
            },
            datetime!(2025-10-12 12:00:00 UTC),
        );
        summary.activities_all_time = activities;
        summary.longest_streak = longest_streak;
        summary
    }

    fn progress(id: &str, current_value: i64, completed: bool) -> MilestoneProgress {
        MilestoneProgress {
            milestone_id: id.to_string(),
            current_value,
            completed,
        }
    }

    #[test]
    fn test_already_unlocked_achievements_are_not_restamped() {
        let summary = summary_with(12, 8);
        let first_unlock = datetime!(2025-10-01 08:00:00 UTC);
        let unlocked = vec![unlocked("first-steps", first_unlock)];

        let pending: Vec<&str> = pending_unlocks(&summary, &unlocked)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(pending, vec!["getting-going", "week-warrior"]);

        let history = achievement_history(&unlocked);
        assert_eq!(history[0].unlocked_at, first_unlock);
    }

    #[test]
    fn test_nothing_pending_once_everything_is_unlocked() {
        let summary = summary_with(12, 8);
        let at = datetime!(2025-10-01 08:00:00 UTC);
        let unlocked: Vec<_> = ["first-steps", "getting-going", "week-warrior"]
            .into_iter()
            .map(|id| unlocked(id, at))
            .collect();

        assert!(pending_unlocks(&summary, &unlocked).is_empty());
    }

    #[test]
    fn test_milestone_plan_covers_catalog_in_order() {
        let steps = plan_milestones(&summary_with(0, 0), vec![]);

        let ids: Vec<&str> = steps.iter().map(|s| s.definition.id).collect();
        assert_eq!(
            ids,
            vec!["first-25", "50-hours-together", "century-club", "month-of-moments"]
        );
        assert!(steps.iter().all(|s| !s.needs_save()));
    }

    #[test]
    fn test_completed_milestone_is_not_saved_again() {
        let stored = vec![progress("first-25", 25, true)];
        let steps = plan_milestones(&summary_with(3, 1), stored);

        let first_25 = &steps[0];
        assert!(!first_25.needs_save());
        assert_eq!(first_25.next, progress("first-25", 25, true));
    }

    #[test]
    fn test_stored_progress_does_not_regress() {
        let stored = vec![progress("century-club", 40, false)];
        let steps = plan_milestones(&summary_with(30, 1), stored);

        let century = steps
            .iter()
            .find(|s| s.definition.id == "century-club")
            .expect("catalog milestone");
        assert!(!century.needs_save());
        assert_eq!(century.next.current_value, 40);

        let first_25 = &steps[0];
        assert!(first_25.needs_save());
        assert_eq!(first_25.next, progress("first-25", 25, true));
    }

    #[test]
    fn test_history_skips_unknown_ids() {
        let history = achievement_history(&[
            unlocked("retired-badge", datetime!(2025-10-10 10:00:00 UTC)),
            unlocked("first-steps", datetime!(2025-10-10 10:00:00 UTC)),
        ]);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "first-steps");
    }
}
