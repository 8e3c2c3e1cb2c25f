//! Household engagement aggregation.
//!
//! Everything here is pure: callers pass the household's activity log and
//! the current time, and get back derived figures. Persistence of achievement
//! unlocks and milestone progress lives in the metrics service.

mod aggregator;
pub mod catalog;
mod score;
mod streak;

pub use aggregator::{EngagementSummary, HouseholdLog, summarize};
pub use score::connection_score;

use crate::models::{AchievementDto, FamilyHealthMetrics, MilestoneDto};
use aggregator::round1;

pub fn family_health_metrics(
    household_id: &str,
    summary: EngagementSummary,
    recent_achievements: Vec<AchievementDto>,
    milestones: Vec<MilestoneDto>,
) -> FamilyHealthMetrics {
    let connection_score = connection_score(&summary);

    FamilyHealthMetrics {
        household_id: household_id.to_string(),
        last_activity_date: summary.last_activity_at,
        days_since_last_activity: summary.days_since_last_activity,
        current_streak: summary.current_streak,
        longest_streak: summary.longest_streak,
        total_activities_this_week: summary.activities_this_week,
        total_activities_this_month: summary.activities_this_month,
        total_activities_all_time: summary.activities_all_time,
        total_hours_together_this_week: round1(summary.hours_this_week),
        total_hours_together_this_month: round1(summary.hours_this_month),
        average_rating: round1(summary.average_rating),
        most_active_pod: summary.most_active_pod,
        most_active_inviter: summary.most_active_inviter,
        recent_achievements,
        milestones,
        weekly_trend: summary.weekly_trend,
        days_active_this_week: summary.days_active_this_week,
        days_active_this_month: summary.days_active_this_month,
        connection_score,
    }
}
