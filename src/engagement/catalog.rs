//! Fixed achievement and milestone catalogs.
//!
//! Achievements unlock once per household and are never revoked. Milestones
//! carry progress that only moves forward and freezes once completed.

use time::OffsetDateTime;

use super::aggregator::EngagementSummary;
use crate::models::{AchievementDto, MilestoneDto, MilestoneProgress, Tier};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    ActivitiesAtLeast(u32),
    LongestStreakAtLeast(u32),
    MonthHoursAtLeast(f64),
    RatedAverageAtLeast { min_rated: u32, average: f64 },
}

impl Criterion {
    pub fn is_met(&self, summary: &EngagementSummary) -> bool {
        match *self {
            Criterion::ActivitiesAtLeast(count) => summary.activities_all_time >= count,
            Criterion::LongestStreakAtLeast(days) => summary.longest_streak >= days,
            Criterion::MonthHoursAtLeast(hours) => summary.hours_this_month >= hours,
            Criterion::RatedAverageAtLeast { min_rated, average } => {
                summary.rated_activities >= min_rated && summary.average_rating >= average
            }
        }
    }
}

#[derive(Debug)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub tier: Tier,
    pub points: u32,
    pub criterion: Criterion,
}

impl AchievementDefinition {
    pub fn to_dto(&self, unlocked_at: OffsetDateTime) -> AchievementDto {
        AchievementDto {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked_at,
            tier: self.tier,
            points: self.points,
        }
    }
}

pub static ACHIEVEMENTS: [AchievementDefinition; 7] = [
    AchievementDefinition {
        id: "first-steps",
        title: "First Steps",
        description: "Completed your first family activity",
        icon: "🎉",
        tier: Tier::Bronze,
        points: 10,
        criterion: Criterion::ActivitiesAtLeast(1),
    },
    AchievementDefinition {
        id: "getting-going",
        title: "Getting Going",
        description: "Completed 10 family activities",
        icon: "🚀",
        tier: Tier::Bronze,
        points: 15,
        criterion: Criterion::ActivitiesAtLeast(10),
    },
    AchievementDefinition {
        id: "week-warrior",
        title: "Week Warrior",
        description: "Active 7 days in a row",
        icon: "🔥",
        tier: Tier::Silver,
        points: 25,
        criterion: Criterion::LongestStreakAtLeast(7),
    },
    AchievementDefinition {
        id: "five-star-family",
        title: "Five-Star Family",
        description: "Rated 10 activities with an average of 4.5 or more",
        icon: "⭐",
        tier: Tier::Silver,
        points: 30,
        criterion: Criterion::RatedAverageAtLeast {
            min_rated: 10,
            average: 4.5,
        },
    },
    AchievementDefinition {
        id: "quality-champions",
        title: "Quality Champions",
        description: "Achieved 20 hours together this month",
        icon: "⏰",
        tier: Tier::Gold,
        points: 75,
        criterion: Criterion::MonthHoursAtLeast(20.0),
    },
    AchievementDefinition {
        id: "fortnight-force",
        title: "Fortnight Force",
        description: "Active 14 days in a row",
        icon: "💪",
        tier: Tier::Gold,
        points: 60,
        criterion: Criterion::LongestStreakAtLeast(14),
    },
    AchievementDefinition {
        id: "half-century",
        title: "Half Century",
        description: "Completed 50 family activities",
        icon: "🏆",
        tier: Tier::Gold,
        points: 100,
        criterion: Criterion::ActivitiesAtLeast(50),
    },
];

pub fn achievement(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Catalog entries whose criterion currently holds.
pub fn earned_achievements(
    summary: &EngagementSummary,
) -> impl Iterator<Item = &'static AchievementDefinition> + '_ {
    ACHIEVEMENTS
        .iter()
        .filter(move |a| a.criterion.is_met(summary))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneMetric {
    TotalActivities,
    TotalWholeHours,
    LongestStreak,
}

impl MilestoneMetric {
    pub fn observe(self, summary: &EngagementSummary) -> i64 {
        match self {
            MilestoneMetric::TotalActivities => i64::from(summary.activities_all_time),
            MilestoneMetric::TotalWholeHours => summary.hours_all_time.floor() as i64,
            MilestoneMetric::LongestStreak => i64::from(summary.longest_streak),
        }
    }
}

#[derive(Debug)]
pub struct MilestoneDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target_value: i64,
    pub reward_description: &'static str,
    pub icon: &'static str,
    pub metric: MilestoneMetric,
}

impl MilestoneDefinition {
    pub fn untouched(&self) -> MilestoneProgress {
        MilestoneProgress {
            milestone_id: self.id.to_string(),
            current_value: 0,
            completed: false,
        }
    }

    /// Moves stored progress towards `observed`. Completed milestones are
    /// frozen and progress never decreases or passes the target.
    pub fn advance(&self, stored: &MilestoneProgress, observed: i64) -> MilestoneProgress {
        if stored.completed {
            return stored.clone();
        }
        let current_value = stored.current_value.max(observed).clamp(0, self.target_value);
        MilestoneProgress {
            milestone_id: self.id.to_string(),
            current_value,
            completed: current_value >= self.target_value,
        }
    }

    pub fn to_dto(&self, progress: &MilestoneProgress) -> MilestoneDto {
        MilestoneDto {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            target_value: self.target_value,
            current_value: progress.current_value,
            completed: progress.completed,
            reward_description: self.reward_description.to_string(),
            icon: self.icon.to_string(),
        }
    }
}

pub static MILESTONES: [MilestoneDefinition; 4] = [
    MilestoneDefinition {
        id: "first-25",
        title: "First 25",
        description: "Complete 25 family activities",
        target_value: 25,
        reward_description: "Unlock 'Memory Lane' feature",
        icon: "🎯",
        metric: MilestoneMetric::TotalActivities,
    },
    MilestoneDefinition {
        id: "50-hours-together",
        title: "50 Hours Together",
        description: "Spend 50 hours in activities",
        target_value: 50,
        reward_description: "Unlock 'Time Capsule' photo album",
        icon: "⏳",
        metric: MilestoneMetric::TotalWholeHours,
    },
    MilestoneDefinition {
        id: "century-club",
        title: "Century Club",
        description: "Complete 100 family activities",
        target_value: 100,
        reward_description: "Unlock the 'Family Yearbook' export",
        icon: "💯",
        metric: MilestoneMetric::TotalActivities,
    },
    MilestoneDefinition {
        id: "month-of-moments",
        title: "Month of Moments",
        description: "Be active together 30 days in a row",
        target_value: 30,
        reward_description: "Unlock custom pod themes",
        icon: "📅",
        metric: MilestoneMetric::LongestStreak,
    },
];
