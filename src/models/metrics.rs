use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    /// Oldest day first; the last entry is today.
    pub daily_counts: [u32; 7],
    pub percent_change: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodSummary {
    pub pod_id: String,
    pub pod_name: String,
    pub icon: String,
    pub activity_count: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InviterSummary {
    pub member_id: String,
    pub member_name: String,
    pub avatar_emoji: String,
    pub initiated_count: u32,
    pub participated_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionScore {
    pub score: u8,
    pub level: String,
    pub description: String,
    pub encouragement: String,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(with = "time::serde::rfc3339")]
    pub unlocked_at: OffsetDateTime,
    pub tier: Tier,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_value: i64,
    pub current_value: i64,
    pub completed: bool,
    pub reward_description: String,
    pub icon: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct UnlockedAchievement {
    pub achievement_id: String,
    pub unlocked_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MilestoneProgress {
    pub milestone_id: String,
    pub current_value: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyHealthMetrics {
    pub household_id: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_activity_date: Option<OffsetDateTime>,
    pub days_since_last_activity: Option<i64>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_activities_this_week: u32,
    pub total_activities_this_month: u32,
    pub total_activities_all_time: u32,
    pub total_hours_together_this_week: f64,
    pub total_hours_together_this_month: f64,
    pub average_rating: f64,
    pub most_active_pod: Option<PodSummary>,
    pub most_active_inviter: Option<InviterSummary>,
    pub recent_achievements: Vec<AchievementDto>,
    pub milestones: Vec<MilestoneDto>,
    pub weekly_trend: WeeklyTrend,
    pub days_active_this_week: u32,
    pub days_active_this_month: u32,
    pub connection_score: ConnectionScore,
}
