mod activity;
mod household;
mod metrics;
mod user;

pub use activity::{Activity, RecordActivityInput};
pub use household::{
    CreateHouseholdInput, CreateMemberInput, CreatePodInput, Household, HouseholdQuery, Member,
    Pod,
};
pub use metrics::{
    AchievementDto, ConnectionScore, FamilyHealthMetrics, InviterSummary, MilestoneDto,
    MilestoneProgress, PodSummary, Tier, TrendDirection, UnlockedAchievement, WeeklyTrend,
};
pub use user::{LoginInput, ProfileResponse, RegisterInput, User, UserResponse, UserWithToken};
