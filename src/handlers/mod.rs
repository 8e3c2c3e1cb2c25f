mod auth;
mod health;
mod households;
mod metrics;

pub use auth::{get_user, login, register};
pub use health::health_check;
pub use households::{create_household, create_member, create_pod, record_activity};
pub use metrics::{get_achievements, get_family_health_metrics, get_milestones};
