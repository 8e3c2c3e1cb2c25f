mod auth;
mod household;
mod metrics;

pub use auth::AuthService;
pub use household::HouseholdService;
pub use metrics::MetricsService;
