pub mod config;
pub mod database;
pub mod engagement;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;

pub use config::Config;

use repository::{ActivityRepository, HouseholdRepository, ProgressRepository, UserRepository};
use services::{AuthService, HouseholdService, MetricsService};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub household_service: HouseholdService,
    pub metrics_service: MetricsService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(pool.clone());
        let household_repo = HouseholdRepository::new(pool.clone());
        let activity_repo = ActivityRepository::new(pool.clone());
        let progress_repo = ProgressRepository::new(pool.clone());

        let auth_service = AuthService::new(user_repo, config);
        let household_service = HouseholdService::new(household_repo.clone(), activity_repo.clone());
        let metrics_service = MetricsService::new(
            household_service.clone(),
            household_repo,
            activity_repo,
            progress_repo,
            config.recent_achievements_limit,
        );

        Self {
            pool,
            auth_service,
            household_service,
            metrics_service,
        }
    }
}
