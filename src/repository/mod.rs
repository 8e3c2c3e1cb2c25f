mod activity;
mod household;
mod progress;
mod user;

pub use activity::{ActivityRepository, NewActivity};
pub use household::HouseholdRepository;
pub use progress::ProgressRepository;
pub use user::UserRepository;
