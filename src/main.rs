use rocket::{launch, Build, Rocket};

use trainer_league::modules::config::Config;
use trainer_league::modules::helpers::logging::setup_logging;
use trainer_league::server::{build_rocket, AppState};

#[launch]
fn rocket() -> Rocket<Build> {
    let config = Config::from_env().expect("Failed to load configuration");
    setup_logging(&config).expect("Failed to setup logging");

    let state = AppState::from_config(&config).expect("Failed to open storage");

    build_rocket(state)
}
