use rocket::serde::json::Json;
use rocket::{get, State};

use crate::errors::CustomResult;
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::standings::{StandingsHelpers, TrainerStats};
use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;
use crate::server::AppState;

/// standings over every race ever run
#[get("/standings")]
pub fn career(state: &State<AppState>) -> CustomResult<Json<Vec<TrainerStats>>> {
    let trainers = storage_handle_error!(Trainer::get_all(state.storage()), "routes/api/standings:career", "trainers");
    let sessions = storage_handle_error!(Session::get_all(state.storage()), "routes/api/standings:career", "sessions");

    Ok(Json(StandingsHelpers::career_standings(&trainers, &sessions)))
}

/// standings over the last stored session only
#[get("/standings/recent")]
pub fn recent(state: &State<AppState>) -> CustomResult<Json<Vec<TrainerStats>>> {
    let trainers = storage_handle_error!(Trainer::get_all(state.storage()), "routes/api/standings:recent", "trainers");
    let sessions = storage_handle_error!(Session::get_all(state.storage()), "routes/api/standings:recent", "sessions");

    Ok(Json(StandingsHelpers::recent_standings(&trainers, &sessions)))
}
