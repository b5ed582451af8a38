use log::info;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::Serialize;

use crate::errors::CustomResult;
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::config::Backend;
use crate::modules::migration::{migrate, MigrationOutcome};
use crate::server::AppState;

#[get("/migrate")]
pub fn status(state: &State<AppState>) -> CustomResult<Json<ApiStorageStatus>> {
    let storage = state.storage();
    let trainers = storage_handle_error!(storage.load_trainers(), "routes/api/migrate:status", "trainers");
    let sessions = storage_handle_error!(storage.load_sessions(), "routes/api/migrate:status", "sessions");

    Ok(Json(ApiStorageStatus {
        trainers: trainers.len(),
        sessions: sessions.len(),
        has_data: !trainers.is_empty() || !sessions.is_empty(),
        storage: storage.backend().to_string(),
    }))
}

/// # copy the json files into the key-value store
/// only runs against redis storage and never overwrites existing data
#[post("/migrate")]
pub fn run(state: &State<AppState>) -> CustomResult<Json<ApiMigration>> {
    let destination = state.storage();

    if destination.backend() == Backend::File {
        info!(target:"routes/api/migrate:run", "migration requested while using file storage");
        return Ok(Json(ApiMigration {
            message: "Migration can only be performed into redis storage. File storage is already in use.".to_string(),
            storage: destination.backend().to_string(),
            outcome: None,
        }));
    }

    let outcome = migrate(state.migration_source(), destination)?;
    let message = match outcome {
        MigrationOutcome::Skipped { .. } => "Data already exists in redis storage. Migration skipped.",
        MigrationOutcome::Completed { .. } => "Migration completed successfully",
    };

    Ok(Json(ApiMigration {
        message: message.to_string(),
        storage: destination.backend().to_string(),
        outcome: Some(outcome),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStorageStatus {
    pub trainers: usize,
    pub sessions: usize,
    pub has_data: bool,
    pub storage: String,
}

#[derive(Serialize)]
pub struct ApiMigration {
    pub message: String,
    pub storage: String,
    #[serde(flatten)]
    pub outcome: Option<MigrationOutcome>,
}
