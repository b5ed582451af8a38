use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{catch, catchers, routes, Build, Request, Rocket};
use serde_json::{json, Value};

use crate::errors::CustomResult;
use crate::modules::auth::{CredentialVerifier, StaticCredentials};
use crate::modules::config::Config;
use crate::modules::storage::file::FileStorage;
use crate::modules::storage::{open_storage, Storage};
use crate::routes::api;

pub struct AppState {
    storage: Box<dyn Storage>,
    verifier: Box<dyn CredentialVerifier>,
    /// the json files copied by a migration
    migration_source: FileStorage,
}

impl AppState {
    pub fn new(storage: Box<dyn Storage>, verifier: Box<dyn CredentialVerifier>, migration_source: FileStorage) -> AppState {
        AppState {
            storage,
            verifier,
            migration_source,
        }
    }

    pub fn from_config(config: &Config) -> CustomResult<AppState> {
        Ok(AppState::new(
            open_storage(config)?,
            Box::new(StaticCredentials::from_config(config)),
            FileStorage::new(&config.data_dir),
        ))
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.verifier.as_ref()
    }

    pub fn migration_source(&self) -> &FileStorage {
        &self.migration_source
    }
}

#[catch(default)]
fn default_catcher(code: Status, _request: &Request) -> status::Custom<Json<Value>> {
    let message = code.reason().unwrap_or("Request failed");
    status::Custom(code, Json(json!({ "error": message })))
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/api",
            routes![
                // trainers
                api::trainer::get_all,
                api::trainer::add_one,
                api::trainer::update_one,
                api::trainer::delete_one,
                // sessions
                api::session::get_all,
                api::session::get_current,
                api::session::get_matrix,
                api::session::add_one,
                api::session::update_one,
                api::session::delete_one,
                // races
                api::race::get_all,
                api::race::add_one,
                api::race::update_one,
                api::race::delete_one,
                // standings
                api::standings::career,
                api::standings::recent,
                // storage
                api::migrate::status,
                api::migrate::run,
                // auth
                api::auth::login,
            ],
        )
        .register("/", catchers![default_catcher])
}
