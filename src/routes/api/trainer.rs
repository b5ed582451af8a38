use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::general::Helpers;
use crate::modules::models::trainer::{NewTrainer, Trainer, TrainerUpdate};
use crate::server::AppState;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

#[get("/trainers")]
pub fn get_all(state: &State<AppState>) -> CustomResult<Json<ApiTrainers>> {
    let trainers = storage_handle_error!(Trainer::get_all(state.storage()), "routes/api/trainer:get_all", "trainers");

    Ok(Json(ApiTrainers { trainers }))
}

#[post("/trainers", data = "<body>")]
pub fn add_one(body: Json<TrainerRequest>, state: &State<AppState>) -> CustomResult<status::Created<Json<Trainer>>> {
    let body = body.into_inner();
    let name = Helpers::required(body.name, "Name is required")?;

    let trainer = Trainer::new(
        state.storage(),
        NewTrainer {
            name,
            active: body.active.unwrap_or(true),
            joined_date: Helpers::today(),
        },
    )?;

    Ok(status::Created::new(format!("/api/trainers/{}", trainer.id)).body(Json(trainer)))
}

#[put("/trainers/<id>", data = "<body>")]
pub fn update_one(id: &str, body: Json<TrainerRequest>, state: &State<AppState>) -> CustomResult<Json<Trainer>> {
    let body = body.into_inner();
    if body.name.is_none() && body.active.is_none() {
        return Err(Error::validation("Name is required"));
    }

    let name = match body.name {
        Some(name) => Some(Helpers::required(Some(name), "Name is required")?),
        None => None,
    };

    let trainer = Trainer::update(
        state.storage(),
        id,
        TrainerUpdate {
            name,
            active: body.active,
        },
    )?;

    Ok(Json(trainer))
}

#[delete("/trainers/<id>")]
pub fn delete_one(id: &str, state: &State<AppState>) -> CustomResult<Json<Value>> {
    Trainer::delete_id(state.storage(), id)?;

    Ok(Json(json!({ "message": "Trainer deleted successfully" })))
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(Deserialize, Debug)]
pub struct TrainerRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiTrainers {
    pub trainers: Vec<Trainer>,
}
