use chrono::NaiveDate;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::general::Helpers;
use crate::modules::models::race::{NewRace, Race, RaceData, RaceResult, RaceUpdate};
use crate::modules::models::session::Session;
use crate::routes::api::session::ApiSessions;
use crate::server::AppState;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// races are stored inside their sessions, so this lists the sessions
#[get("/races")]
pub fn get_all(state: &State<AppState>) -> CustomResult<Json<ApiSessions>> {
    let sessions = storage_handle_error!(Session::get_all(state.storage()), "routes/api/race:get_all", "sessions");

    Ok(Json(ApiSessions { sessions }))
}

#[post("/races", data = "<body>")]
pub fn add_one(body: Json<RaceRequest>, state: &State<AppState>) -> CustomResult<status::Created<Json<Race>>> {
    let body = body.into_inner();
    let (session_id, race_number, results) = body.required_fields()?;

    let race = Race::new(
        state.storage(),
        &session_id,
        NewRace {
            race_number,
            date: body.date.unwrap_or_else(Helpers::today),
            results,
            race_data: body.race_data,
        },
    )?;

    Ok(status::Created::new(format!("/api/races/{}", race.id)).body(Json(race)))
}

#[put("/races/<id>", data = "<body>")]
pub fn update_one(id: &str, body: Json<RaceRequest>, state: &State<AppState>) -> CustomResult<Json<Race>> {
    let body = body.into_inner();
    let (session_id, race_number, results) = body.required_fields()?;

    let race = Race::update(
        state.storage(),
        &session_id,
        id,
        RaceUpdate {
            race_number: Some(race_number),
            date: body.date,
            results: Some(results),
            race_data: body.race_data,
        },
    )?;

    Ok(Json(race))
}

#[delete("/races/<id>")]
pub fn delete_one(id: &str, state: &State<AppState>) -> CustomResult<Json<Value>> {
    let session = storage_handle_error!(Race::find_session(state.storage(), id), "routes/api/race:delete_one", "race");
    Race::delete_id(state.storage(), &session.id, id)?;

    Ok(Json(json!({ "message": "Race deleted successfully" })))
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// a submitted result. any points sent along are ignored
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResultRequest {
    pub trainer_id: Option<String>,
    pub position: Option<i32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RaceRequest {
    pub session_id: Option<String>,
    pub race_number: Option<u32>,
    pub results: Option<Vec<ResultRequest>>,
    pub race_data: Option<RaceData>,
    pub date: Option<NaiveDate>,
}

impl RaceRequest {
    /// # check the request and score its results
    /// a result without a position takes its place in the submitted list
    fn required_fields(&self) -> CustomResult<(String, u32, Vec<RaceResult>)> {
        const MESSAGE: &str = "sessionId, raceNumber, and results array are required";

        let session_id = Helpers::required(self.session_id.clone(), MESSAGE)?;
        let race_number = Helpers::required(self.race_number, MESSAGE)?;
        let submitted = self
            .results
            .as_ref()
            .ok_or_else(|| Error::validation(MESSAGE))?;

        let mut results = Vec::with_capacity(submitted.len());
        for (index, result) in submitted.iter().enumerate() {
            let trainer_id = Helpers::required(result.trainer_id.clone(), "Every result needs a trainerId")?;
            let position = match result.position {
                Some(position) if position != 0 => position,
                _ => index as i32 + 1,
            };
            results.push(RaceResult::scored(&trainer_id, position));
        }
        Race::check_results(&results)?;

        Ok((session_id, race_number, results))
    }
}
