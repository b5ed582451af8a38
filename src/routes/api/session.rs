use std::collections::BTreeMap;

use chrono::NaiveDate;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::general::Helpers;
use crate::modules::helpers::matrix::{MatrixHelpers, MatrixRow};
use crate::modules::models::session::{NewSession, Session, SessionUpdate};
use crate::modules::models::trainer::Trainer;
use crate::server::AppState;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

#[get("/sessions")]
pub fn get_all(state: &State<AppState>) -> CustomResult<Json<ApiSessions>> {
    let sessions = storage_handle_error!(Session::get_all(state.storage()), "routes/api/session:get_all", "sessions");

    Ok(Json(ApiSessions { sessions }))
}

/// # the session being raced now
/// the open session with the latest start date, else the last stored one
#[get("/sessions/current")]
pub fn get_current(state: &State<AppState>) -> CustomResult<Json<Session>> {
    let sessions = storage_handle_error!(Session::get_all(state.storage()), "routes/api/session:get_current", "sessions");

    match Session::current(&sessions, Helpers::today()) {
        Some(session) => Ok(Json(session.clone())),
        None => Err(Error::not_found("Session", "current")),
    }
}

#[get("/sessions/<id>/matrix")]
pub fn get_matrix(id: &str, state: &State<AppState>) -> CustomResult<Json<ApiRaceMatrix>> {
    let session = storage_handle_error!(Session::get_by_id(state.storage(), id), "routes/api/session:get_matrix", "session");
    let trainers = storage_handle_error!(Trainer::get_all(state.storage()), "routes/api/session:get_matrix", "trainers");

    Ok(Json(ApiRaceMatrix::new(&session, &trainers)))
}

#[post("/sessions", data = "<body>")]
pub fn add_one(body: Json<SessionRequest>, state: &State<AppState>) -> CustomResult<status::Created<Json<Session>>> {
    let body = body.into_inner();
    let (name, total_races) = body.required_fields()?;

    let session = Session::new(
        state.storage(),
        NewSession {
            name,
            start_date: body.start_date.unwrap_or_else(Helpers::today),
            end_date: body.end_date,
            total_races,
        },
    )?;

    Ok(status::Created::new(format!("/api/sessions/{}", session.id)).body(Json(session)))
}

/// # replace the details of a session
/// a missing end date clears it, a missing start date keeps the stored one
#[put("/sessions/<id>", data = "<body>")]
pub fn update_one(id: &str, body: Json<SessionRequest>, state: &State<AppState>) -> CustomResult<Json<Session>> {
    let body = body.into_inner();
    let (name, total_races) = body.required_fields()?;

    let session = Session::update(
        state.storage(),
        id,
        SessionUpdate {
            name: Some(name),
            start_date: body.start_date,
            end_date: Some(body.end_date),
            total_races: Some(total_races),
        },
    )?;

    Ok(Json(session))
}

#[delete("/sessions/<id>")]
pub fn delete_one(id: &str, state: &State<AppState>) -> CustomResult<Json<Value>> {
    Session::delete_id(state.storage(), id)?;

    Ok(Json(json!({ "message": "Session deleted successfully" })))
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_races: Option<u32>,
}

impl SessionRequest {
    fn required_fields(&self) -> CustomResult<(String, u32)> {
        const MESSAGE: &str = "Name and totalRaces are required";

        Ok((
            Helpers::required(self.name.clone(), MESSAGE)?,
            Helpers::required(self.total_races, MESSAGE)?,
        ))
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiSessions {
    pub sessions: Vec<Session>,
}

/// # Struct representing a json response for the race matrix of a session
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRaceMatrix {
    pub session_id: String,
    pub session_name: String,
    pub total_races: u32,
    pub rows: Vec<MatrixRow>,
    /// points per trainer over the races that were run
    pub totals: BTreeMap<String, u32>,
}

impl ApiRaceMatrix {
    pub fn new(session: &Session, trainers: &[Trainer]) -> ApiRaceMatrix {
        let rows = MatrixHelpers::build_matrix(session, trainers);

        ApiRaceMatrix {
            session_id: session.id.clone(),
            session_name: session.name.clone(),
            total_races: session.total_races,
            totals: MatrixHelpers::column_totals(&rows),
            rows,
        }
    }
}
