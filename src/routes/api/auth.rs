use rocket::serde::json::Json;
use rocket::{post, State};
use serde::{Deserialize, Serialize};

use crate::errors::CustomResult;
use crate::modules::auth;
use crate::server::AppState;

/// # check the admin credentials
/// nothing is issued on success, the client keeps its own logged in state
#[post("/auth/login", data = "<body>")]
pub fn login(body: Json<LoginRequest>, state: &State<AppState>) -> CustomResult<Json<ApiLogin>> {
    auth::login(state.verifier(), body.username.as_deref(), body.password.as_deref())?;

    Ok(Json(ApiLogin {
        success: true,
        message: "Authentication successful".to_string(),
    }))
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct ApiLogin {
    pub success: bool,
    pub message: String,
}
