use std::io::Cursor;
use std::path::PathBuf;

use log::error;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// a required field is missing or has an unusable value
    #[snafu(display("{message}"))]
    ValidationError { message: String },

    #[snafu(display("Invalid username or password"))]
    AuthError,

    #[snafu(display("{entity} not found"))]
    NotFoundError { entity: String, id: String },

    /// duplicate trainer name, session name or race number
    #[snafu(display("{message}"))]
    ConflictError { message: String },

    #[snafu(display("Error accessing {}: {}", path.display(), source))]
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Error (de)serializing stored data: {source}"))]
    SerializationError { source: serde_json::Error },

    #[snafu(display("Error talking to redis: {source}"))]
    RedisError { source: redis::RedisError },

    #[snafu(display("Invalid configuration: {message}"))]
    ConfigError { message: String },
}

impl Error {
    /// # status code for this error
    /// storage and configuration failures are all reported as a 500.
    pub fn status(&self) -> Status {
        match self {
            Error::ValidationError { .. } => Status::BadRequest,
            Error::AuthError => Status::Unauthorized,
            Error::NotFoundError { .. } => Status::NotFound,
            Error::ConflictError { .. } => Status::Conflict,
            Error::FileError { .. }
            | Error::SerializationError { .. }
            | Error::RedisError { .. }
            | Error::ConfigError { .. } => Status::InternalServerError,
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Error {
        Error::NotFoundError {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: &str) -> Error {
        Error::ConflictError {
            message: message.to_string(),
        }
    }

    pub fn validation(message: &str) -> Error {
        Error::ValidationError {
            message: message.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();

        // the cause of a storage failure stays in the log
        let message = if status == Status::InternalServerError {
            error!(target:"errors:respond_to", "{} {} failed: {}", request.method(), request.uri(), self);
            "Internal storage failure".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({ "error": message }).to_string();
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
