use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use log::LevelFilter;
use sha2::{Digest, Sha256};

use crate::errors::{CustomResult, Error};
use crate::modules::helpers::logging::parse_level;

/// where the trainers and sessions collections are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    Redis,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Redis => write!(f, "redis"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "redis" => Ok(Backend::Redis),
            other => Err(Error::ConfigError {
                message: format!("unknown STORAGE_BACKEND `{other}`, expected `file` or `redis`"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    /// holds trainers.json and races.json. also the migration source in redis mode
    pub data_dir: PathBuf,
    pub redis_url: Option<String>,
    pub logging_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub admin_username: String,
    /// hex encoded sha256 of the admin password
    pub admin_password_sha256: String,
}

impl Config {
    /// # load the configuration from the environment
    /// a `.env` file in the working directory is read first when present.
    pub fn from_env() -> CustomResult<Config> {
        dotenv().ok();

        Config::from_vars(|key| env::var(key).ok())
    }

    /// # build the configuration from a variable lookup
    ///
    /// ## Arguments
    /// * `lookup` - returns the value of a variable, or None when unset
    pub fn from_vars<F>(lookup: F) -> CustomResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<Backend>()?,
            None => Backend::File,
        };

        let redis_url = lookup("REDIS_URL").filter(|url| !url.is_empty());
        if backend == Backend::Redis && redis_url.is_none() {
            return Err(Error::ConfigError {
                message: "REDIS_URL must be set when STORAGE_BACKEND is redis".to_string(),
            });
        }

        let admin_username = lookup("ADMIN_USERNAME")
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::ConfigError {
                message: "ADMIN_USERNAME must be set".to_string(),
            })?;

        let admin_password_sha256 = match (lookup("ADMIN_PASSWORD_SHA256"), lookup("ADMIN_PASSWORD")) {
            (Some(digest), _) if !digest.is_empty() => digest.to_lowercase(),
            (_, Some(password)) if !password.is_empty() => hash_password(&password),
            _ => {
                return Err(Error::ConfigError {
                    message: "ADMIN_PASSWORD or ADMIN_PASSWORD_SHA256 must be set".to_string(),
                })
            }
        };

        Ok(Config {
            backend,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            redis_url,
            logging_level: parse_level(&lookup("LOGGING_LEVEL").unwrap_or_default()),
            log_file: lookup("LOG_FILE").filter(|f| !f.is_empty()).map(PathBuf::from),
            admin_username,
            admin_password_sha256,
        })
    }
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
