use redis::{Client, Commands, Connection};
use snafu::ResultExt;

use crate::errors::{CustomResult, RedisSnafu, SerializationSnafu};
use crate::modules::config::Backend;
use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;
use crate::modules::storage::Storage;

pub const TRAINERS_KEY: &str = "trainers";
pub const SESSIONS_KEY: &str = "sessions";

/// # collections kept as json arrays under redis keys
/// `trainers` and `sessions` each hold the bare array. a missing key reads as an
/// empty collection.
pub struct RedisStorage {
    client: Client,
}

impl RedisStorage {
    pub fn open(redis_url: &str) -> CustomResult<RedisStorage> {
        let client = Client::open(redis_url).context(RedisSnafu)?;
        Ok(RedisStorage { client })
    }

    fn connect(&self) -> CustomResult<Connection> {
        self.client.get_connection().context(RedisSnafu)
    }

    fn get_data<T>(&self, key: &str) -> CustomResult<Vec<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let conn = &mut self.connect()?;
        let data: Option<String> = conn.get(key).context(RedisSnafu)?;

        match data {
            Some(data) => serde_json::from_str(&data).context(SerializationSnafu),
            None => Ok(vec![]),
        }
    }

    fn set_data<T: serde::Serialize>(&self, key: &str, items: &[T]) -> CustomResult<()> {
        let data = serde_json::to_string(items).context(SerializationSnafu)?;

        let conn = &mut self.connect()?;
        conn.set::<&str, String, ()>(key, data).context(RedisSnafu)
    }
}

impl Storage for RedisStorage {
    fn backend(&self) -> Backend {
        Backend::Redis
    }

    fn load_trainers(&self) -> CustomResult<Vec<Trainer>> {
        self.get_data(TRAINERS_KEY)
    }

    fn save_trainers(&self, trainers: &[Trainer]) -> CustomResult<()> {
        self.set_data(TRAINERS_KEY, trainers)
    }

    fn load_sessions(&self) -> CustomResult<Vec<Session>> {
        self.get_data(SESSIONS_KEY)
    }

    fn save_sessions(&self, sessions: &[Session]) -> CustomResult<()> {
        self.set_data(SESSIONS_KEY, sessions)
    }
}
