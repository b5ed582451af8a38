use log::info;

use crate::errors::CustomResult;
use crate::modules::config::{Backend, Config};
use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;

pub mod file;
pub mod redis_store;

/// # document store for the two collections
/// every read returns the whole collection and every write replaces it.
/// there is no locking between a load and the following save.
pub trait Storage: Send + Sync {
    fn backend(&self) -> Backend;

    fn load_trainers(&self) -> CustomResult<Vec<Trainer>>;
    fn save_trainers(&self, trainers: &[Trainer]) -> CustomResult<()>;

    fn load_sessions(&self) -> CustomResult<Vec<Session>>;
    fn save_sessions(&self, sessions: &[Session]) -> CustomResult<()>;
}

/// # open the configured storage backend
pub fn open_storage(config: &Config) -> CustomResult<Box<dyn Storage>> {
    let storage: Box<dyn Storage> = match config.backend {
        Backend::File => Box::new(file::FileStorage::new(&config.data_dir)),
        Backend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            Box::new(redis_store::RedisStorage::open(url)?)
        }
    };

    info!(target:"storage:open_storage", "using {} storage", storage.backend());
    Ok(storage)
}
