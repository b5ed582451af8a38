use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::general::Helpers;
use crate::modules::storage::Storage;

#[derive(Serialize, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrainer {
    pub name: String,
    pub active: bool,
    pub joined_date: NaiveDate,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub joined_date: NaiveDate,
}

/// fields of a trainer that may change after creation
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TrainerUpdate {
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl Trainer {
    /// # create trainer
    /// the id is derived from the name. fails with a conflict when a trainer with the
    /// same name (ignoring case) or the same derived id already exists.
    ///
    /// ## Arguments
    /// * `storage` - the storage backend
    /// * `new_trainer` - the trainer to add
    ///
    /// ## Returns
    /// * `Trainer` - the created trainer
    pub fn new(storage: &dyn Storage, new_trainer: NewTrainer) -> CustomResult<Trainer> {
        let name = new_trainer.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Name is required"));
        }

        let mut trainers = storage_handle_error!(storage.load_trainers(), "models/trainer:new", "trainers");

        let trainer = Trainer {
            id: Helpers::slugify(&name),
            name,
            active: new_trainer.active,
            joined_date: new_trainer.joined_date,
        };

        if trainers
            .iter()
            .any(|t| Helpers::same_name(&t.name, &trainer.name) || t.id == trainer.id)
        {
            warn!(target:"models/trainer:new", "trainer already exists: {}", trainer.name);
            return Err(Error::conflict("Trainer already exists"));
        }

        trainers.push(trainer.clone());
        storage_handle_error!(storage.save_trainers(&trainers), "models/trainer:new", "trainers");

        info!(target:"models/trainer:new", "added trainer {}", trainer.id);
        Ok(trainer)
    }

    pub fn get_all(storage: &dyn Storage) -> CustomResult<Vec<Trainer>> {
        storage.load_trainers()
    }

    pub fn get_by_id(storage: &dyn Storage, id: &str) -> CustomResult<Trainer> {
        Trainer::get_all(storage)?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found("Trainer", id))
    }

    /// # update trainer
    /// only the provided fields are overwritten. the id never changes.
    ///
    /// ## Arguments
    /// * `storage` - the storage backend
    /// * `id` - the id of the trainer
    /// * `update` - the fields to change
    ///
    /// ## Returns
    /// * `Trainer` - the trainer after the update
    pub fn update(storage: &dyn Storage, id: &str, update: TrainerUpdate) -> CustomResult<Trainer> {
        let name = match update.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(Error::validation("Name is required"));
                }
                Some(name)
            }
            None => None,
        };

        let mut trainers = storage_handle_error!(storage.load_trainers(), "models/trainer:update", "trainers");

        let trainer = match trainers.iter_mut().find(|t| t.id == id) {
            Some(trainer) => trainer,
            None => {
                warn!(target:"models/trainer:update", "trainer not found: {}", id);
                return Err(Error::not_found("Trainer", id));
            }
        };

        if let Some(name) = name {
            trainer.name = name;
        }
        if let Some(active) = update.active {
            trainer.active = active;
        }
        let updated = trainer.clone();

        storage_handle_error!(storage.save_trainers(&trainers), "models/trainer:update", "trainers");

        info!(target:"models/trainer:update", "updated trainer {}", id);
        Ok(updated)
    }

    /// # delete trainer by id
    /// race results of the trainer are left in place and are skipped by the standings.
    pub fn delete_id(storage: &dyn Storage, id: &str) -> CustomResult<()> {
        let mut trainers = storage_handle_error!(storage.load_trainers(), "models/trainer:delete_id", "trainers");

        let before = trainers.len();
        trainers.retain(|t| t.id != id);
        if trainers.len() == before {
            warn!(target:"models/trainer:delete_id", "trainer not found: {}", id);
            return Err(Error::not_found("Trainer", id));
        }

        storage_handle_error!(storage.save_trainers(&trainers), "models/trainer:delete_id", "trainers");

        info!(target:"models/trainer:delete_id", "deleted trainer {}", id);
        Ok(())
    }
}
