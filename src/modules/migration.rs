use log::{info, warn};
use serde::Serialize;

use crate::errors::CustomResult;
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::storage::Storage;

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum MigrationOutcome {
    /// the destination already held data, nothing was copied
    #[serde(rename_all = "camelCase")]
    Skipped {
        existing_trainers: usize,
        existing_sessions: usize,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        migrated_trainers: usize,
        migrated_sessions: usize,
    },
}

/// # copy both collections from one store into another
/// the copy only happens when the destination holds no trainers and no sessions,
/// so existing data is never overwritten.
///
/// ## Arguments
/// * `source` - the store to copy from, normally the json files
/// * `destination` - the store to copy into
///
/// ## Returns
/// * `MigrationOutcome` - what was copied, or why nothing was
pub fn migrate(source: &dyn Storage, destination: &dyn Storage) -> CustomResult<MigrationOutcome> {
    let existing_trainers = storage_handle_error!(destination.load_trainers(), "migration:migrate", "destination trainers");
    let existing_sessions = storage_handle_error!(destination.load_sessions(), "migration:migrate", "destination sessions");

    if !existing_trainers.is_empty() || !existing_sessions.is_empty() {
        warn!(target:"migration:migrate", "destination {} storage already has data, migration skipped", destination.backend());
        return Ok(MigrationOutcome::Skipped {
            existing_trainers: existing_trainers.len(),
            existing_sessions: existing_sessions.len(),
        });
    }

    let trainers = storage_handle_error!(source.load_trainers(), "migration:migrate", "source trainers");
    let sessions = storage_handle_error!(source.load_sessions(), "migration:migrate", "source sessions");

    storage_handle_error!(destination.save_trainers(&trainers), "migration:migrate", "destination trainers");
    storage_handle_error!(destination.save_sessions(&sessions), "migration:migrate", "destination sessions");

    info!(
        target:"migration:migrate",
        "migrated {} trainers and {} sessions from {} to {} storage",
        trainers.len(),
        sessions.len(),
        source.backend(),
        destination.backend()
    );

    Ok(MigrationOutcome::Completed {
        migrated_trainers: trainers.len(),
        migrated_sessions: sessions.len(),
    })
}
