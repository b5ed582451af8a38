use std::process::exit;

use log::{error, info, warn};

use trainer_league::modules::config::{Backend, Config};
use trainer_league::modules::helpers::logging::setup_logging;
use trainer_league::modules::migration::{migrate, MigrationOutcome};
use trainer_league::modules::storage::file::FileStorage;
use trainer_league::modules::storage::open_storage;

fn main() {
    let config = Config::from_env().expect("Failed to load configuration");
    setup_logging(&config).expect("Error setting up logging");

    if config.backend == Backend::File {
        warn!(target:"migrate_from_files", "STORAGE_BACKEND is file, there is nothing to migrate into");
        exit(1);
    }

    let source = FileStorage::new(&config.data_dir);
    let destination = match open_storage(&config) {
        Ok(storage) => storage,
        Err(err) => {
            error!(target:"migrate_from_files", "Error opening storage: {}", err);
            exit(1);
        }
    };

    match migrate(&source, destination.as_ref()) {
        Ok(MigrationOutcome::Completed { migrated_trainers, migrated_sessions }) => {
            info!(target:"migrate_from_files", "migrated {} trainers and {} sessions from {}", migrated_trainers, migrated_sessions, source.data_dir().display());
        }
        Ok(MigrationOutcome::Skipped { existing_trainers, existing_sessions }) => {
            warn!(target:"migrate_from_files", "destination already holds {} trainers and {} sessions, skipped", existing_trainers, existing_sessions);
        }
        Err(err) => {
            error!(target:"migrate_from_files", "migration failed: {}", err);
            exit(1);
        }
    }
}
