use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::errors::{CustomResult, FileSnafu, SerializationSnafu};
use crate::modules::config::Backend;
use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;
use crate::modules::storage::Storage;

pub const TRAINERS_FILE: &str = "trainers.json";
pub const SESSIONS_FILE: &str = "races.json";

#[derive(Serialize, Deserialize, Default)]
struct TrainersDocument {
    #[serde(default)]
    trainers: Vec<Trainer>,
}

#[derive(Serialize, Deserialize, Default)]
struct SessionsDocument {
    #[serde(default)]
    sessions: Vec<Session>,
}

/// # json files in a data directory
/// trainers are kept as `{"trainers": [...]}` in trainers.json and sessions as
/// `{"sessions": [...]}` in races.json. a missing file reads as an empty collection.
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> FileStorage {
        FileStorage {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_document<T>(&self, file_name: &str) -> CustomResult<T>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Ok(T::default());
        }

        let data = fs::read_to_string(&path).context(FileSnafu { path: path.clone() })?;
        serde_json::from_str(&data).context(SerializationSnafu)
    }

    fn write_document<T: Serialize>(&self, file_name: &str, document: &T) -> CustomResult<()> {
        fs::create_dir_all(&self.data_dir).context(FileSnafu {
            path: self.data_dir.clone(),
        })?;

        let path = self.data_dir.join(file_name);
        let data = serde_json::to_string_pretty(document).context(SerializationSnafu)?;
        fs::write(&path, data).context(FileSnafu { path })
    }
}

impl Storage for FileStorage {
    fn backend(&self) -> Backend {
        Backend::File
    }

    fn load_trainers(&self) -> CustomResult<Vec<Trainer>> {
        let document: TrainersDocument = self.read_document(TRAINERS_FILE)?;
        Ok(document.trainers)
    }

    fn save_trainers(&self, trainers: &[Trainer]) -> CustomResult<()> {
        self.write_document(
            TRAINERS_FILE,
            &TrainersDocument {
                trainers: trainers.to_vec(),
            },
        )
    }

    fn load_sessions(&self) -> CustomResult<Vec<Session>> {
        let document: SessionsDocument = self.read_document(SESSIONS_FILE)?;
        Ok(document.sessions)
    }

    fn save_sessions(&self, sessions: &[Session]) -> CustomResult<()> {
        self.write_document(
            SESSIONS_FILE,
            &SessionsDocument {
                sessions: sessions.to_vec(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;
    use crate::errors::Error;

    fn trainer(name: &str) -> Trainer {
        Trainer {
            id: name.to_lowercase(),
            name: name.to_string(),
            active: true,
            joined_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("not-created-yet"));

        assert!(storage.load_trainers().unwrap().is_empty());
        assert!(storage.load_sessions().unwrap().is_empty());
    }

    #[test]
    fn trainers_are_wrapped_in_a_document() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.save_trainers(&[trainer("Aiko")]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(TRAINERS_FILE)).unwrap()).unwrap();
        assert_eq!(raw["trainers"][0]["id"], "aiko");
        assert_eq!(raw["trainers"][0]["joinedDate"], "2025-01-01");
        assert_eq!(storage.load_trainers().unwrap(), vec![trainer("Aiko")]);
    }

    #[test]
    fn reads_documents_written_by_hand() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SESSIONS_FILE),
            r#"{"sessions": [{"id": "session-1", "name": "Cup", "startDate": "2025-01-01",
                "endDate": null, "totalRaces": 2, "races": [{"id": "session-1-1",
                "sessionId": "session-1", "raceNumber": 1, "date": "2025-01-02",
                "results": [{"trainerId": "aiko", "position": 1, "points": 25}]}]}]}"#,
        )
        .unwrap();
        let storage = FileStorage::new(dir.path());

        let sessions = storage.load_sessions().unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].races[0].results[0].points, 25);
        assert!(sessions[0].races[0].race_data.is_none());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TRAINERS_FILE), "{ not json").unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.load_trainers(),
            Err(Error::SerializationError { .. })
        ));
    }
}
