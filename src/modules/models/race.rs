use std::collections::HashSet;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::points::PointsTable;
use crate::modules::models::session::Session;
use crate::modules::storage::Storage;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub trainer_id: String,
    /// finishing position, 1 is the winner. 0 or less means no position was entered
    pub position: i32,
    pub points: u32,
}

impl RaceResult {
    /// a result with its points taken from the points table
    pub fn scored(trainer_id: &str, position: i32) -> RaceResult {
        RaceResult {
            trainer_id: trainer_id.to_string(),
            position,
            points: PointsTable::points_for_position(position),
        }
    }
}

/// track details of the race that was run
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RaceData {
    pub name: String,
    pub distance: u32,
    pub track: u32,
    pub terrain: u32,
    pub grade: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    pub session_id: String,
    pub race_number: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub results: Vec<RaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_data: Option<RaceData>,
}

#[derive(Debug, Clone)]
pub struct NewRace {
    pub race_number: u32,
    pub date: NaiveDate,
    pub results: Vec<RaceResult>,
    pub race_data: Option<RaceData>,
}

#[derive(Debug, Clone, Default)]
pub struct RaceUpdate {
    pub race_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub results: Option<Vec<RaceResult>>,
    pub race_data: Option<RaceData>,
}

impl Race {
    pub fn make_id(session_id: &str, race_number: u32) -> String {
        format!("{session_id}-{race_number}")
    }

    /// # recompute points
    /// stored points always come from the points table, whatever the caller sent
    fn score(results: Vec<RaceResult>) -> Vec<RaceResult> {
        results
            .into_iter()
            .map(|r| RaceResult::scored(&r.trainer_id, r.position))
            .collect()
    }

    /// # check race results
    /// a trainer may appear once per race and a position may be taken once.
    /// results without a position are not checked for duplicate positions.
    pub fn check_results(results: &[RaceResult]) -> CustomResult<()> {
        let mut trainers = HashSet::new();
        let mut positions = HashSet::new();

        for result in results {
            if result.trainer_id.is_empty() {
                return Err(Error::validation("Every result needs a trainerId"));
            }
            if !trainers.insert(result.trainer_id.as_str()) {
                return Err(Error::ValidationError {
                    message: format!("Trainer {} has more than one result", result.trainer_id),
                });
            }
            if result.position > 0 && !positions.insert(result.position) {
                return Err(Error::ValidationError {
                    message: format!("Duplicate position: {}", result.position),
                });
            }
        }

        Ok(())
    }

    /// # add race to a session
    /// fails with not found for an unknown session and with a conflict when the
    /// session already has a race with the same number.
    ///
    /// ## Arguments
    /// * `storage` - the storage backend
    /// * `session_id` - the session that owns the race
    /// * `new_race` - the race to add
    ///
    /// ## Returns
    /// * `Race` - the created race
    pub fn new(storage: &dyn Storage, session_id: &str, new_race: NewRace) -> CustomResult<Race> {
        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/race:new", "sessions");

        let session = Race::owning_session(&mut sessions, session_id, "models/race:new")?;

        let id = Race::make_id(session_id, new_race.race_number);
        if session
            .races
            .iter()
            .any(|r| r.race_number == new_race.race_number || r.id == id)
        {
            warn!(target:"models/race:new", "race {} already exists in {}", new_race.race_number, session_id);
            return Err(Error::conflict("Race already exists for this session"));
        }

        let race = Race {
            id,
            session_id: session_id.to_string(),
            race_number: new_race.race_number,
            date: new_race.date,
            results: Race::score(new_race.results),
            race_data: new_race.race_data,
        };
        session.races.push(race.clone());

        storage_handle_error!(storage.save_sessions(&sessions), "models/race:new", "sessions");

        info!(target:"models/race:new", "added race {}", race.id);
        Ok(race)
    }

    /// # update race
    /// only the provided fields are overwritten. a new race number moves the race to
    /// the id of that number and fails with a conflict when another race of the
    /// session already uses it.
    pub fn update(storage: &dyn Storage, session_id: &str, race_id: &str, update: RaceUpdate) -> CustomResult<Race> {
        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/race:update", "sessions");

        let session = Race::owning_session(&mut sessions, session_id, "models/race:update")?;

        let index = match session.races.iter().position(|r| r.id == race_id) {
            Some(index) => index,
            None => {
                warn!(target:"models/race:update", "race not found: {}", race_id);
                return Err(Error::not_found("Race", race_id));
            }
        };

        if let Some(race_number) = update.race_number {
            if session
                .races
                .iter()
                .any(|r| r.id != race_id && r.race_number == race_number)
            {
                warn!(target:"models/race:update", "race {} already exists in {}", race_number, session_id);
                return Err(Error::conflict("Race already exists for this session"));
            }
        }

        let race = &mut session.races[index];

        if let Some(race_number) = update.race_number {
            race.race_number = race_number;
            race.id = Race::make_id(session_id, race_number);
        }
        if let Some(date) = update.date {
            race.date = date;
        }
        if let Some(results) = update.results {
            race.results = Race::score(results);
        }
        if let Some(race_data) = update.race_data {
            race.race_data = Some(race_data);
        }
        let updated = race.clone();

        storage_handle_error!(storage.save_sessions(&sessions), "models/race:update", "sessions");

        info!(target:"models/race:update", "updated race {} ({})", race_id, updated.id);
        Ok(updated)
    }

    pub fn delete_id(storage: &dyn Storage, session_id: &str, race_id: &str) -> CustomResult<()> {
        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/race:delete_id", "sessions");

        let session = Race::owning_session(&mut sessions, session_id, "models/race:delete_id")?;

        let before = session.races.len();
        session.races.retain(|r| r.id != race_id);
        if session.races.len() == before {
            warn!(target:"models/race:delete_id", "race not found: {}", race_id);
            return Err(Error::not_found("Race", race_id));
        }

        storage_handle_error!(storage.save_sessions(&sessions), "models/race:delete_id", "sessions");

        info!(target:"models/race:delete_id", "deleted race {}", race_id);
        Ok(())
    }

    /// # find the session owning a race
    ///
    /// ## Returns
    /// * `Session` - the session whose races contain `race_id`
    pub fn find_session(storage: &dyn Storage, race_id: &str) -> CustomResult<Session> {
        Session::get_all(storage)?
            .into_iter()
            .find(|s| s.races.iter().any(|r| r.id == race_id))
            .ok_or_else(|| Error::not_found("Race", race_id))
    }

    fn owning_session<'a>(sessions: &'a mut [Session], session_id: &str, target: &'static str) -> CustomResult<&'a mut Session> {
        match sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => Ok(session),
            None => {
                warn!(target:target, "session not found: {}", session_id);
                Err(Error::not_found("Session", session_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::modules::models::session::NewSession;
    use crate::modules::storage::file::FileStorage;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
    }

    fn storage_with_session() -> (TempDir, FileStorage) {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        Session::new(
            &storage,
            NewSession {
                name: "Spring Cup".to_string(),
                start_date: date(),
                end_date: None,
                total_races: 3,
            },
        )
        .unwrap();
        (dir, storage)
    }

    fn new_race(race_number: u32, results: Vec<RaceResult>) -> NewRace {
        NewRace {
            race_number,
            date: date(),
            results,
            race_data: None,
        }
    }

    fn unscored(trainer_id: &str, position: i32, points: u32) -> RaceResult {
        RaceResult {
            trainer_id: trainer_id.to_string(),
            position,
            points,
        }
    }

    #[test]
    fn new_recomputes_points_and_derives_id() {
        let (_dir, storage) = storage_with_session();

        let race = Race::new(
            &storage,
            "session-1",
            new_race(1, vec![unscored("a", 1, 999), unscored("b", 2, 0), unscored("c", 0, 5)]),
        )
        .unwrap();

        assert_eq!(race.id, "session-1-1");
        assert_eq!(race.session_id, "session-1");
        let points: Vec<u32> = race.results.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![25, 18, 0]);

        let stored = Session::get_by_id(&storage, "session-1").unwrap();
        assert_eq!(stored.races, vec![race]);
    }

    #[test]
    fn new_rejects_duplicate_race_number() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();

        let result = Race::new(&storage, "session-1", new_race(1, vec![]));

        assert!(matches!(result, Err(Error::ConflictError { .. })));
    }

    #[test]
    fn new_in_unknown_session_is_not_found() {
        let (_dir, storage) = storage_with_session();

        let result = Race::new(&storage, "session-7", new_race(1, vec![]));

        assert!(matches!(result, Err(Error::NotFoundError { .. })));
    }

    #[test]
    fn update_rescores_results_and_follows_race_number() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![RaceResult::scored("a", 1)])).unwrap();

        let updated = Race::update(
            &storage,
            "session-1",
            "session-1-1",
            RaceUpdate {
                race_number: Some(2),
                results: Some(vec![unscored("a", 4, 100)]),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.id, "session-1-2");
        assert_eq!(updated.race_number, 2);
        assert_eq!(updated.results, vec![RaceResult::scored("a", 4)]);
        assert_eq!(updated.results[0].points, 12);
    }

    #[test]
    fn update_onto_a_taken_race_number_is_a_conflict() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![RaceResult::scored("a", 1)])).unwrap();
        Race::new(&storage, "session-1", new_race(2, vec![RaceResult::scored("b", 1)])).unwrap();

        let result = Race::update(
            &storage,
            "session-1",
            "session-1-1",
            RaceUpdate {
                race_number: Some(2),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(Error::ConflictError { .. })));
        let stored: Vec<(String, u32)> = Session::get_by_id(&storage, "session-1")
            .unwrap()
            .races
            .into_iter()
            .map(|r| (r.id, r.race_number))
            .collect();
        assert_eq!(
            stored,
            vec![("session-1-1".to_string(), 1), ("session-1-2".to_string(), 2)]
        );
    }

    #[test]
    fn renumbered_race_frees_its_old_number() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();
        Race::update(
            &storage,
            "session-1",
            "session-1-1",
            RaceUpdate {
                race_number: Some(3),
                ..Default::default()
            },
        )
        .unwrap();

        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();
        Race::delete_id(&storage, "session-1", "session-1-1").unwrap();

        let remaining: Vec<String> = Session::get_by_id(&storage, "session-1")
            .unwrap()
            .races
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(remaining, vec!["session-1-3".to_string()]);
    }

    #[test]
    fn update_keeping_its_own_number_is_allowed() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();

        let updated = Race::update(
            &storage,
            "session-1",
            "session-1-1",
            RaceUpdate {
                race_number: Some(1),
                results: Some(vec![RaceResult::scored("a", 2)]),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.id, "session-1-1");
        assert_eq!(updated.results[0].points, 18);
    }

    #[test]
    fn update_unknown_race_is_not_found() {
        let (_dir, storage) = storage_with_session();

        let result = Race::update(&storage, "session-1", "session-1-9", RaceUpdate::default());

        assert!(matches!(result, Err(Error::NotFoundError { .. })));
    }

    #[test]
    fn delete_and_find_session() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();
        Race::new(&storage, "session-1", new_race(2, vec![])).unwrap();

        assert_eq!(Race::find_session(&storage, "session-1-2").unwrap().id, "session-1");

        Race::delete_id(&storage, "session-1", "session-1-2").unwrap();

        assert!(matches!(
            Race::find_session(&storage, "session-1-2"),
            Err(Error::NotFoundError { .. })
        ));
        assert!(matches!(
            Race::delete_id(&storage, "session-1", "session-1-2"),
            Err(Error::NotFoundError { .. })
        ));
        assert_eq!(Session::get_by_id(&storage, "session-1").unwrap().races.len(), 1);
    }

    #[test]
    fn races_go_with_their_session() {
        let (_dir, storage) = storage_with_session();
        Race::new(&storage, "session-1", new_race(1, vec![])).unwrap();

        Session::delete_id(&storage, "session-1").unwrap();

        assert!(Race::find_session(&storage, "session-1-1").is_err());
    }

    #[test]
    fn check_results_flags_duplicates() {
        assert!(Race::check_results(&[RaceResult::scored("a", 1), RaceResult::scored("b", 2)]).is_ok());
        assert!(Race::check_results(&[RaceResult::scored("a", 0), RaceResult::scored("b", 0)]).is_ok());

        assert!(matches!(
            Race::check_results(&[RaceResult::scored("a", 1), RaceResult::scored("a", 2)]),
            Err(Error::ValidationError { .. })
        ));
        assert!(matches!(
            Race::check_results(&[RaceResult::scored("a", 1), RaceResult::scored("b", 1)]),
            Err(Error::ValidationError { .. })
        ));
    }
}
