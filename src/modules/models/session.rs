use std::cmp::Reverse;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::macros::storage_error_handler::storage_handle_error;
use crate::modules::helpers::general::Helpers;
use crate::modules::models::race::Race;
use crate::modules::storage::Storage;

#[derive(Serialize, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_races: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// planned number of races. not a cap on `races`
    pub total_races: u32,
    #[serde(default)]
    pub races: Vec<Race>,
}

/// fields of a session that may change after creation.
/// `end_date: Some(None)` clears the end date.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub total_races: Option<u32>,
}

impl Session {
    /// # create session
    /// the session gets the next free `session-<n>` id and no races.
    /// fails with a conflict when a session with the same name (ignoring case) exists.
    ///
    /// ## Arguments
    /// * `storage` - the storage backend
    /// * `new_session` - the session to add
    ///
    /// ## Returns
    /// * `Session` - the created session
    pub fn new(storage: &dyn Storage, new_session: NewSession) -> CustomResult<Session> {
        let name = new_session.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Name is required"));
        }

        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/session:new", "sessions");

        if sessions.iter().any(|s| Helpers::same_name(&s.name, &name)) {
            warn!(target:"models/session:new", "session already exists: {}", name);
            return Err(Error::conflict("Session already exists"));
        }

        let session = Session {
            id: Session::next_id(&sessions),
            name,
            start_date: new_session.start_date,
            end_date: new_session.end_date,
            total_races: new_session.total_races,
            races: vec![],
        };

        sessions.push(session.clone());
        storage_handle_error!(storage.save_sessions(&sessions), "models/session:new", "sessions");

        info!(target:"models/session:new", "added session {}", session.id);
        Ok(session)
    }

    /// # next session id
    /// one past the highest `session-<n>` number in use, so ids are never reused
    /// after a delete.
    pub fn next_id(sessions: &[Session]) -> String {
        let highest = sessions
            .iter()
            .filter_map(|s| s.id.strip_prefix("session-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        format!("session-{}", highest.max(sessions.len() as u32) + 1)
    }

    pub fn get_all(storage: &dyn Storage) -> CustomResult<Vec<Session>> {
        storage.load_sessions()
    }

    pub fn get_by_id(storage: &dyn Storage, id: &str) -> CustomResult<Session> {
        Session::get_all(storage)?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("Session", id))
    }

    /// # update session
    /// only the provided fields are overwritten. races are left untouched.
    /// a rename fails with a conflict when another session already has the name
    /// (ignoring case).
    pub fn update(storage: &dyn Storage, id: &str, update: SessionUpdate) -> CustomResult<Session> {
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

        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/session:update", "sessions");

        if let Some(name) = &name {
            if sessions
                .iter()
                .any(|s| s.id != id && Helpers::same_name(&s.name, name))
            {
                warn!(target:"models/session:update", "session already exists: {}", name);
                return Err(Error::conflict("Session already exists"));
            }
        }

        let session = match sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => session,
            None => {
                warn!(target:"models/session:update", "session not found: {}", id);
                return Err(Error::not_found("Session", id));
            }
        };

        if let Some(name) = name {
            session.name = name;
        }
        if let Some(start_date) = update.start_date {
            session.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            session.end_date = end_date;
        }
        if let Some(total_races) = update.total_races {
            session.total_races = total_races;
        }
        let updated = session.clone();

        storage_handle_error!(storage.save_sessions(&sessions), "models/session:update", "sessions");

        info!(target:"models/session:update", "updated session {}", id);
        Ok(updated)
    }

    /// # delete session by id
    /// the races of the session are deleted with it.
    pub fn delete_id(storage: &dyn Storage, id: &str) -> CustomResult<()> {
        let mut sessions = storage_handle_error!(storage.load_sessions(), "models/session:delete_id", "sessions");

        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            warn!(target:"models/session:delete_id", "session not found: {}", id);
            return Err(Error::not_found("Session", id));
        }

        storage_handle_error!(storage.save_sessions(&sessions), "models/session:delete_id", "sessions");

        info!(target:"models/session:delete_id", "deleted session {}", id);
        Ok(())
    }

    /// # last stored session
    /// the most recent session by storage order, not by date
    pub fn last(sessions: &[Session]) -> Option<&Session> {
        sessions.last()
    }

    /// # current session
    /// the open session (no end date, or ending today or later) with the latest start
    /// date. falls back to the last stored session when none is open.
    ///
    /// ## Arguments
    /// * `sessions` - all sessions in storage order
    /// * `today` - the date used to decide if a session has ended
    pub fn current(sessions: &[Session], today: NaiveDate) -> Option<&Session> {
        sessions
            .iter()
            .filter(|s| s.end_date.map_or(true, |end| end >= today))
            // min over the reversed date keeps the first of equal start dates
            .min_by_key(|s| Reverse(s.start_date))
            .or_else(|| Session::last(sessions))
    }

    pub fn all_races(sessions: &[Session]) -> impl Iterator<Item = &Race> {
        sessions.iter().flat_map(|s| s.races.iter())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::modules::storage::file::FileStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_session(name: &str) -> NewSession {
        NewSession {
            name: name.to_string(),
            start_date: date(2025, 3, 1),
            end_date: None,
            total_races: 10,
        }
    }

    fn session(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> Session {
        Session {
            id: id.to_string(),
            name: id.to_string(),
            start_date: start,
            end_date: end,
            total_races: 5,
            races: vec![],
        }
    }

    #[test]
    fn new_assigns_sequential_ids() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let first = Session::new(&storage, new_session("Spring Cup")).unwrap();
        let second = Session::new(&storage, new_session("Summer Cup")).unwrap();

        assert_eq!(first.id, "session-1");
        assert_eq!(second.id, "session-2");
        assert!(second.races.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        Session::new(&storage, new_session("One")).unwrap();
        Session::new(&storage, new_session("Two")).unwrap();

        Session::delete_id(&storage, "session-1").unwrap();
        let third = Session::new(&storage, new_session("Three")).unwrap();

        assert_eq!(third.id, "session-3");
    }

    #[test]
    fn new_rejects_duplicate_name_ignoring_case() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        Session::new(&storage, new_session("Spring Cup")).unwrap();

        let result = Session::new(&storage, new_session("spring cup"));

        assert!(matches!(result, Err(Error::ConflictError { .. })));
    }

    #[test]
    fn update_merges_and_can_clear_end_date() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let mut created = new_session("Spring Cup");
        created.end_date = Some(date(2025, 4, 1));
        Session::new(&storage, created).unwrap();

        let updated = Session::update(
            &storage,
            "session-1",
            SessionUpdate {
                total_races: Some(12),
                end_date: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.name, "Spring Cup");
        assert_eq!(updated.total_races, 12);
        assert_eq!(updated.end_date, None);
        assert_eq!(updated.start_date, date(2025, 3, 1));
    }

    #[test]
    fn rename_onto_another_session_name_is_a_conflict() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        Session::new(&storage, new_session("Spring Cup")).unwrap();
        Session::new(&storage, new_session("Summer Cup")).unwrap();

        let result = Session::update(
            &storage,
            "session-2",
            SessionUpdate {
                name: Some("SPRING CUP".to_string()),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(Error::ConflictError { .. })));
        let names: Vec<String> = Session::get_all(&storage).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Spring Cup".to_string(), "Summer Cup".to_string()]);
    }

    #[test]
    fn rename_trims_and_may_change_own_case() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        Session::new(&storage, new_session("Spring Cup")).unwrap();

        let updated = Session::update(
            &storage,
            "session-1",
            SessionUpdate {
                name: Some("  SPRING CUP ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "SPRING CUP");

        let blank = Session::update(
            &storage,
            "session-1",
            SessionUpdate {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(blank, Err(Error::ValidationError { .. })));
    }

    #[test]
    fn update_and_delete_unknown_id_are_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            Session::update(&storage, "session-9", SessionUpdate::default()),
            Err(Error::NotFoundError { .. })
        ));
        assert!(matches!(
            Session::delete_id(&storage, "session-9"),
            Err(Error::NotFoundError { .. })
        ));
    }

    #[test]
    fn current_prefers_latest_open_session() {
        let today = date(2025, 6, 1);
        let sessions = vec![
            session("closed", date(2025, 5, 1), Some(date(2025, 5, 20))),
            session("older-open", date(2025, 1, 1), None),
            session("newer-open", date(2025, 4, 1), Some(date(2025, 6, 1))),
            session("last-stored", date(2024, 1, 1), Some(date(2024, 2, 1))),
        ];

        assert_eq!(Session::current(&sessions, today).unwrap().id, "newer-open");
    }

    #[test]
    fn current_falls_back_to_last_stored() {
        let today = date(2025, 6, 1);
        let sessions = vec![
            session("a", date(2025, 1, 1), Some(date(2025, 2, 1))),
            session("b", date(2024, 1, 1), Some(date(2024, 2, 1))),
        ];

        assert_eq!(Session::current(&sessions, today).unwrap().id, "b");
        assert!(Session::current(&[], today).is_none());
    }

    #[test]
    fn current_keeps_storage_order_on_equal_start_dates() {
        let today = date(2025, 6, 1);
        let sessions = vec![
            session("first", date(2025, 5, 1), None),
            session("second", date(2025, 5, 1), None),
        ];

        assert_eq!(Session::current(&sessions, today).unwrap().id, "first");
    }
}
