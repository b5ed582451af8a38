use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;

/// shown for races of the session that have not been run yet
pub const UNPLAYED_MARKER: &str = "-";

/// # one cell of the race matrix
/// serializes as the points number, or as `"-"` for a race that has not been run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixCell {
    Points(u32),
    Unplayed,
}

impl MatrixCell {
    pub fn points(&self) -> Option<u32> {
        match self {
            MatrixCell::Points(points) => Some(*points),
            MatrixCell::Unplayed => None,
        }
    }
}

impl Serialize for MatrixCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MatrixCell::Points(points) => serializer.serialize_u32(*points),
            MatrixCell::Unplayed => serializer.serialize_str(UNPLAYED_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for MatrixCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = MatrixCell;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a points number or \"{UNPLAYED_MARKER}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MatrixCell, E> {
                u32::try_from(v)
                    .map(MatrixCell::Points)
                    .map_err(|_| E::custom("points out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MatrixCell, E> {
                u32::try_from(v)
                    .map(MatrixCell::Points)
                    .map_err(|_| E::custom("points out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MatrixCell, E> {
                if v == UNPLAYED_MARKER {
                    Ok(MatrixCell::Unplayed)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub race_number: u32,
    /// trainer id -> cell
    pub results: BTreeMap<String, MatrixCell>,
}

pub struct MatrixHelpers {}

impl MatrixHelpers {
    /// # build the race matrix of a session
    /// one row per planned race, 1 through `total_races`. in a race that was run a
    /// trainer without a result scores 0. every cell of a race that was not run is
    /// unplayed.
    ///
    /// ## Arguments
    /// * `session` - the session
    /// * `trainers` - the trainers that get a column
    ///
    /// ## Returns
    /// * `Vec<MatrixRow>` - the rows ordered by race number
    pub fn build_matrix(session: &Session, trainers: &[Trainer]) -> Vec<MatrixRow> {
        (1..=session.total_races)
            .map(|race_number| {
                let race = session.races.iter().find(|r| r.race_number == race_number);

                let results = trainers
                    .iter()
                    .map(|trainer| {
                        let cell = match race {
                            Some(race) => MatrixCell::Points(
                                race.results
                                    .iter()
                                    .find(|r| r.trainer_id == trainer.id)
                                    .map_or(0, |r| r.points),
                            ),
                            None => MatrixCell::Unplayed,
                        };
                        (trainer.id.clone(), cell)
                    })
                    .collect();

                MatrixRow { race_number, results }
            })
            .collect()
    }

    /// # column totals
    /// sums the numeric cells per trainer, unplayed cells are left out
    pub fn column_totals(rows: &[MatrixRow]) -> BTreeMap<String, u32> {
        let mut totals = BTreeMap::new();

        for row in rows {
            for (trainer_id, cell) in &row.results {
                *totals.entry(trainer_id.clone()).or_insert(0) += cell.points().unwrap_or(0);
            }
        }

        totals
    }
}
