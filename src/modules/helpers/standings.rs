use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::modules::helpers::math::Math;
use crate::modules::helpers::points::PointsTable;
use crate::modules::models::race::Race;
use crate::modules::models::session::Session;
use crate::modules::models::trainer::Trainer;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrainerStats {
    pub trainer_id: String,
    pub trainer_name: String,
    pub total_points: u32,
    pub wins: u32,
    pub podiums: u32,
    pub races: u32,
    pub average_points: f64,
    /// rank in the standings. tied trainers share a rank
    pub position: u32,
}

impl TrainerStats {
    fn empty(trainer: &Trainer) -> TrainerStats {
        TrainerStats {
            trainer_id: trainer.id.clone(),
            trainer_name: trainer.name.clone(),
            total_points: 0,
            wins: 0,
            podiums: 0,
            races: 0,
            average_points: 0.0,
            position: 0,
        }
    }
}

pub struct StandingsHelpers {}

impl StandingsHelpers {
    /// # compute standings
    /// every trainer gets a row, also those without races. results of trainers that
    /// are not in `trainers` are skipped.
    ///
    /// rows are ordered by total points, highest first, keeping the trainer order for
    /// equal totals. a row with the same total as the row above shares its rank,
    /// otherwise its rank is its 1-based place in the list (100, 100, 90 -> 1, 1, 3).
    ///
    /// ## Arguments
    /// * `trainers` - the trainers to rank
    /// * `races` - the races to count
    ///
    /// ## Returns
    /// * `Vec<TrainerStats>` - one row per trainer, ranked
    pub fn compute_standings<'a, I>(trainers: &[Trainer], races: I) -> Vec<TrainerStats>
    where
        I: IntoIterator<Item = &'a Race>,
    {
        let mut stats: Vec<TrainerStats> = trainers.iter().map(TrainerStats::empty).collect();
        let index: HashMap<&str, usize> = trainers
            .iter()
            .enumerate()
            .map(|(i, trainer)| (trainer.id.as_str(), i))
            .collect();

        for race in races {
            for result in &race.results {
                let Some(&i) = index.get(result.trainer_id.as_str()) else {
                    continue;
                };

                let row = &mut stats[i];
                row.total_points += result.points;
                row.races += 1;
                if PointsTable::is_win(result.position) {
                    row.wins += 1;
                }
                if PointsTable::is_podium(result.position) {
                    row.podiums += 1;
                }
            }
        }

        for row in stats.iter_mut() {
            row.average_points = Math::round_float_to_n_decimals(Math::average(row.total_points, row.races), 2);
        }

        // stable, so equal totals keep the trainer order
        stats.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        StandingsHelpers::assign_positions(&mut stats);

        stats
    }

    fn assign_positions(stats: &mut [TrainerStats]) {
        let mut previous: Option<(u32, u32)> = None;

        for (i, row) in stats.iter_mut().enumerate() {
            row.position = match previous {
                Some((points, position)) if points == row.total_points => position,
                _ => i as u32 + 1,
            };
            previous = Some((row.total_points, row.position));
        }
    }

    /// standings over every race of every session
    pub fn career_standings(trainers: &[Trainer], sessions: &[Session]) -> Vec<TrainerStats> {
        StandingsHelpers::compute_standings(trainers, Session::all_races(sessions))
    }

    /// # standings over the last stored session
    /// empty when there are no sessions
    pub fn recent_standings(trainers: &[Trainer], sessions: &[Session]) -> Vec<TrainerStats> {
        match Session::last(sessions) {
            Some(session) => StandingsHelpers::compute_standings(trainers, &session.races),
            None => vec![],
        }
    }
}
