//! Many independent fights between the same two teams, in parallel.
//!
//! Every run gets fresh copies of the team templates and its own RNG seeded
//! `config.seed + run index`, so a batch is reproducible regardless of how
//! the runs are scheduled across threads.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sk_mechanics::{Actor, Team};
use tracing::info;

use crate::config::CombatConfig;
use crate::error::SimResult;
use crate::manager::{CombatManager, CombatOutcome};

/// Aggregated results of a batch, one entry per run in run order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Rounds per run.
    pub rounds: Vec<u32>,
    /// Turns per run.
    pub turns: Vec<u32>,
    /// Share of runs won by team A; draws count as losses.
    pub team_a_win_rate: f64,
    /// Remaining health per run, keyed by actor name.
    pub remaining_health: Vec<BTreeMap<String, i32>>,
}

impl SimulationSummary {
    /// Number of runs summarized.
    pub fn runs(&self) -> usize {
        self.rounds.len()
    }

    /// Mean rounds per run, 0 for an empty batch.
    pub fn mean_rounds(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }
        self.rounds.iter().map(|&r| f64::from(r)).sum::<f64>() / self.rounds.len() as f64
    }

    fn from_outcomes(outcomes: Vec<CombatOutcome>) -> Self {
        let runs = outcomes.len();
        let wins = outcomes
            .iter()
            .filter(|o| o.winner == Some(Team::A))
            .count();
        let mut summary = Self {
            team_a_win_rate: if runs == 0 {
                0.0
            } else {
                wins as f64 / runs as f64
            },
            ..Self::default()
        };
        for outcome in outcomes {
            summary.rounds.push(outcome.rounds);
            summary.turns.push(outcome.turns);
            summary.remaining_health.push(outcome.remaining_health);
        }
        summary
    }
}

/// Run `runs` fights between `team_a` and `team_b`.
///
/// The teams are validated once up front; a setup error aborts the batch.
pub fn run_simulations(
    runs: usize,
    team_a: &[Actor],
    team_b: &[Actor],
    config: &CombatConfig,
) -> SimResult<SimulationSummary> {
    CombatManager::new(team_a.to_vec(), team_b.to_vec(), config.clone())?;

    let outcomes: Vec<CombatOutcome> = (0..runs)
        .into_par_iter()
        .map(|run| -> SimResult<CombatOutcome> {
            let seeded = config.clone().with_seed(config.seed.wrapping_add(run as u64));
            let mut manager = CombatManager::new(team_a.to_vec(), team_b.to_vec(), seeded)?;
            Ok(manager.run_combat())
        })
        .collect::<SimResult<_>>()?;

    let summary = SimulationSummary::from_outcomes(outcomes);
    info!(
        runs,
        team_a_win_rate = summary.team_a_win_rate,
        mean_rounds = summary.mean_rounds(),
        "batch finished"
    );
    Ok(summary)
}
