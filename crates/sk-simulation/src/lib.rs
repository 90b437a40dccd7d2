//! Turn-based combat simulation for Skirmish.
//!
//! A [`CombatManager`] takes two teams of [`sk_mechanics::Actor`]s, rolls
//! initiative, and drives rounds and turns until one team is down.
//! [`run_simulations`] repeats a fight many times in parallel and collects
//! round counts, win rate, and remaining health. All randomness flows from
//! [`CombatConfig::seed`], so runs are reproducible.

/// Parallel batches of fights.
pub mod batch;
/// Configuration types for combat runs.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Initiative rolls and turn order.
pub mod initiative;
/// The turn state machine.
pub mod manager;
/// Tracing subscriber setup.
pub mod telemetry;

/// Re-exports of [`batch::run_simulations`] and [`batch::SimulationSummary`].
pub use batch::{SimulationSummary, run_simulations};
/// Re-export of [`config::CombatConfig`].
pub use config::CombatConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of manager types.
pub use manager::{CombatManager, CombatOutcome, Phase};
