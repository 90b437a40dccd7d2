//! Per-actor decision making.
//!
//! Strategies are plain enum values stored on each actor. The combat
//! manager asks [`CombatStrategy::choose_action`] for the next action and
//! [`TargetingStrategy::retarget`] whenever the current target is no longer
//! a valid enemy.

pub mod combat;
pub mod targeting;

pub use combat::CombatStrategy;
pub use targeting::TargetingStrategy;
