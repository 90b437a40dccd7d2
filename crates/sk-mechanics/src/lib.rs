//! Combat mechanics for Skirmish.
//!
//! Builds on the plain data in [`sk_core`] with everything that happens at
//! the table: dice, actors with resource pools, the damage pipeline, actions,
//! and the strategies that pick them. Actors live in a [`Roster`] and refer
//! to each other by [`ActorId`], so actions can mutate attacker and defender
//! in turn without shared ownership.

/// Actions, their costs, and their resolution.
pub mod action;
/// Combatants and their construction data.
pub mod actor;
/// Resistances, vulnerabilities, and damage reduction applied to incoming damage.
pub mod damage;
/// Dice, dice pools, and roll results.
pub mod dice;
/// Error types for the mechanics crate.
pub mod error;
/// Structured combat events.
pub mod log;
/// The actor arena and team queries.
pub mod roster;
/// Action and target selection.
pub mod strategy;

/// Re-exports of action types.
pub use action::{
    Action, ActionContext, ActionCost, ActionOutcome, HitKind, SavingThrow, SkipReason, Spell,
};
/// Re-exports of actor types.
pub use actor::{Actor, ActorSpec, CombatState, ItemSpec, Track};
/// Re-exports of damage pipeline types.
pub use damage::{DamageReport, ResolvedDamage, resolve, take_damage};
/// Re-exports of dice types.
pub use dice::{DicePool, Die, Keep, RollResult};
/// Re-exports of [`error::MechError`] and [`error::MechResult`].
pub use error::{MechError, MechResult};
/// Re-exports of combat log types.
pub use log::{CombatEvent, CombatEventKind, CombatLog};
/// Re-exports of roster types.
pub use roster::{ActorId, Roster, Team};
/// Re-exports of strategy types.
pub use strategy::{CombatStrategy, TargetingStrategy};
