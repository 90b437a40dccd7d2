//! Actions: everything an actor can do on its turn.
//!
//! Every action first checks its cost against the source's pools. When a
//! pool is short the action is skipped with a warning and nothing changes;
//! running out of resources is part of normal play, not an error.

pub mod attack;
pub mod effect;
pub mod spell;
pub mod support;

pub use attack::{HitKind, HitResolution, RollPlan, resolve_hit, roll_plan};
pub use effect::SavingThrow;
pub use spell::{Spell, drop_concentration};

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sk_core::{Damage, Trait};
use tracing::warn;

use crate::damage::{DamageReport, take_damage};
use crate::log::{CombatEventKind, CombatLog};
use crate::roster::{ActorId, Roster};

/// Resource cost of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCost {
    /// Action points.
    pub action_points: i32,
    /// Mana points.
    pub mana_points: i32,
    /// Stamina points.
    pub stamina_points: i32,
}

impl ActionCost {
    /// A cost in every pool.
    pub fn new(action_points: i32, mana_points: i32, stamina_points: i32) -> Self {
        Self {
            action_points,
            mana_points,
            stamina_points,
        }
    }

    /// A cost in action points only.
    pub fn action_points(action_points: i32) -> Self {
        Self::new(action_points, 0, 0)
    }

    /// No cost.
    pub fn free() -> Self {
        Self::default()
    }
}

/// Why an action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Not enough action points.
    ActionPoints,
    /// Not enough mana points.
    ManaPoints,
    /// Not enough stamina points.
    StaminaPoints,
    /// The attacker has no weapon.
    NoWeapon,
    /// The action needs a target and none was given.
    NoTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionPoints => write!(f, "not enough action points"),
            Self::ManaPoints => write!(f, "not enough mana points"),
            Self::StaminaPoints => write!(f, "not enough stamina points"),
            Self::NoWeapon => write!(f, "no weapon equipped"),
            Self::NoTarget => write!(f, "no target"),
        }
    }
}

/// Result of executing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was paid for and resolved.
    Done,
    /// The action did nothing.
    Skipped(SkipReason),
}

impl ActionOutcome {
    /// Whether the action was skipped.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Mutable state an action works on.
pub struct ActionContext<'a> {
    /// Every combatant.
    pub roster: &'a mut Roster,
    /// The fight's random source.
    pub rng: &'a mut StdRng,
    /// The fight's event log.
    pub log: &'a mut CombatLog,
    imposed: Vec<(ActorId, String)>,
}

impl<'a> ActionContext<'a> {
    /// Bundle the fight state for action execution.
    pub fn new(roster: &'a mut Roster, rng: &'a mut StdRng, log: &'a mut CombatLog) -> Self {
        Self {
            roster,
            rng,
            log,
            imposed: Vec::new(),
        }
    }

    /// Charge `cost` to `source`, or log why the action is skipped.
    pub fn pay(
        &mut self,
        source: ActorId,
        cost: &ActionCost,
        action: &str,
    ) -> Result<(), SkipReason> {
        let actor = &mut self.roster[source];
        match actor.try_pay(cost) {
            Ok(()) => Ok(()),
            Err(reason) => {
                self.skip(source, action, reason);
                Err(reason)
            }
        }
    }

    /// Record a skipped action.
    pub fn skip(&mut self, source: ActorId, action: &str, reason: SkipReason) {
        let name = self.roster[source].name().to_string();
        warn!(actor = %name, action, %reason, "action skipped");
        self.log.push(
            CombatEventKind::ActionSkipped {
                actor: source,
                action: action.to_string(),
                reason,
            },
            format!("{name} cannot {action}: {reason}"),
        );
    }

    /// Run damage through the pipeline and record the casualty if it drops the target.
    pub fn apply_damage(
        &mut self,
        target: ActorId,
        damages: &[Damage],
        ignore_reduction: bool,
    ) -> DamageReport {
        let was_alive = self.roster[target].is_alive();
        let report = take_damage(&mut self.roster[target], damages, ignore_reduction);
        let name = self.roster[target].name().to_string();
        self.log.push(
            CombatEventKind::DamageTaken {
                actor: target,
                report: report.clone(),
            },
            format!(
                "{name} takes {} damage ({} HP left)",
                report.total, report.health_after
            ),
        );
        self.settle(target, was_alive);
        report
    }

    /// Record an actor that went down since `was_alive` was sampled.
    pub fn settle(&mut self, id: ActorId, was_alive: bool) {
        if !was_alive || self.roster[id].is_alive() {
            return;
        }
        let name = self.roster[id].name().to_string();
        tracing::info!(actor = %name, health = self.roster[id].health.current, "actor down");
        self.log
            .push(CombatEventKind::ActorDown { actor: id }, format!("{name} is down"));
        drop_concentration(id, self);
    }

    /// Add a trait to `target`, remembering it for concentration links.
    ///
    /// Only a newly inserted trait is remembered; one merged into a trait
    /// the target already had outlives the concentration.
    pub fn impose_trait(&mut self, source: ActorId, target: ActorId, new_trait: Trait) {
        let name = new_trait.name.clone();
        if self.roster[target].add_trait(new_trait) {
            self.imposed.push((target, name.clone()));
        }
        let description = format!(
            "{} imposes {name} on {}",
            self.roster[source].name(),
            self.roster[target].name()
        );
        tracing::info!("{description}");
        self.log.push(
            CombatEventKind::TraitImposed {
                source,
                target,
                name,
            },
            description,
        );
    }

    pub(crate) fn imposed_since(&mut self, mark: usize) -> Vec<(ActorId, String)> {
        self.imposed.split_off(mark.min(self.imposed.len()))
    }

    pub(crate) fn imposed_mark(&self) -> usize {
        self.imposed.len()
    }
}

/// An action an actor can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Gain one advantage for the next attack.
    GainAdvantage {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Attack every target with the first weapon.
    Attack {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Deal fixed damage to every target.
    InflictDamage {
        /// Resource cost.
        cost: ActionCost,
        /// Damage dealt to each target.
        damages: Vec<Damage>,
    },
    /// Set the source's current target.
    Target {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Move to the target and set it as current target.
    MoveToTarget {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Dodge the next attack.
    Dodge {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Dodge every attack until the next round.
    FullDodge {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Grant a one-time hit bonus to every target.
    Help {
        /// Resource cost.
        cost: ActionCost,
    },
    /// Place traits on every target.
    ImposeTrait {
        /// Resource cost.
        cost: ActionCost,
        /// Traits placed on each target.
        traits: Vec<Trait>,
    },
    /// Force a saving throw on every target.
    ImposeSavingThrow(SavingThrow),
    /// Pay once, then run sub-actions in order.
    Composite {
        /// Resource cost.
        cost: ActionCost,
        /// Sub-actions.
        actions: Vec<Action>,
    },
    /// Cast a spell.
    Spell(Spell),
}

impl Action {
    /// Gain advantage (1 AP).
    pub fn gain_advantage() -> Self {
        Self::GainAdvantage {
            cost: ActionCost::action_points(1),
        }
    }

    /// Weapon attack (1 AP).
    pub fn attack() -> Self {
        Self::Attack {
            cost: ActionCost::action_points(1),
        }
    }

    /// Fixed damage (free).
    pub fn inflict_damage(damages: Vec<Damage>) -> Self {
        Self::InflictDamage {
            cost: ActionCost::free(),
            damages,
        }
    }

    /// Retarget (free).
    pub fn target() -> Self {
        Self::Target {
            cost: ActionCost::free(),
        }
    }

    /// Move to target (1 AP).
    pub fn move_to_target() -> Self {
        Self::MoveToTarget {
            cost: ActionCost::action_points(1),
        }
    }

    /// Dodge (1 AP).
    pub fn dodge() -> Self {
        Self::Dodge {
            cost: ActionCost::action_points(1),
        }
    }

    /// Full dodge (2 AP).
    pub fn full_dodge() -> Self {
        Self::FullDodge {
            cost: ActionCost::action_points(2),
        }
    }

    /// Help (1 AP).
    pub fn help() -> Self {
        Self::Help {
            cost: ActionCost::action_points(1),
        }
    }

    /// Impose traits (free).
    pub fn impose_trait(traits: Vec<Trait>) -> Self {
        Self::ImposeTrait {
            cost: ActionCost::free(),
            traits,
        }
    }

    /// Run several actions for one payment (free by default).
    pub fn composite(actions: Vec<Action>) -> Self {
        Self::Composite {
            cost: ActionCost::free(),
            actions,
        }
    }

    /// Replace the cost.
    pub fn with_cost(mut self, new_cost: ActionCost) -> Self {
        match &mut self {
            Self::GainAdvantage { cost }
            | Self::Attack { cost }
            | Self::InflictDamage { cost, .. }
            | Self::Target { cost }
            | Self::MoveToTarget { cost }
            | Self::Dodge { cost }
            | Self::FullDodge { cost }
            | Self::Help { cost }
            | Self::ImposeTrait { cost, .. }
            | Self::Composite { cost, .. } => *cost = new_cost,
            Self::ImposeSavingThrow(save) => save.cost = new_cost,
            Self::Spell(spell) => spell.cost = new_cost,
        }
        self
    }

    /// The resource cost.
    pub fn cost(&self) -> ActionCost {
        match self {
            Self::GainAdvantage { cost }
            | Self::Attack { cost }
            | Self::InflictDamage { cost, .. }
            | Self::Target { cost }
            | Self::MoveToTarget { cost }
            | Self::Dodge { cost }
            | Self::FullDodge { cost }
            | Self::Help { cost }
            | Self::ImposeTrait { cost, .. }
            | Self::Composite { cost, .. } => *cost,
            Self::ImposeSavingThrow(save) => save.cost,
            Self::Spell(spell) => spell.cost,
        }
    }

    /// Short action name for logs.
    pub fn name(&self) -> &str {
        match self {
            Self::GainAdvantage { .. } => "gain advantage",
            Self::Attack { .. } => "attack",
            Self::InflictDamage { .. } => "inflict damage",
            Self::Target { .. } => "target",
            Self::MoveToTarget { .. } => "move to target",
            Self::Dodge { .. } => "dodge",
            Self::FullDodge { .. } => "full dodge",
            Self::Help { .. } => "help",
            Self::ImposeTrait { .. } => "impose trait",
            Self::ImposeSavingThrow(_) => "saving throw",
            Self::Composite { .. } => "composite action",
            Self::Spell(spell) => &spell.name,
        }
    }

    /// Whether the action only ever affects its source.
    ///
    /// Run these with no targets; given targets, dodges apply to them instead.
    pub fn is_self_only(&self) -> bool {
        matches!(
            self,
            Self::GainAdvantage { .. } | Self::Dodge { .. } | Self::FullDodge { .. }
        )
    }

    /// Execute the action from `source` against `targets`.
    pub fn execute(
        &self,
        source: ActorId,
        targets: &[ActorId],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        match self {
            Self::GainAdvantage { cost } => attack::gain_advantage(source, cost, ctx),
            Self::Attack { cost } => attack::attack(source, targets, cost, ctx),
            Self::InflictDamage { cost, damages } => {
                effect::inflict_damage(source, targets, cost, damages, ctx)
            }
            Self::Target { cost } => support::target(source, targets, cost, self.name(), ctx),
            Self::MoveToTarget { cost } => support::target(source, targets, cost, self.name(), ctx),
            Self::Dodge { cost } => support::dodge(source, targets, cost, false, ctx),
            Self::FullDodge { cost } => support::dodge(source, targets, cost, true, ctx),
            Self::Help { cost } => support::help(source, targets, cost, ctx),
            Self::ImposeTrait { cost, traits } => {
                effect::impose_traits(source, targets, cost, traits, ctx)
            }
            Self::ImposeSavingThrow(save) => save.execute(source, targets, ctx),
            Self::Composite { cost, actions } => {
                effect::composite(source, targets, cost, actions, ctx)
            }
            Self::Spell(spell) => spell.execute(source, targets, ctx),
        }
    }
}
