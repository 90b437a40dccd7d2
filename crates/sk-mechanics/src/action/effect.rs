//! Fixed damage, imposed traits, saving throws, and composite actions.

use sk_core::{Attributes, Damage, Trait};
use tracing::info;

use super::{Action, ActionContext, ActionCost, ActionOutcome};
use crate::dice::Die;
use crate::error::{MechError, MechResult};
use crate::log::CombatEventKind;
use crate::roster::ActorId;

pub(super) fn inflict_damage(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    damages: &[Damage],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, "inflict damage") {
        return ActionOutcome::Skipped(reason);
    }
    for &target in targets {
        ctx.apply_damage(target, damages, false);
    }
    ActionOutcome::Done
}

pub(super) fn impose_traits(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    traits: &[Trait],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, "impose trait") {
        return ActionOutcome::Skipped(reason);
    }
    for &target in targets {
        for t in traits {
            ctx.impose_trait(source, target, t.clone());
        }
    }
    ActionOutcome::Done
}

pub(super) fn composite(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    actions: &[Action],
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, "composite action") {
        return ActionOutcome::Skipped(reason);
    }
    for action in actions {
        action.execute(source, targets, ctx);
    }
    ActionOutcome::Done
}

/// A saving throw forced on each target.
///
/// Each target rolls d20 plus its `stat`; meeting `difficulty` runs
/// `on_success`, otherwise `on_failure`. Follow-up actions are paid by the
/// original source and aimed at the saving target alone.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingThrow {
    /// Integer attribute added to the roll.
    pub stat: String,
    /// Total to meet or beat.
    pub difficulty: i32,
    /// Actions run when the save succeeds.
    pub on_success: Vec<Action>,
    /// Actions run when the save fails.
    pub on_failure: Vec<Action>,
    /// Resource cost of forcing the save.
    pub cost: ActionCost,
}

impl SavingThrow {
    /// A free saving throw against `stat`, which must name an integer attribute.
    pub fn new(stat: impl Into<String>, difficulty: i32) -> MechResult<Self> {
        let stat = stat.into();
        if Attributes::actor_defaults().integer(&stat).is_none() {
            return Err(MechError::UnknownStat(stat));
        }
        Ok(Self {
            stat,
            difficulty,
            on_success: Vec::new(),
            on_failure: Vec::new(),
            cost: ActionCost::free(),
        })
    }

    /// Set the actions run on a successful save.
    pub fn on_success(mut self, actions: Vec<Action>) -> Self {
        self.on_success = actions;
        self
    }

    /// Set the actions run on a failed save.
    pub fn on_failure(mut self, actions: Vec<Action>) -> Self {
        self.on_failure = actions;
        self
    }

    pub(super) fn execute(
        &self,
        source: ActorId,
        targets: &[ActorId],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        if let Err(reason) = ctx.pay(source, &self.cost, "saving throw") {
            return ActionOutcome::Skipped(reason);
        }
        for &target in targets {
            let saver = &ctx.roster[target];
            let modifier = saver.attributes().integer(&self.stat).unwrap_or(0);
            let name = saver.name().to_string();
            let roll = Die::D20.roll(ctx.rng);
            let total = roll + modifier;
            let success = total >= self.difficulty;
            info!(
                actor = %name,
                stat = %self.stat,
                roll,
                modifier,
                total,
                difficulty = self.difficulty,
                success,
                "saving throw"
            );
            ctx.log.push(
                CombatEventKind::SavingThrow {
                    target,
                    stat: self.stat.clone(),
                    total,
                    difficulty: self.difficulty,
                    success,
                },
                format!(
                    "{name} {} a {} save ({total} vs {})",
                    if success { "passes" } else { "fails" },
                    self.stat,
                    self.difficulty
                ),
            );
            let follow_up = if success {
                &self.on_success
            } else {
                &self.on_failure
            };
            for action in follow_up {
                action.execute(source, &[target], ctx);
            }
        }
        ActionOutcome::Done
    }
}
