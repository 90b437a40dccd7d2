//! Spells and concentration.
//!
//! A spell is a named composite action with casting metadata. Concentration
//! spells keep the traits they impose alive only while the caster keeps
//! concentrating; casting another one, going down, or an explicit
//! [`drop_concentration`] removes them from their targets.

use tracing::info;

use super::{Action, ActionContext, ActionCost, ActionOutcome};
use crate::actor::Concentration;
use crate::log::CombatEventKind;
use crate::roster::ActorId;

/// A castable spell.
#[derive(Debug, Clone, PartialEq)]
pub struct Spell {
    /// Spell name.
    pub name: String,
    /// School of magic.
    pub school: String,
    /// Reach in spaces.
    pub range: u32,
    /// Area of effect in spaces (0 for single targets).
    pub area: u32,
    /// Nominal duration in rounds.
    pub duration: Option<u32>,
    /// Whether the caster must concentrate to sustain the effect.
    pub concentration: bool,
    /// Resource cost.
    pub cost: ActionCost,
    /// Effects, run in order against every target.
    pub actions: Vec<Action>,
}

impl Spell {
    /// A single-target spell costing 1 AP and 1 MP.
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            school: String::new(),
            range: 1,
            area: 0,
            duration: None,
            concentration: false,
            cost: ActionCost::new(1, 1, 0),
            actions,
        }
    }

    /// Set the school.
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    /// Set range and area.
    pub fn with_reach(mut self, range: u32, area: u32) -> Self {
        self.range = range;
        self.area = area;
        self
    }

    /// Set the nominal duration.
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    /// Require concentration.
    pub fn concentrating(mut self) -> Self {
        self.concentration = true;
        self
    }

    pub(super) fn execute(
        &self,
        source: ActorId,
        targets: &[ActorId],
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        if let Err(reason) = ctx.pay(source, &self.cost, &self.name) {
            return ActionOutcome::Skipped(reason);
        }
        if self.concentration {
            drop_concentration(source, ctx);
        }

        let caster = ctx.roster[source].name().to_string();
        info!(caster = %caster, spell = %self.name, school = %self.school, "spell cast");
        ctx.log.push(
            CombatEventKind::SpellCast {
                caster: source,
                spell: self.name.clone(),
            },
            format!("{caster} casts {}", self.name),
        );

        let mark = ctx.imposed_mark();
        for action in &self.actions {
            action.execute(source, targets, ctx);
        }
        let links = ctx.imposed_since(mark);

        // A caster downed mid-spell cannot hold it.
        if self.concentration && ctx.roster.is_alive(source) {
            ctx.roster[source].state.concentration = Some(Concentration {
                spell: self.name.clone(),
                links,
            });
        } else if self.concentration {
            for (target, name) in links {
                ctx.roster[target].remove_trait(&name);
            }
        }
        ActionOutcome::Done
    }
}

/// End the caster's concentration, removing every trait it sustained.
pub fn drop_concentration(caster: ActorId, ctx: &mut ActionContext<'_>) {
    let Some(concentration) = ctx.roster[caster].state.concentration.take() else {
        return;
    };
    for (target, name) in &concentration.links {
        ctx.roster[*target].remove_trait(name);
    }
    let name = ctx.roster[caster].name().to_string();
    info!(
        caster = %name,
        spell = %concentration.spell,
        removed = concentration.links.len(),
        "concentration dropped"
    );
    ctx.log.push(
        CombatEventKind::ConcentrationDropped {
            caster,
            spell: concentration.spell.clone(),
        },
        format!("{name} stops concentrating on {}", concentration.spell),
    );
}
