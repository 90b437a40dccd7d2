//! The combat manager: initiative, rounds, and turns.
//!
//! A combat moves through [`Phase`]s:
//!
//! ```text
//! NotStarted -> InitiativeRolled -> RoundInProgress <-> TurnInProgress -> Over
//! ```
//!
//! Each round resets every actor, then gives each living actor one turn in
//! initiative order. A turn spends action points on whatever the actor's
//! strategy picks until the points run out, an action is skipped, the
//! target cannot be replaced, or one team is down.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sk_mechanics::{
    ActionContext, Actor, ActorId, CombatEventKind, CombatLog, MechResult, Roster, Team,
};
use tracing::{debug, info};

use crate::config::CombatConfig;
use crate::error::{SimError, SimResult};
use crate::initiative;

/// Where a combat is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Built or reset; no initiative yet.
    NotStarted,
    /// Turn order is known; no round has started.
    InitiativeRolled,
    /// A round is running between turns.
    RoundInProgress,
    /// An actor is taking its turn.
    TurnInProgress,
    /// One team is down or the round cap was reached.
    Over,
}

/// Result of one complete combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Rounds started.
    pub rounds: u32,
    /// Turns taken.
    pub turns: u32,
    /// The team left standing; `None` on a draw.
    pub winner: Option<Team>,
    /// Health of every actor at the end, keyed by name.
    pub remaining_health: BTreeMap<String, i32>,
}

/// Runs one fight between two teams.
#[derive(Debug, Clone)]
pub struct CombatManager {
    templates: (Vec<Actor>, Vec<Actor>),
    roster: Roster,
    config: CombatConfig,
    rng: StdRng,
    log: CombatLog,
    turn_order: Vec<ActorId>,
    cursor: usize,
    rounds: u32,
    turns: u32,
    phase: Phase,
}

impl CombatManager {
    /// Prepare a combat between two teams.
    ///
    /// The actors are kept as templates for [`Self::reset_combat`]. Both
    /// teams must be non-empty and every actor must carry a weapon.
    pub fn new(team_a: Vec<Actor>, team_b: Vec<Actor>, config: CombatConfig) -> SimResult<Self> {
        if team_a.is_empty() {
            return Err(SimError::EmptyTeam(Team::A));
        }
        if team_b.is_empty() {
            return Err(SimError::EmptyTeam(Team::B));
        }
        if let Some(unarmed) = team_a.iter().chain(&team_b).find(|a| a.weapon().is_none()) {
            return Err(SimError::Unarmed(unarmed.name().to_string()));
        }

        let roster = Roster::from_teams(team_a.clone(), team_b.clone());
        Ok(Self {
            templates: (team_a, team_b),
            roster,
            rng: StdRng::seed_from_u64(config.seed),
            log: CombatLog::new(config.max_events),
            config,
            turn_order: Vec::new(),
            cursor: 0,
            rounds: 0,
            turns: 0,
            phase: Phase::NotStarted,
        })
    }

    /// Every combatant.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Look up one combatant.
    pub fn actor(&self, id: ActorId) -> MechResult<&Actor> {
        self.roster.require(id)
    }

    /// The structured event log.
    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    /// The configuration this combat runs with.
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rounds started so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Turns taken so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Resolved turn order; empty before initiative.
    pub fn turn_order(&self) -> &[ActorId] {
        &self.turn_order
    }

    /// Roll initiative for both teams and fix the turn order.
    pub fn roll_initiative(&mut self) {
        let a = initiative::roll_team(&self.roster, Team::A, &mut self.rng, &mut self.log);
        let b = initiative::roll_team(&self.roster, Team::B, &mut self.rng, &mut self.log);
        self.turn_order = initiative::turn_order(&a, &b, self.config.initiative_dc);
        self.cursor = 0;
        self.phase = Phase::InitiativeRolled;

        let names: Vec<&str> = self
            .turn_order
            .iter()
            .map(|&id| self.roster[id].name())
            .collect();
        info!(order = ?names, dc = self.config.initiative_dc, "turn order determined");
    }

    /// Whether one team has no living member.
    pub fn is_combat_over(&self) -> bool {
        combat_over(&self.roster)
    }

    /// Start a new round: every actor refreshes, then round-start deaths are settled.
    pub fn start_round(&mut self) {
        self.rounds += 1;
        self.cursor = 0;
        self.log.set_round(self.rounds);
        self.phase = Phase::RoundInProgress;

        let alive: Vec<bool> = self.roster.iter().map(|(_, a)| a.is_alive()).collect();
        for actor in self.roster.actors_mut() {
            actor.new_round();
        }

        let standing: Vec<String> = self
            .roster
            .iter()
            .filter(|(_, a)| a.is_alive())
            .map(|(_, a)| a.to_string())
            .collect();
        info!(round = self.rounds, standing = ?standing, "new round");
        self.log.push(
            CombatEventKind::RoundStarted,
            format!("Round {} begins", self.rounds),
        );

        let mut ctx = ActionContext::new(&mut self.roster, &mut self.rng, &mut self.log);
        for (index, was_alive) in alive.into_iter().enumerate() {
            ctx.settle(ActorId(index), was_alive);
        }
    }

    /// The next living actor still to act this round, advancing the cursor.
    ///
    /// Down actors are skipped. Returns `None` once the round's order is
    /// exhausted, and in particular when every actor is down.
    pub fn next_turn_actor(&mut self) -> Option<ActorId> {
        while let Some(&id) = self.turn_order.get(self.cursor) {
            self.cursor += 1;
            if self.roster.is_alive(id) {
                return Some(id);
            }
        }
        None
    }

    /// Run one round: reset, then one turn per living actor until a team falls.
    pub fn run_round(&mut self) {
        self.start_round();
        while !self.is_combat_over() {
            let Some(id) = self.next_turn_actor() else {
                break;
            };
            self.execute_turn(id);
            self.phase = Phase::RoundInProgress;
        }
    }

    /// Take `id`'s turn.
    pub fn execute_turn(&mut self, id: ActorId) {
        self.phase = Phase::TurnInProgress;
        self.turns += 1;
        let name = self.roster[id].name().to_string();
        info!(actor = %name, turn = self.turns, "turn started");
        self.log
            .push(CombatEventKind::TurnStarted { actor: id }, format!("{name}'s turn"));

        let mut ctx = ActionContext::new(&mut self.roster, &mut self.rng, &mut self.log);
        if !has_living_target(ctx.roster, id) {
            retarget(&mut ctx, id);
        }

        loop {
            let actor = &ctx.roster[id];
            if actor.action_points.current <= 0 || !actor.is_alive() || combat_over(ctx.roster) {
                break;
            }
            let Some(target) = living_target(ctx.roster, id) else {
                break;
            };
            // Help leaves the helped ally as target.
            if ctx.roster.are_allies(id, target) && retarget(&mut ctx, id).is_none() {
                break;
            }

            let strategy = ctx.roster[id].strategy;
            let action = strategy.choose_action(id, ctx.roster, ctx.rng);
            let targets: Vec<ActorId> = if action.is_self_only() {
                Vec::new()
            } else {
                ctx.roster[id].state.current_target.into_iter().collect()
            };
            debug!(actor = %name, action = action.name(), "action chosen");
            if action.execute(id, &targets, &mut ctx).is_skipped() {
                break;
            }

            if !has_living_target(ctx.roster, id) {
                retarget(&mut ctx, id);
            }
        }
    }

    /// Fight until one team is down or the round cap is reached.
    pub fn run_combat(&mut self) -> CombatOutcome {
        if self.phase == Phase::NotStarted {
            self.roll_initiative();
        }
        while !self.is_combat_over() && self.rounds < self.config.max_rounds {
            self.run_round();
        }
        self.phase = Phase::Over;

        let winner = self.winner();
        match winner {
            Some(team) => info!(
                winner = %team,
                rounds = self.rounds,
                turns = self.turns,
                "fight is over"
            ),
            None => info!(rounds = self.rounds, turns = self.turns, "fight ended in a draw"),
        }
        self.log.push(
            CombatEventKind::CombatEnded { winner },
            match winner {
                Some(team) => format!("Team {team} wins"),
                None => "Draw".to_string(),
            },
        );

        CombatOutcome {
            rounds: self.rounds,
            turns: self.turns,
            winner,
            remaining_health: self.roster.remaining_health(),
        }
    }

    /// The only team with living members, if exactly one has any.
    pub fn winner(&self) -> Option<Team> {
        match (
            self.roster.team_alive(Team::A),
            self.roster.team_alive(Team::B),
        ) {
            (true, false) => Some(Team::A),
            (false, true) => Some(Team::B),
            _ => None,
        }
    }

    /// Rebuild every actor from its template and clear all combat progress.
    ///
    /// The random stream continues, so a reset fight plays out differently.
    pub fn reset_combat(&mut self) {
        let (team_a, team_b) = &self.templates;
        self.roster = Roster::from_teams(team_a.clone(), team_b.clone());
        self.log.clear();
        self.turn_order.clear();
        self.cursor = 0;
        self.rounds = 0;
        self.turns = 0;
        self.phase = Phase::NotStarted;
        debug!("combat reset");
    }

    /// Per-team status lines: name, alive or down, and health.
    pub fn fight_debrief(&self) -> String {
        let mut lines = vec!["Fight Debrief:".to_string()];
        for team in [Team::A, Team::B] {
            lines.push(String::new());
            lines.push(format!("Team {team}:"));
            for id in self.roster.team(team) {
                let actor = &self.roster[id];
                let status = if actor.is_alive() {
                    "Alive"
                } else if actor.is_at_death_door() {
                    "Dying"
                } else {
                    "Dead"
                };
                lines.push(format!(
                    "{} - {status}, HP: {}",
                    actor.name(),
                    actor.health.current
                ));
            }
        }
        lines.join("\n")
    }
}

fn combat_over(roster: &Roster) -> bool {
    !roster.team_alive(Team::A) || !roster.team_alive(Team::B)
}

fn living_target(roster: &Roster, id: ActorId) -> Option<ActorId> {
    roster[id]
        .state
        .current_target
        .filter(|&t| roster.is_alive(t))
}

fn has_living_target(roster: &Roster, id: ActorId) -> bool {
    living_target(roster, id).is_some()
}

/// Ask `id`'s targeting strategy for a new target, logging any change.
fn retarget(ctx: &mut ActionContext<'_>, id: ActorId) -> Option<ActorId> {
    let previous = ctx.roster[id].state.current_target;
    let targeting = ctx.roster[id].targeting;
    let target = targeting.retarget(ctx.roster, id, ctx.rng);
    if target != previous {
        let description = match target {
            Some(t) => format!(
                "{} now targets {}",
                ctx.roster[id].name(),
                ctx.roster[t].name()
            ),
            None => format!("{} has no target", ctx.roster[id].name()),
        };
        ctx.log.push(
            CombatEventKind::TargetChanged { actor: id, target },
            description,
        );
    }
    target
}
