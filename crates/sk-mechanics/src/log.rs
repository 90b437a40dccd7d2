//! Structured combat events.
//!
//! Every roll, hit, damage application, and phase change is pushed to a
//! [`CombatLog`] alongside the matching `tracing` event, so callers can
//! inspect a fight after the fact without parsing log output.

use crate::action::{HitKind, SkipReason};
use crate::damage::DamageReport;
use crate::roster::{ActorId, Team};

/// What kind of combat event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEventKind {
    /// An actor rolled initiative.
    InitiativeRolled {
        /// The rolling actor.
        actor: ActorId,
        /// d20 plus initiative bonus.
        total: i32,
    },
    /// A new round began.
    RoundStarted,
    /// An actor's turn began.
    TurnStarted {
        /// The acting actor.
        actor: ActorId,
    },
    /// An actor picked a new target (or lost its target).
    TargetChanged {
        /// The retargeting actor.
        actor: ActorId,
        /// The new target.
        target: Option<ActorId>,
    },
    /// An action could not be paid for.
    ActionSkipped {
        /// The actor that tried to act.
        actor: ActorId,
        /// Name of the skipped action.
        action: String,
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// An actor gained advantage for its next attack.
    AdvantageGained {
        /// The actor.
        actor: ActorId,
        /// Advantage count after the gain.
        count: i32,
    },
    /// An attack roll was resolved against one defender.
    AttackResolved {
        /// The attacker.
        attacker: ActorId,
        /// The defender.
        defender: ActorId,
        /// The kept d20.
        roll: i32,
        /// The full attack total.
        total: i32,
        /// The defender's physical defense.
        defense: i32,
        /// Miss, hit, heavy, brutal, or critical.
        outcome: HitKind,
    },
    /// Damage was applied to an actor.
    DamageTaken {
        /// The damaged actor.
        actor: ActorId,
        /// Per-component breakdown.
        report: DamageReport,
    },
    /// An actor helped another.
    HelpGiven {
        /// The helper.
        helper: ActorId,
        /// The helped actor.
        ally: ActorId,
        /// The rolled bonus.
        bonus: i32,
    },
    /// An actor prepared a dodge.
    Dodging {
        /// The dodging actor.
        actor: ActorId,
        /// Whether it dodges every attack this round.
        full: bool,
    },
    /// A trait was placed on an actor.
    TraitImposed {
        /// The imposing actor.
        source: ActorId,
        /// The receiving actor.
        target: ActorId,
        /// Name of the trait.
        name: String,
    },
    /// A saving throw was rolled.
    SavingThrow {
        /// The saving actor.
        target: ActorId,
        /// The stat added to the roll.
        stat: String,
        /// d20 plus stat.
        total: i32,
        /// The difficulty to meet.
        difficulty: i32,
        /// Whether the save succeeded.
        success: bool,
    },
    /// A spell was cast.
    SpellCast {
        /// The caster.
        caster: ActorId,
        /// Spell name.
        spell: String,
    },
    /// A caster's concentration ended and its linked traits were removed.
    ConcentrationDropped {
        /// The caster.
        caster: ActorId,
        /// Spell name.
        spell: String,
    },
    /// An actor went down.
    ActorDown {
        /// The downed actor.
        actor: ActorId,
    },
    /// The combat ended.
    CombatEnded {
        /// The winning team, `None` on a draw.
        winner: Option<Team>,
    },
}

impl CombatEventKind {
    /// Check whether a given actor is involved in this event.
    pub fn involves(&self, id: ActorId) -> bool {
        match self {
            Self::InitiativeRolled { actor, .. }
            | Self::TurnStarted { actor }
            | Self::TargetChanged { actor, .. }
            | Self::ActionSkipped { actor, .. }
            | Self::AdvantageGained { actor, .. }
            | Self::DamageTaken { actor, .. }
            | Self::Dodging { actor, .. }
            | Self::ActorDown { actor } => *actor == id,
            Self::AttackResolved {
                attacker, defender, ..
            } => *attacker == id || *defender == id,
            Self::HelpGiven { helper, ally, .. } => *helper == id || *ally == id,
            Self::TraitImposed { source, target, .. } => *source == id || *target == id,
            Self::SavingThrow { target, .. } => *target == id,
            Self::SpellCast { caster, .. } | Self::ConcentrationDropped { caster, .. } => {
                *caster == id
            }
            Self::RoundStarted | Self::CombatEnded { .. } => false,
        }
    }
}

/// A record of something that happened during combat.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEvent {
    /// The round in which the event occurred (0 before the first round).
    pub round: u32,
    /// The specific kind of event.
    pub kind: CombatEventKind,
    /// A human-readable description.
    pub description: String,
}

/// Accumulates events during a fight.
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    events: Vec<CombatEvent>,
    max_events: usize,
    round: u32,
}

impl CombatLog {
    /// Create a log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            round: 0,
        }
    }

    /// Set the round stamped on subsequent events.
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, kind: CombatEventKind, description: impl Into<String>) {
        self.events.push(CombatEvent {
            round: self.round,
            kind,
            description: description.into(),
        });
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Every recorded event.
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Events of one round.
    pub fn events_in_round(&self, round: u32) -> Vec<&CombatEvent> {
        self.events.iter().filter(|e| e.round == round).collect()
    }

    /// Events involving one actor.
    pub fn events_for_actor(&self, id: ActorId) -> Vec<&CombatEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove every event and reset the round stamp.
    pub fn clear(&mut self) {
        self.events.clear();
        self.round = 0;
    }
}
