//! Target selection.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::roster::{ActorId, Roster};

/// How an actor picks among candidate targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingStrategy {
    /// Lowest current health.
    #[default]
    Weakest,
    /// Highest current health.
    Strongest,
    /// Uniformly random.
    Random,
    /// Join the weakest ally's fight; otherwise weakest enemy.
    HelpAlly,
}

impl TargetingStrategy {
    /// Pick one of `candidates`, or `None` when there are none.
    ///
    /// Ties on health go to the earliest candidate.
    pub fn select(
        self,
        roster: &Roster,
        candidates: &[ActorId],
        rng: &mut StdRng,
    ) -> Option<ActorId> {
        let health = |id: &ActorId| roster[*id].health.current;
        match self {
            Self::Weakest | Self::HelpAlly => candidates.iter().copied().min_by_key(health),
            Self::Strongest => candidates
                .iter()
                .copied()
                .rev()
                .max_by_key(health),
            Self::Random => candidates.choose(rng).copied(),
        }
    }

    /// Refresh `me`'s current target and return it.
    ///
    /// A dead or allied target is dropped. Enemies currently attacking `me`
    /// are preferred; a help-ally actor then mirrors the weakest ally's
    /// living target; otherwise any living enemy is a candidate.
    pub fn retarget(self, roster: &mut Roster, me: ActorId, rng: &mut StdRng) -> Option<ActorId> {
        let current = roster[me]
            .state
            .current_target
            .filter(|&t| roster.is_alive(t) && !roster.are_allies(me, t));
        roster.set_target(me, current);

        let attackers = roster.attackers_of(me);
        let team = roster[me].team();
        let target = if !attackers.is_empty() {
            self.select(roster, &attackers, rng)
        } else {
            self.mirrored_target(roster, me).or_else(|| {
                let enemies = roster.living(team.opponent());
                self.select(roster, &enemies, rng)
            })
        };

        roster.set_target(me, target);
        debug!(
            actor = roster[me].name(),
            target = ?target.map(|t| roster[t].name().to_string()),
            "retargeted"
        );
        target
    }

    fn mirrored_target(self, roster: &Roster, me: ActorId) -> Option<ActorId> {
        if self != Self::HelpAlly {
            return None;
        }
        let allies: Vec<ActorId> = roster
            .living(roster[me].team())
            .into_iter()
            .filter(|&id| id != me)
            .collect();
        let weakest = allies
            .iter()
            .copied()
            .min_by_key(|&id| roster[id].health.current)?;
        roster[weakest]
            .state
            .current_target
            .filter(|&t| roster.is_alive(t) && !roster.are_allies(me, t))
    }
}
