//! The actor arena: every combatant of one fight, addressed by [`ActorId`].
//!
//! Actors refer to each other (targets, attackers, concentration links) by
//! id only, so a fight can hold mutable references to one actor at a time.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::error::{MechError, MechResult};

/// Index of an actor inside its [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub usize);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One side of a fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The first team; wins initiative ties against the difficulty.
    #[default]
    A,
    /// The second team.
    B,
}

impl Team {
    /// The opposing team.
    pub fn opponent(self) -> Team {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Every actor of a fight.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from two teams; team A actors come first.
    pub fn from_teams(team_a: Vec<Actor>, team_b: Vec<Actor>) -> Self {
        let mut roster = Self::new();
        for actor in team_a {
            roster.add(actor, Team::A);
        }
        for actor in team_b {
            roster.add(actor, Team::B);
        }
        roster
    }

    /// Add an actor to a team and return its id.
    pub fn add(&mut self, mut actor: Actor, team: Team) -> ActorId {
        actor.set_team(team);
        self.actors.push(actor);
        ActorId(self.actors.len() - 1)
    }

    /// Look up an actor.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    /// Look up an actor, failing for ids from another roster.
    pub fn require(&self, id: ActorId) -> MechResult<&Actor> {
        self.get(id).ok_or(MechError::ActorNotFound(id.0))
    }

    /// Look up an actor mutably.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    /// Number of actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Every id, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..self.actors.len()).map(ActorId)
    }

    /// Every actor with its id.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().enumerate().map(|(i, a)| (ActorId(i), a))
    }

    /// Every actor, mutably.
    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    /// Ids of one team's members.
    pub fn team(&self, team: Team) -> Vec<ActorId> {
        self.iter()
            .filter(|(_, a)| a.team() == team)
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of one team's living members.
    pub fn living(&self, team: Team) -> Vec<ActorId> {
        self.iter()
            .filter(|(_, a)| a.team() == team && a.is_alive())
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether the actor exists and has health above zero.
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).is_some_and(Actor::is_alive)
    }

    /// Whether two actors fight on the same side.
    pub fn are_allies(&self, a: ActorId, b: ActorId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.team() == y.team(),
            _ => false,
        }
    }

    /// Whether any member of the team is alive.
    pub fn team_alive(&self, team: Team) -> bool {
        self.actors.iter().any(|a| a.team() == team && a.is_alive())
    }

    /// Living enemies whose current target is `id`.
    pub fn attackers_of(&self, id: ActorId) -> Vec<ActorId> {
        let Some(actor) = self.get(id) else {
            return Vec::new();
        };
        actor
            .state
            .targeted_by
            .iter()
            .copied()
            .filter(|&other| {
                self.get(other).is_some_and(|o| {
                    o.is_alive() && o.team() != actor.team() && o.state.current_target == Some(id)
                })
            })
            .collect()
    }

    /// Point `source` at `target`, keeping the reverse `targeted_by` lists in sync.
    pub fn set_target(&mut self, source: ActorId, target: Option<ActorId>) {
        let Some(previous) = self.get(source).map(|a| a.state.current_target) else {
            return;
        };
        if previous == target {
            return;
        }
        if let Some(old) = previous.and_then(|id| self.get_mut(id)) {
            old.state.targeted_by.retain(|&id| id != source);
        }
        if let Some(new) = target
            .and_then(|id| self.get_mut(id))
            .filter(|a| !a.state.targeted_by.contains(&source))
        {
            new.state.targeted_by.push(source);
        }
        if let Some(actor) = self.get_mut(source) {
            actor.state.current_target = target;
        }
    }

    /// Remaining health of every actor, keyed by name.
    pub fn remaining_health(&self) -> std::collections::BTreeMap<String, i32> {
        self.actors
            .iter()
            .map(|a| (a.name().to_string(), a.health.current))
            .collect()
    }
}

impl Index<ActorId> for Roster {
    type Output = Actor;

    fn index(&self, id: ActorId) -> &Actor {
        &self.actors[id.0]
    }
}

impl IndexMut<ActorId> for Roster {
    fn index_mut(&mut self, id: ActorId) -> &mut Actor {
        &mut self.actors[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::from_teams(
            vec![Actor::new("Ayla"), Actor::new("Bram")],
            vec![Actor::new("Goblin")],
        )
    }

    #[test]
    fn teams_are_assigned() {
        let r = roster();
        assert_eq!(r.team(Team::A), vec![ActorId(0), ActorId(1)]);
        assert_eq!(r.team(Team::B), vec![ActorId(2)]);
        assert_eq!(r[ActorId(2)].team(), Team::B);
        assert!(r.are_allies(ActorId(0), ActorId(1)));
        assert!(!r.are_allies(ActorId(0), ActorId(2)));
    }

    #[test]
    fn set_target_maintains_reverse_links() {
        let mut r = roster();
        r.set_target(ActorId(2), Some(ActorId(0)));
        assert_eq!(r[ActorId(0)].state.targeted_by, vec![ActorId(2)]);
        assert_eq!(r.attackers_of(ActorId(0)), vec![ActorId(2)]);

        r.set_target(ActorId(2), Some(ActorId(1)));
        assert!(r[ActorId(0)].state.targeted_by.is_empty());
        assert_eq!(r.attackers_of(ActorId(1)), vec![ActorId(2)]);

        r.set_target(ActorId(2), None);
        assert!(r.attackers_of(ActorId(1)).is_empty());
    }

    #[test]
    fn allies_are_not_attackers() {
        let mut r = roster();
        r.set_target(ActorId(1), Some(ActorId(0)));
        assert!(r.attackers_of(ActorId(0)).is_empty());
    }

    #[test]
    fn require_reports_unknown_ids() {
        let r = roster();
        assert_eq!(r.require(ActorId(1)).unwrap().name(), "Bram");
        assert!(matches!(
            r.require(ActorId(9)),
            Err(MechError::ActorNotFound(9))
        ));
    }

    #[test]
    fn down_actors_are_not_living() {
        let mut r = roster();
        r[ActorId(2)].health.adjust(-100);
        assert!(!r.is_alive(ActorId(2)));
        assert!(!r.team_alive(Team::B));
        assert!(r.living(Team::B).is_empty());
        assert_eq!(r.remaining_health()["Goblin"], 0);
    }
}
