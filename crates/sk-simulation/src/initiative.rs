//! Initiative rolls and turn order.

use std::cmp::Reverse;

use rand::rngs::StdRng;
use sk_mechanics::{ActorId, CombatEventKind, CombatLog, Die, Roster, Team};
use tracing::info;

/// One actor's initiative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitiativeRoll {
    /// The rolling actor.
    pub actor: ActorId,
    /// d20 plus initiative bonus.
    pub total: i32,
}

/// Roll d20 + initiative for every member of `team`, best first.
///
/// Ties keep roster order.
pub fn roll_team(
    roster: &Roster,
    team: Team,
    rng: &mut StdRng,
    log: &mut CombatLog,
) -> Vec<InitiativeRoll> {
    let mut rolls: Vec<InitiativeRoll> = roster
        .team(team)
        .into_iter()
        .map(|actor| {
            let roll = Die::D20.roll(rng);
            let bonus = roster[actor].attributes().initiative;
            let total = roll + bonus;
            let name = roster[actor].name();
            info!(actor = name, roll, bonus, total, "initiative");
            log.push(
                CombatEventKind::InitiativeRolled { actor, total },
                format!("{name} rolls {total} for initiative"),
            );
            InitiativeRoll { actor, total }
        })
        .collect();
    rolls.sort_by_key(|r| Reverse(r.total));
    rolls
}

/// Interleave two sorted teams, leftovers appended in order.
///
/// Team A opens iff its best roll meets `dc`; an empty team A never does.
pub fn turn_order(team_a: &[InitiativeRoll], team_b: &[InitiativeRoll], dc: i32) -> Vec<ActorId> {
    let a_first = team_a.first().is_some_and(|best| best.total >= dc);
    let (first, second) = if a_first {
        (team_a, team_b)
    } else {
        (team_b, team_a)
    };

    let mut order = Vec::with_capacity(first.len() + second.len());
    let mut firsts = first.iter();
    let mut seconds = second.iter();
    loop {
        match (firsts.next(), seconds.next()) {
            (None, None) => break,
            (a, b) => {
                order.extend(a.map(|r| r.actor));
                order.extend(b.map(|r| r.actor));
            }
        }
    }
    order
}
