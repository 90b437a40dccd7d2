//! Action selection.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::roster::{ActorId, Roster};

/// How an actor spends its action points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStrategy {
    /// Attack with every action point.
    AlwaysAttack,
    /// Attack, stacking advantage to offset multi-attack disadvantage.
    #[default]
    Default,
    /// Full dodge while an enemy is attacking, otherwise [`Self::Default`].
    DodgeWhenTargeted,
    /// Open the turn by helping an engaged ally, otherwise [`Self::Default`].
    HelpThenAttack,
}

impl CombatStrategy {
    /// Choose `me`'s next action.
    ///
    /// [`Self::HelpThenAttack`] switches `me`'s target to the helped ally.
    pub fn choose_action(self, me: ActorId, roster: &mut Roster, rng: &mut StdRng) -> Action {
        match self {
            Self::AlwaysAttack => Action::attack(),
            Self::Default => default_action(roster, me),
            Self::DodgeWhenTargeted => {
                let targeted = !roster.attackers_of(me).is_empty();
                if targeted && !roster[me].state.full_dodging {
                    Action::full_dodge()
                } else {
                    default_action(roster, me)
                }
            }
            Self::HelpThenAttack => match ally_to_help(roster, me, rng) {
                Some(ally) => {
                    roster.set_target(me, Some(ally));
                    Action::help()
                }
                None => default_action(roster, me),
            },
        }
    }
}

/// Attack first and last; in between, attack only while advantage keeps
/// pace with the attack penalty.
fn default_action(roster: &Roster, me: ActorId) -> Action {
    let actor = &roster[me];
    let attacks = actor.state.attack_count;
    if attacks == 0 || actor.action_points.current == 1 {
        return Action::attack();
    }
    if actor.state.advantage_count >= attacks {
        Action::attack()
    } else {
        Action::gain_advantage()
    }
}

/// A random living ally engaged with a living enemy and not already helped,
/// considered only while `me` still has full action points.
fn ally_to_help(roster: &Roster, me: ActorId, rng: &mut StdRng) -> Option<ActorId> {
    let actor = &roster[me];
    if !actor.action_points.is_full() {
        return None;
    }
    let candidates: Vec<ActorId> = roster
        .living(actor.team())
        .into_iter()
        .filter(|&ally| ally != me)
        .filter(|&ally| {
            let state = &roster[ally].state;
            state.one_time_hit_bonus == 0
                && state
                    .current_target
                    .is_some_and(|t| roster.is_alive(t) && !roster.are_allies(ally, t))
        })
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::roster::Team;
    use rand::SeedableRng;

    fn setup() -> (Roster, StdRng) {
        let roster = Roster::from_teams(
            vec![Actor::new("Ayla"), Actor::new("Bram")],
            vec![Actor::new("Gob")],
        );
        (roster, StdRng::seed_from_u64(3))
    }

    const ME: ActorId = ActorId(0);
    const ALLY: ActorId = ActorId(1);
    const ENEMY: ActorId = ActorId(2);

    #[test]
    fn default_attacks_first() {
        let (mut roster, mut rng) = setup();
        assert_eq!(
            CombatStrategy::Default.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn default_gains_advantage_after_attacking() {
        let (mut roster, mut rng) = setup();
        roster[ME].state.attack_count = 1;
        roster[ME].action_points.adjust(-1);
        assert_eq!(
            CombatStrategy::Default.choose_action(ME, &mut roster, &mut rng),
            Action::gain_advantage()
        );
        roster[ME].state.advantage_count = 1;
        assert_eq!(
            CombatStrategy::Default.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn default_attacks_with_last_point() {
        let (mut roster, mut rng) = setup();
        roster[ME].state.attack_count = 2;
        roster[ME].action_points.adjust(-3);
        assert_eq!(
            CombatStrategy::Default.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn always_attack() {
        let (mut roster, mut rng) = setup();
        roster[ME].state.attack_count = 3;
        assert_eq!(
            CombatStrategy::AlwaysAttack.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn dodges_when_targeted_once() {
        let (mut roster, mut rng) = setup();
        roster.set_target(ENEMY, Some(ME));
        assert_eq!(
            CombatStrategy::DodgeWhenTargeted.choose_action(ME, &mut roster, &mut rng),
            Action::full_dodge()
        );
        roster[ME].state.full_dodging = true;
        assert_eq!(
            CombatStrategy::DodgeWhenTargeted.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn helps_engaged_ally() {
        let (mut roster, mut rng) = setup();
        roster.set_target(ALLY, Some(ENEMY));
        assert_eq!(
            CombatStrategy::HelpThenAttack.choose_action(ME, &mut roster, &mut rng),
            Action::help()
        );
        assert_eq!(roster[ME].state.current_target, Some(ALLY));
    }

    #[test]
    fn skips_help_for_already_helped_ally() {
        let (mut roster, mut rng) = setup();
        roster.set_target(ALLY, Some(ENEMY));
        roster[ALLY].state.one_time_hit_bonus = 5;
        assert_eq!(
            CombatStrategy::HelpThenAttack.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }

    #[test]
    fn helps_only_with_full_action_points() {
        let (mut roster, mut rng) = setup();
        roster.set_target(ALLY, Some(ENEMY));
        roster[ME].action_points.adjust(-1);
        assert_ne!(
            CombatStrategy::HelpThenAttack.choose_action(ME, &mut roster, &mut rng),
            Action::help()
        );
    }

    #[test]
    fn ally_without_target_is_not_helped() {
        let (mut roster, mut rng) = setup();
        assert_eq!(roster[ALLY].team(), Team::A);
        assert_eq!(
            CombatStrategy::HelpThenAttack.choose_action(ME, &mut roster, &mut rng),
            Action::attack()
        );
    }
}
