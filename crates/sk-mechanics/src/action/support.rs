//! Non-damaging actions: retargeting, dodging, helping an ally.

use tracing::info;

use super::{ActionContext, ActionCost, ActionOutcome};
use crate::dice::Die;
use crate::log::CombatEventKind;
use crate::roster::ActorId;

/// Help die by how often the helper already helped this round.
fn help_die(help_count: i32) -> Die {
    match help_count {
        0 => Die::D8,
        1 => Die::D6,
        _ => Die::D4,
    }
}

pub(super) fn target(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    name: &str,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, name) {
        return ActionOutcome::Skipped(reason);
    }
    let target = targets.first().copied().unwrap_or(source);
    ctx.roster.set_target(source, Some(target));
    let description = format!(
        "{} targets {}",
        ctx.roster[source].name(),
        ctx.roster[target].name()
    );
    info!("{description}");
    ctx.log.push(
        CombatEventKind::TargetChanged {
            actor: source,
            target: Some(target),
        },
        description,
    );
    ActionOutcome::Done
}

pub(super) fn dodge(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    full: bool,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let name = if full { "full dodge" } else { "dodge" };
    if let Err(reason) = ctx.pay(source, cost, name) {
        return ActionOutcome::Skipped(reason);
    }
    let own = [source];
    let dodgers = if targets.is_empty() { &own[..] } else { targets };
    for &id in dodgers {
        let actor = &mut ctx.roster[id];
        if full {
            actor.state.full_dodging = true;
        } else {
            actor.state.dodging = true;
        }
        let description = format!("{} prepares to {name}", actor.name());
        info!("{description}");
        ctx.log
            .push(CombatEventKind::Dodging { actor: id, full }, description);
    }
    ActionOutcome::Done
}

pub(super) fn help(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, "help") {
        return ActionOutcome::Skipped(reason);
    }
    for &ally in targets {
        let helper = &mut ctx.roster[source];
        let die = help_die(helper.state.help_count);
        helper.state.help_count += 1;
        let bonus = die.roll(ctx.rng);
        let helper_name = helper.name().to_string();

        let helped = &mut ctx.roster[ally];
        helped.state.one_time_hit_bonus += bonus;
        let description = format!("{helper_name} helps {} (+{bonus}, {die})", helped.name());
        info!(helper = %helper_name, ally = helped.name(), %die, bonus, "help given");
        ctx.log.push(
            CombatEventKind::HelpGiven {
                helper: source,
                ally,
                bonus,
            },
            description,
        );
    }
    ActionOutcome::Done
}

#[cfg(test)]
mod tests {
    use super::super::Action;
    use super::super::test_support::{armed, duel};
    use super::*;
    use crate::roster::Team;

    #[test]
    fn help_die_shrinks_with_use() {
        assert_eq!(help_die(0), Die::D8);
        assert_eq!(help_die(1), Die::D6);
        assert_eq!(help_die(2), Die::D4);
        assert_eq!(help_die(7), Die::D4);
    }

    #[test]
    fn repeated_help_rolls_within_shrinking_ranges() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let ally = roster.add(armed("Bram"), Team::A);
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        let mut bonuses = Vec::new();
        for _ in 0..3 {
            let before = ctx.roster[ally].state.one_time_hit_bonus;
            Action::help().execute(a, &[ally], &mut ctx);
            bonuses.push(ctx.roster[ally].state.one_time_hit_bonus - before);
        }
        assert!((1..=8).contains(&bonuses[0]));
        assert!((1..=6).contains(&bonuses[1]));
        assert!((1..=4).contains(&bonuses[2]));
        assert_eq!(roster[a].state.help_count, 3);
        assert_eq!(roster[a].action_points.current, 1);
    }

    #[test]
    fn help_rolls_once_per_target() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let b1 = roster.add(armed("Bram"), Team::A);
        let b2 = roster.add(armed("Cato"), Team::A);
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::help().execute(a, &[b1, b2], &mut ctx);
        assert_eq!(roster[a].state.help_count, 2);
        assert!((1..=8).contains(&roster[b1].state.one_time_hit_bonus));
        assert!((1..=6).contains(&roster[b2].state.one_time_hit_bonus));
    }

    #[test]
    fn dodge_defaults_to_self() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::dodge().execute(a, &[], &mut ctx);
        Action::full_dodge().execute(a, &[], &mut ctx);
        assert!(roster[a].state.dodging);
        assert!(roster[a].state.full_dodging);
        assert_eq!(roster[a].action_points.current, 1);
    }

    #[test]
    fn target_sets_and_tracks_attacker() {
        let (mut roster, mut rng, mut log, a, b) = duel();
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::target().execute(a, &[b], &mut ctx);
        assert_eq!(roster[a].state.current_target, Some(b));
        assert_eq!(roster.attackers_of(b), vec![a]);
        assert_eq!(roster[a].action_points.current, 4);
    }

    #[test]
    fn move_to_target_costs_an_action_point() {
        let (mut roster, mut rng, mut log, a, b) = duel();
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::move_to_target().execute(a, &[b], &mut ctx);
        assert_eq!(roster[a].state.current_target, Some(b));
        assert_eq!(roster[a].action_points.current, 3);
    }
}
